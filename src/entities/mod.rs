//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod custom_command;
pub mod gw2_api_key;
pub mod gw2_session;
pub mod gw2_session_character;
pub mod gw2_session_snapshot;

// Re-export specific types to avoid conflicts
pub use custom_command::{
    Column as CustomCommandColumn, Entity as CustomCommand, Model as CustomCommandModel,
};
pub use gw2_api_key::{Column as Gw2ApiKeyColumn, Entity as Gw2ApiKey, Model as Gw2ApiKeyModel};
pub use gw2_session::{Column as Gw2SessionColumn, Entity as Gw2Session, Model as Gw2SessionModel};
pub use gw2_session_character::{
    Column as Gw2SessionCharacterColumn, Entity as Gw2SessionCharacter,
    Model as Gw2SessionCharacterModel,
};
pub use gw2_session_snapshot::{
    Column as Gw2SessionSnapshotColumn, Entity as Gw2SessionSnapshot,
    Model as Gw2SessionSnapshotModel,
};
