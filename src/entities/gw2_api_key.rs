//! GW2 API key entity - One registered Guild Wars 2 API key per Discord user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// API key database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gw2_api_keys")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID owning the key
    #[sea_orm(unique)]
    pub user_id: String,
    /// The API key itself
    pub api_key: String,
    /// Name the user gave the key on the ArenaNet site
    pub key_name: String,
    /// GW2 account name (e.g. `Name.1234`)
    pub account_name: String,
    /// Home world name
    pub world: String,
    /// Granted permissions, comma separated
    pub permissions: String,
    /// When the key was first registered
    pub created_at: DateTimeUtc,
    /// When the key was last replaced
    pub updated_at: DateTimeUtc,
}

/// `Gw2ApiKey` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
