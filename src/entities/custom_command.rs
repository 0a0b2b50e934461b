//! Custom command entity - A server-scoped text response.
//!
//! Moderators register a name and a response text per Discord server. Members
//! trigger the response by typing the bot prefix followed by the name.
//! Names are stored lowercase and are unique per `guild_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Custom command database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_commands")]
pub struct Model {
    /// Unique identifier for the command
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID the command belongs to
    pub guild_id: String,
    /// Normalized (lowercase) command name
    pub name: String,
    /// Text posted when the command is invoked
    pub content: String,
    /// Discord user ID of the creator
    pub created_by: String,
    /// Discord user ID of the last editor, if the command was edited
    pub updated_by: Option<String>,
    /// Number of times the command was triggered
    pub uses: i64,
    /// When the command was created
    pub created_at: DateTimeUtc,
    /// When the command was last modified
    pub updated_at: DateTimeUtc,
}

/// `CustomCommand` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
