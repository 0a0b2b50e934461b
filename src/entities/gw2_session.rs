//! GW2 session entity - A user-initiated play session.
//!
//! A session is opened by `/gw2 session start` and closed by `/gw2 session end`.
//! `ended_at` stays `None` while the session is open. The API state captured at
//! both ends lives in [`super::gw2_session_snapshot`], per-character death
//! counts in [`super::gw2_session_character`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gw2_sessions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID who started the session
    pub user_id: String,
    /// GW2 account name at session start
    pub account_name: String,
    /// When the start snapshot was taken
    pub started_at: DateTimeUtc,
    /// When the end snapshot was taken, `None` while the session is open
    pub ended_at: Option<DateTimeUtc>,
}

/// Defines relationships between a session and its snapshots/characters
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One session has (up to) two snapshots
    #[sea_orm(has_many = "super::gw2_session_snapshot::Entity")]
    Snapshots,
    /// One session has many characters
    #[sea_orm(has_many = "super::gw2_session_character::Entity")]
    Characters,
}

impl Related<super::gw2_session_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snapshots.def()
    }
}

impl Related<super::gw2_session_character::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Characters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
