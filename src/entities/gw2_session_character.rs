//! GW2 session character entity - Death counter of one character over a session.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session character database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gw2_session_characters")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Session this row belongs to
    pub session_id: i64,
    /// Character name
    pub name: String,
    /// Character profession (e.g. "Guardian")
    pub profession: String,
    /// Lifetime deaths when the session started
    pub deaths_start: i64,
    /// Lifetime deaths when the session ended
    pub deaths_end: Option<i64>,
}

/// Defines relationships between a character row and its session
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each character row belongs to one session
    #[sea_orm(
        belongs_to = "super::gw2_session::Entity",
        from = "Column::SessionId",
        to = "super::gw2_session::Column::Id"
    )]
    Session,
}

impl Related<super::gw2_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
