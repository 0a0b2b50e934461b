//! GW2 session snapshot entity - Account counters captured at one end of a session.
//!
//! Each session has a `start` snapshot and, once ended, an `end` snapshot.
//! Wallet values are raw currency amounts; `coins` is in copper.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Phase value for the snapshot taken by `session start`
pub const PHASE_START: &str = "start";
/// Phase value for the snapshot taken by `session end`
pub const PHASE_END: &str = "end";

/// Snapshot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gw2_session_snapshots")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Session this snapshot belongs to
    pub session_id: i64,
    /// `"start"` or `"end"`
    pub phase: String,
    /// When the API state was fetched
    pub taken_at: DateTimeUtc,
    /// Wallet coins, in copper
    pub coins: i64,
    /// Karma
    pub karma: i64,
    /// Laurels
    pub laurels: i64,
    /// Badges of Honor
    pub badges_of_honor: i64,
    /// Guild Commendations
    pub guild_commendations: i64,
    /// WvW Skirmish Claim Tickets
    pub wvw_tickets: i64,
    /// Proofs of Heroics
    pub proofs_of_heroics: i64,
    /// Testimonies of Heroics
    pub testimonies_of_heroics: i64,
    /// World vs World rank
    pub wvw_rank: i64,
    /// "Realm Avenger" achievement progress
    pub players_killed: i64,
    /// "A Pack Dolyak" achievement progress
    pub yaks_escorted: i64,
    /// "Dolyak Disruptor" achievement progress
    pub yaks_killed: i64,
    /// "Flipping Camps" achievement progress
    pub camps_captured: i64,
    /// "Emergency Evacuation" achievement progress
    pub castles_captured: i64,
    /// "Tower Taker" achievement progress
    pub towers_captured: i64,
    /// "Keep Conqueror" achievement progress
    pub keeps_captured: i64,
}

/// Defines relationships between a snapshot and its session
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one session
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
