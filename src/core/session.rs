//! GW2 play session business logic.
//!
//! A session correlates two API snapshots of the same account. `start` stores
//! the first snapshot and per-character death counts; `end` attaches the second
//! snapshot to the user's most recently started session, provided it is still
//! open. The delta between both snapshots is what the bot reports.

use crate::{
    entities::{
        Gw2Session, Gw2SessionCharacter, Gw2SessionSnapshot, gw2_session, gw2_session_character,
        gw2_session_snapshot::{self, PHASE_END, PHASE_START},
    },
    errors::{Error, Result},
    gw2::Snapshot,
};
use chrono::Duration;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Outcome of [`start_session`]
#[derive(Debug, Clone)]
pub struct SessionStart {
    /// The newly opened session
    pub session: gw2_session::Model,
    /// Open session that was discarded to make room for this one
    pub discarded_session_id: Option<i64>,
}

/// Change of every tracked counter between the start and end snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDelta {
    /// Time between both snapshots
    pub duration: Duration,
    /// Coins, in copper
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
    /// WvW ranks gained
    pub wvw_rank: i64,
    /// Players killed
    pub players_killed: i64,
    /// Yaks escorted
    pub yaks_escorted: i64,
    /// Yaks killed
    pub yaks_killed: i64,
    /// Camps captured
    pub camps_captured: i64,
    /// Castles captured
    pub castles_captured: i64,
    /// Towers captured
    pub towers_captured: i64,
    /// Keeps captured
    pub keeps_captured: i64,
}

impl SessionDelta {
    /// Computes `end - start` for every counter.
    #[must_use]
    pub fn between(start: &gw2_session_snapshot::Model, end: &gw2_session_snapshot::Model) -> Self {
        Self {
            duration: end.taken_at - start.taken_at,
            coins: end.coins - start.coins,
            karma: end.karma - start.karma,
            laurels: end.laurels - start.laurels,
            badges_of_honor: end.badges_of_honor - start.badges_of_honor,
            guild_commendations: end.guild_commendations - start.guild_commendations,
            wvw_tickets: end.wvw_tickets - start.wvw_tickets,
            proofs_of_heroics: end.proofs_of_heroics - start.proofs_of_heroics,
            testimonies_of_heroics: end.testimonies_of_heroics - start.testimonies_of_heroics,
            wvw_rank: end.wvw_rank - start.wvw_rank,
            players_killed: end.players_killed - start.players_killed,
            yaks_escorted: end.yaks_escorted - start.yaks_escorted,
            yaks_killed: end.yaks_killed - start.yaks_killed,
            camps_captured: end.camps_captured - start.camps_captured,
            castles_captured: end.castles_captured - start.castles_captured,
            towers_captured: end.towers_captured - start.towers_captured,
            keeps_captured: end.keeps_captured - start.keeps_captured,
        }
    }

    /// Wallet counters other than coins, labelled for display
    #[must_use]
    pub fn currencies(&self) -> [(&'static str, i64); 7] {
        [
            ("Karma", self.karma),
            ("Laurels", self.laurels),
            ("Badges of Honor", self.badges_of_honor),
            ("Guild Commendations", self.guild_commendations),
            ("WvW Tickets", self.wvw_tickets),
            ("Proofs of Heroics", self.proofs_of_heroics),
            ("Testimonies of Heroics", self.testimonies_of_heroics),
        ]
    }

    /// WvW counters, labelled for display
    #[must_use]
    pub fn wvw(&self) -> [(&'static str, i64); 8] {
        [
            ("WvW Ranks", self.wvw_rank),
            ("Players Killed", self.players_killed),
            ("Yaks Escorted", self.yaks_escorted),
            ("Yaks Killed", self.yaks_killed),
            ("Camps Captured", self.camps_captured),
            ("Towers Captured", self.towers_captured),
            ("Keeps Captured", self.keeps_captured),
            ("Castles Captured", self.castles_captured),
        ]
    }
}

/// Deaths of one character during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDelta {
    /// Character name
    pub name: String,
    /// Profession
    pub profession: String,
    /// Deaths during the session
    pub deaths: i64,
}

/// Everything needed to report a finished session
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// The session row
    pub session: gw2_session::Model,
    /// Snapshot taken at start
    pub start: gw2_session_snapshot::Model,
    /// Snapshot taken at end
    pub end: gw2_session_snapshot::Model,
    /// Counter changes
    pub delta: SessionDelta,
    /// Characters that died at least once, most deaths first
    pub characters: Vec<CharacterDelta>,
}

impl SessionSummary {
    /// Sum of deaths over all characters
    #[must_use]
    pub fn total_deaths(&self) -> i64 {
        self.characters.iter().map(|c| c.deaths).sum()
    }
}

/// Computes per-character deaths, keeping only characters that died.
///
/// Characters without an end count (deleted mid-session) are skipped.
#[must_use]
pub fn character_deaths(rows: &[gw2_session_character::Model]) -> Vec<CharacterDelta> {
    let mut deltas: Vec<CharacterDelta> = rows
        .iter()
        .filter_map(|row| {
            let deaths = row.deaths_end? - row.deaths_start;
            (deaths > 0).then(|| CharacterDelta {
                name: row.name.clone(),
                profession: row.profession.clone(),
                deaths,
            })
        })
        .collect();
    deltas.sort_by(|a, b| b.deaths.cmp(&a.deaths).then_with(|| a.name.cmp(&b.name)));
    deltas
}

/// Formats a copper amount as `1g 02s 03c`, omitting leading zero units.
#[must_use]
pub fn format_coins(copper: i64) -> String {
    let sign = if copper < 0 { "-" } else { "" };
    let abs = copper.unsigned_abs();
    let gold = abs / 10_000;
    let silver = (abs / 100) % 100;
    let copper = abs % 100;

    if gold > 0 {
        format!("{sign}{gold}g {silver:02}s {copper:02}c")
    } else if silver > 0 {
        format!("{sign}{silver}s {copper:02}c")
    } else {
        format!("{sign}{copper}c")
    }
}

/// Formats a session length as `2h 05m` or `12m 30s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else {
        format!("{minutes}m {seconds:02}s")
    }
}

fn snapshot_row(
    session_id: i64,
    phase: &str,
    snapshot: &Snapshot,
) -> gw2_session_snapshot::ActiveModel {
    gw2_session_snapshot::ActiveModel {
        session_id: Set(session_id),
        phase: Set(phase.to_string()),
        taken_at: Set(snapshot.taken_at),
        coins: Set(snapshot.coins),
        karma: Set(snapshot.karma),
        laurels: Set(snapshot.laurels),
        badges_of_honor: Set(snapshot.badges_of_honor),
        guild_commendations: Set(snapshot.guild_commendations),
        wvw_tickets: Set(snapshot.wvw_tickets),
        proofs_of_heroics: Set(snapshot.proofs_of_heroics),
        testimonies_of_heroics: Set(snapshot.testimonies_of_heroics),
        wvw_rank: Set(snapshot.wvw_rank),
        players_killed: Set(snapshot.players_killed),
        yaks_escorted: Set(snapshot.yaks_escorted),
        yaks_killed: Set(snapshot.yaks_killed),
        camps_captured: Set(snapshot.camps_captured),
        castles_captured: Set(snapshot.castles_captured),
        towers_captured: Set(snapshot.towers_captured),
        keeps_captured: Set(snapshot.keeps_captured),
        ..Default::default()
    }
}

/// The user's most recently started session, open or not.
async fn latest_session<C>(db: &C, user_id: &str) -> Result<Option<gw2_session::Model>>
where
    C: ConnectionTrait,
{
    Gw2Session::find()
        .filter(gw2_session::Column::UserId.eq(user_id))
        .order_by_desc(gw2_session::Column::StartedAt)
        .order_by_desc(gw2_session::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a session together with its snapshots and characters.
async fn delete_session<C>(db: &C, session_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Gw2SessionSnapshot::delete_many()
        .filter(gw2_session_snapshot::Column::SessionId.eq(session_id))
        .exec(db)
        .await?;
    Gw2SessionCharacter::delete_many()
        .filter(gw2_session_character::Column::SessionId.eq(session_id))
        .exec(db)
        .await?;
    Gw2Session::delete_by_id(session_id).exec(db).await?;
    Ok(())
}

/// Returns the user's open session, if the most recent one has not ended.
pub async fn active_session(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<gw2_session::Model>> {
    Ok(latest_session(db, user_id)
        .await?
        .filter(|session| session.ended_at.is_none()))
}

/// Opens a new session from a start snapshot.
///
/// An open session left behind by an earlier `start` is discarded, so `end`
/// always pairs with the most recent start.
#[instrument(skip(db, snapshot), fields(account = %snapshot.account_name))]
pub async fn start_session(
    db: &DatabaseConnection,
    user_id: &str,
    snapshot: &Snapshot,
) -> Result<SessionStart> {
    let txn = db.begin().await?;

    let discarded_session_id = match latest_session(&txn, user_id).await? {
        Some(open) if open.ended_at.is_none() => {
            warn!(user_id, session_id = open.id, "Discarding unfinished session");
            delete_session(&txn, open.id).await?;
            Some(open.id)
        }
        _ => None,
    };

    let session = gw2_session::ActiveModel {
        user_id: Set(user_id.to_string()),
        account_name: Set(snapshot.account_name.clone()),
        started_at: Set(snapshot.taken_at),
        ended_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    snapshot_row(session.id, PHASE_START, snapshot)
        .insert(&txn)
        .await?;

    let characters: Vec<gw2_session_character::ActiveModel> = snapshot
        .characters
        .iter()
        .map(|c| gw2_session_character::ActiveModel {
            session_id: Set(session.id),
            name: Set(c.name.clone()),
            profession: Set(c.profession.clone()),
            deaths_start: Set(c.deaths),
            deaths_end: Set(None),
            ..Default::default()
        })
        .collect();
    if !characters.is_empty() {
        Gw2SessionCharacter::insert_many(characters).exec(&txn).await?;
    }

    txn.commit().await?;

    info!(user_id, session_id = session.id, "GW2 session started");
    Ok(SessionStart {
        session,
        discarded_session_id,
    })
}

/// Closes the user's most recent session with an end snapshot.
///
/// Fails with `NoActiveSession` if the user never started a session or the
/// most recent one already ended.
#[instrument(skip(db, snapshot), fields(account = %snapshot.account_name))]
pub async fn end_session(
    db: &DatabaseConnection,
    user_id: &str,
    snapshot: &Snapshot,
) -> Result<SessionSummary> {
    let txn = db.begin().await?;

    let session = latest_session(&txn, user_id)
        .await?
        .filter(|session| session.ended_at.is_none())
        .ok_or(Error::NoActiveSession)?;

    snapshot_row(session.id, PHASE_END, snapshot)
        .insert(&txn)
        .await?;

    let mut known: HashMap<String, gw2_session_character::Model> = Gw2SessionCharacter::find()
        .filter(gw2_session_character::Column::SessionId.eq(session.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|row| (row.name.clone(), row))
        .collect();

    for character in &snapshot.characters {
        if let Some(row) = known.remove(&character.name) {
            let mut active_model: gw2_session_character::ActiveModel = row.into();
            active_model.deaths_end = Set(Some(character.deaths));
            active_model.update(&txn).await?;
        } else {
            debug!(name = %character.name, "Character created during session");
            gw2_session_character::ActiveModel {
                session_id: Set(session.id),
                name: Set(character.name.clone()),
                profession: Set(character.profession.clone()),
                deaths_start: Set(0),
                deaths_end: Set(Some(character.deaths)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    let mut active_session: gw2_session::ActiveModel = session.into();
    active_session.ended_at = Set(Some(snapshot.taken_at));
    let session = active_session.update(&txn).await?;

    let summary = load_summary(&txn, session).await?;
    txn.commit().await?;

    info!(user_id, session_id = summary.session.id, "GW2 session ended");
    Ok(summary)
}

/// Summary of the user's most recent finished session.
pub async fn last_session_summary(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<SessionSummary>> {
    let session = Gw2Session::find()
        .filter(gw2_session::Column::UserId.eq(user_id))
        .filter(gw2_session::Column::EndedAt.is_not_null())
        .order_by_desc(gw2_session::Column::StartedAt)
        .order_by_desc(gw2_session::Column::Id)
        .one(db)
        .await?;

    match session {
        Some(session) => Ok(Some(load_summary(db, session).await?)),
        None => Ok(None),
    }
}

async fn load_summary<C>(db: &C, session: gw2_session::Model) -> Result<SessionSummary>
where
    C: ConnectionTrait,
{
    let snapshots = Gw2SessionSnapshot::find()
        .filter(gw2_session_snapshot::Column::SessionId.eq(session.id))
        .all(db)
        .await?;

    let find_phase = |phase: &str| {
        snapshots
            .iter()
            .find(|s| s.phase == phase)
            .cloned()
            .ok_or_else(|| {
                Error::Database(DbErr::RecordNotFound(format!(
                    "{phase} snapshot of session {}",
                    session.id
                )))
            })
    };
    let start = find_phase(PHASE_START)?;
    let end = find_phase(PHASE_END)?;

    let rows = Gw2SessionCharacter::find()
        .filter(gw2_session_character::Column::SessionId.eq(session.id))
        .all(db)
        .await?;

    Ok(SessionSummary {
        delta: SessionDelta::between(&start, &end),
        characters: character_deaths(&rows),
        session,
        start,
        end,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_format_coins() {
        assert_eq!(format_coins(0), "0c");
        assert_eq!(format_coins(7), "7c");
        assert_eq!(format_coins(1_05), "1s 05c");
        assert_eq!(format_coins(12_34_56), "12g 34s 56c");
        assert_eq!(format_coins(1_00_03), "1g 00s 03c");
        assert_eq!(format_coins(-2_50_00), "-2g 50s 00c");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(45)), "0m 45s");
        assert_eq!(format_duration(Duration::seconds(12 * 60 + 3)), "12m 03s");
        assert_eq!(format_duration(Duration::minutes(125)), "2h 05m");
        assert_eq!(format_duration(Duration::seconds(-10)), "0m 00s");
    }

    #[test]
    fn test_character_deaths_filters_and_sorts() {
        let row = |name: &str, start: i64, end: Option<i64>| gw2_session_character::Model {
            id: 0,
            session_id: 1,
            name: name.to_string(),
            profession: "Thief".to_string(),
            deaths_start: start,
            deaths_end: end,
        };
        let rows = vec![
            row("Alpha", 10, Some(12)),
            row("Bravo", 5, Some(5)),
            row("Charlie", 1, None),
            row("Delta", 0, Some(4)),
            row("Echo", 3, Some(5)),
        ];

        let deltas = character_deaths(&rows);
        let names: Vec<&str> = deltas.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Delta", "Alpha", "Echo"]);
        assert_eq!(deltas[0].deaths, 4);
    }

    #[tokio::test]
    async fn test_end_without_start_fails() -> Result<()> {
        let db = setup_test_db().await?;
        let result = end_session(&db, "user1", &test_snapshot(0)).await;
        assert!(matches!(result, Err(Error::NoActiveSession)));
        Ok(())
    }

    #[tokio::test]
    async fn test_start_and_end_session() -> Result<()> {
        let db = setup_test_db().await?;
        let start = test_snapshot(0);
        let mut end = test_snapshot(90);
        end.coins += 12_34_56;
        end.karma += 5000;
        end.wvw_rank += 2;
        end.players_killed += 17;
        end.characters[0].deaths += 3;

        let started = start_session(&db, "user1", &start).await?;
        assert!(started.discarded_session_id.is_none());
        assert_eq!(
            active_session(&db, "user1").await?.map(|s| s.id),
            Some(started.session.id)
        );

        let summary = end_session(&db, "user1", &end).await?;
        assert_eq!(summary.session.id, started.session.id);
        assert!(summary.session.ended_at.is_some());
        assert_eq!(summary.delta.duration, Duration::minutes(90));
        assert_eq!(summary.delta.coins, 12_34_56);
        assert_eq!(summary.delta.karma, 5000);
        assert_eq!(summary.delta.wvw_rank, 2);
        assert_eq!(summary.delta.players_killed, 17);
        assert_eq!(summary.delta.laurels, 0);
        assert_eq!(summary.total_deaths(), 3);
        assert_eq!(summary.characters[0].name, "Tank Guy");

        assert!(active_session(&db, "user1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_end_twice_fails() -> Result<()> {
        let db = setup_test_db().await?;
        start_session(&db, "user1", &test_snapshot(0)).await?;
        end_session(&db, "user1", &test_snapshot(30)).await?;

        let again = end_session(&db, "user1", &test_snapshot(60)).await;
        assert!(matches!(again, Err(Error::NoActiveSession)));
        Ok(())
    }

    #[tokio::test]
    async fn test_restart_discards_open_session() -> Result<()> {
        let db = setup_test_db().await?;
        let first = start_session(&db, "user1", &test_snapshot(0)).await?;
        let second = start_session(&db, "user1", &test_snapshot(10)).await?;

        assert_eq!(second.discarded_session_id, Some(first.session.id));
        assert_eq!(Gw2Session::find().all(&db).await?.len(), 1);
        assert_eq!(Gw2SessionSnapshot::find().all(&db).await?.len(), 1);

        let summary = end_session(&db, "user1", &test_snapshot(40)).await?;
        assert_eq!(summary.session.id, second.session.id);
        assert_eq!(summary.delta.duration, Duration::minutes(30));
        Ok(())
    }

    #[tokio::test]
    async fn test_end_pairs_with_most_recent_session() -> Result<()> {
        let db = setup_test_db().await?;
        start_session(&db, "user1", &test_snapshot(0)).await?;
        end_session(&db, "user1", &test_snapshot(10)).await?;
        let latest = start_session(&db, "user1", &test_snapshot(20)).await?;
        assert!(latest.discarded_session_id.is_none());

        let summary = end_session(&db, "user1", &test_snapshot(50)).await?;
        assert_eq!(summary.session.id, latest.session.id);
        assert_eq!(Gw2Session::find().all(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() -> Result<()> {
        let db = setup_test_db().await?;
        start_session(&db, "user1", &test_snapshot(0)).await?;

        let other = end_session(&db, "user2", &test_snapshot(10)).await;
        assert!(matches!(other, Err(Error::NoActiveSession)));
        assert!(active_session(&db, "user1").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_characters_created_and_deleted_mid_session() -> Result<()> {
        let db = setup_test_db().await?;
        let mut start = test_snapshot(0);
        start.characters.push(test_character("Doomed Alt", "Mesmer", 40));
        start_session(&db, "user1", &start).await?;

        let mut end = test_snapshot(60);
        end.characters.push(test_character("Fresh Alt", "Ranger", 2));
        let summary = end_session(&db, "user1", &end).await?;

        assert_eq!(summary.characters.len(), 1);
        assert_eq!(summary.characters[0].name, "Fresh Alt");
        assert_eq!(summary.characters[0].deaths, 2);

        let rows = Gw2SessionCharacter::find().all(&db).await?;
        assert_eq!(rows.len(), 4);
        let doomed = rows.iter().find(|r| r.name == "Doomed Alt").unwrap();
        assert!(doomed.deaths_end.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_last_session_summary() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(last_session_summary(&db, "user1").await?.is_none());

        start_session(&db, "user1", &test_snapshot(0)).await?;
        assert!(last_session_summary(&db, "user1").await?.is_none());

        let mut end = test_snapshot(20);
        end.laurels += 1;
        let ended = end_session(&db, "user1", &end).await?;

        // An open session does not hide the last finished one
        start_session(&db, "user1", &test_snapshot(30)).await?;

        let last = last_session_summary(&db, "user1").await?.unwrap();
        assert_eq!(last.session.id, ended.session.id);
        assert_eq!(last.delta.laurels, 1);
        Ok(())
    }
}
