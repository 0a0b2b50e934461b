//! Shared test utilities for Guildmate.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{custom_command, gw2_key::KeyDetails},
    entities,
    errors::Result,
    gw2::{CharacterDeaths, Snapshot},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Guild used by most tests
pub const GUILD_A: &str = "100000000000000001";
/// Second guild for scoping tests
pub const GUILD_B: &str = "100000000000000002";
/// Well-formed (fake) GW2 API key
pub const TEST_API_KEY: &str =
    "A1B2C3D4-0000-1111-2222-3333444455556666AAAA-BBBB-CCCC-DDDD-EEEEFFFF0000";

/// Routes tracing output to the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a custom command with a default response.
///
/// # Defaults
/// * `content`: `"Response for <name>"`
/// * `author`: `"test_user"`
pub async fn create_test_command(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<entities::custom_command::Model> {
    custom_command::create_command(
        db,
        guild_id,
        name,
        &format!("Response for {name}"),
        "test_user",
    )
    .await
}

/// Key details for [`TEST_API_KEY`] with the given comma separated permissions.
pub fn test_key_details(permissions: &str) -> KeyDetails {
    KeyDetails {
        api_key: TEST_API_KEY.to_string(),
        key_name: "test key".to_string(),
        account_name: "Sample.1234".to_string(),
        world: "Gandara".to_string(),
        permissions: permissions.split(',').map(str::to_string).collect(),
    }
}

/// Fixed reference time all snapshots are offset from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A character death counter.
pub fn test_character(name: &str, profession: &str, deaths: i64) -> CharacterDeaths {
    CharacterDeaths {
        name: name.to_string(),
        profession: profession.to_string(),
        deaths,
    }
}

/// A snapshot taken `minutes` after [`base_time`] with fixed counters and
/// two characters (`Tank Guy` first).
pub fn test_snapshot(minutes: i64) -> Snapshot {
    Snapshot {
        taken_at: base_time() + Duration::minutes(minutes),
        account_name: "Sample.1234".to_string(),
        coins: 50_00_00,
        karma: 100_000,
        laurels: 20,
        badges_of_honor: 300,
        guild_commendations: 10,
        wvw_tickets: 40,
        proofs_of_heroics: 5,
        testimonies_of_heroics: 6,
        wvw_rank: 150,
        players_killed: 1000,
        yaks_escorted: 50,
        yaks_killed: 60,
        camps_captured: 70,
        castles_captured: 3,
        towers_captured: 20,
        keeps_captured: 8,
        characters: vec![
            test_character("Tank Guy", "Guardian", 100),
            test_character("Sneaky", "Thief", 250),
        ],
    }
}
