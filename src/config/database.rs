//! Database configuration module for Guildmate.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation is idempotent and safe to run on every startup.

use crate::entities::{
    CustomCommand, CustomCommandColumn, Gw2ApiKey, Gw2Session, Gw2SessionCharacter,
    Gw2SessionCharacterColumn, Gw2SessionSnapshot, Gw2SessionSnapshotColumn,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://guildmate.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file (created on first use) if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .if_not_exists()
            .name("idx_custom_commands_guild_name")
            .table(CustomCommand)
            .col(CustomCommandColumn::GuildId)
            .col(CustomCommandColumn::Name)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_gw2_session_snapshots_session_phase")
            .table(Gw2SessionSnapshot)
            .col(Gw2SessionSnapshotColumn::SessionId)
            .col(Gw2SessionSnapshotColumn::Phase)
            .unique()
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_gw2_session_characters_session_name")
            .table(Gw2SessionCharacter)
            .col(Gw2SessionCharacterColumn::SessionId)
            .col(Gw2SessionCharacterColumn::Name)
            .unique()
            .to_owned(),
    ]
}

/// Creates all tables and unique indexes if they do not exist yet.
///
/// Covers custom commands, GW2 API keys, sessions, session snapshots and
/// session characters.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        table_for(&schema, CustomCommand),
        table_for(&schema, Gw2ApiKey),
        table_for(&schema, Gw2Session),
        table_for(&schema, Gw2SessionSnapshot),
        table_for(&schema, Gw2SessionCharacter),
    ];
    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    for index in &unique_indexes() {
        db.execute(builder.build(index)).await?;
    }

    info!("Database tables ensured ({} tables).", tables.len());
    Ok(())
}
