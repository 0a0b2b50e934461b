//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for Guildmate: slash and prefix
//! commands, the custom command message listener, autocomplete, the button
//! paginator, and the framework setup that wires them together.

/// Discord command implementations (general, custom commands, gw2)
pub mod commands;
/// Framework construction and error hook
pub mod framework;
/// Discord interaction handlers (autocomplete, messages, paginator)
pub mod handlers;

use crate::{config::Settings, errors::Error, gw2::Gw2Client};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Accent color of informational embeds
pub const EMBED_COLOR: u32 = 0x0034_98DB;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the GW2 API client and the
/// loaded settings.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Guild Wars 2 API client
    pub gw2: Gw2Client,
    /// Settings loaded at startup
    pub settings: Arc<Settings>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, gw2: Gw2Client, settings: Arc<Settings>) -> Self {
        Self {
            database,
            gw2,
            settings,
        }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

pub use framework::run_bot;
