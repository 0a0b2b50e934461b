//! Unified error types for Guildmate.
//!
//! Every fallible operation in the crate returns [`Result`]. Domain failures
//! (unknown command, missing API key, no active session...) have their own
//! variants so the bot layer can turn them into friendly replies, while
//! infrastructure failures are wrapped with `#[from]`.

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database failure reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A custom command lookup came up empty
    #[error("Custom command '{name}' not found")]
    CommandNotFound {
        /// Normalized command name
        name: String,
    },

    /// The guild already has a custom command with this name
    #[error("Custom command '{name}' already exists")]
    CommandAlreadyExists {
        /// Normalized command name
        name: String,
    },

    /// Command name failed validation
    #[error("Invalid command name '{name}': {reason}")]
    InvalidCommandName {
        /// Name as supplied by the user
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Command response text failed validation
    #[error("Invalid command content: {reason}")]
    InvalidCommandContent {
        /// Why it was rejected
        reason: String,
    },

    /// The user has not registered a GW2 API key
    #[error("No Guild Wars 2 API key registered")]
    ApiKeyNotFound,

    /// The GW2 API rejected the key
    #[error("Invalid Guild Wars 2 API key")]
    InvalidApiKey,

    /// The key lacks permissions required by the operation
    #[error("API key is missing permissions: {}", missing.join(", "))]
    MissingPermissions {
        /// Permissions that were not granted
        missing: Vec<String>,
    },

    /// Non-success response from the GW2 API
    #[error("Guild Wars 2 API error ({status}): {message}")]
    Gw2Api {
        /// HTTP status code
        status: u16,
        /// Error text returned by the API
        message: String,
    },

    /// `end` was requested without an open session
    #[error("No active Guild Wars 2 session")]
    NoActiveSession,

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Building a message string failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error bubbled up from serenity/poise
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the error is caused by user input or state rather than a fault.
    ///
    /// These are shown to the user verbatim and logged at `warn` instead of `error`.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::CommandNotFound { .. }
                | Self::CommandAlreadyExists { .. }
                | Self::InvalidCommandName { .. }
                | Self::InvalidCommandContent { .. }
                | Self::ApiKeyNotFound
                | Self::InvalidApiKey
                | Self::MissingPermissions { .. }
                | Self::NoActiveSession
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
