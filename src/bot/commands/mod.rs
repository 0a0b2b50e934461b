//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Custom command management
pub mod custom_command;

/// General utility commands
pub mod general;

/// Guild Wars 2 keys, account and sessions
pub mod gw2;

// Export commands
pub use custom_command::*;
pub use general::*;
pub use gw2::*;
