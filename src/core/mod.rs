//! Core business logic - framework-agnostic data access and rules.
//!
//! Each module wraps the queries for one concern; the bot layer only formats
//! what these functions return.

/// Server-scoped custom commands
pub mod custom_command;
/// Registered Guild Wars 2 API keys
pub mod gw2_key;
/// Page arithmetic for long listings
pub mod pagination;
/// Guild Wars 2 play sessions
pub mod session;
