//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that are not commands
//! themselves: autocomplete, gateway events and button presses.

/// Autocomplete handlers for custom command names
pub mod autocomplete;
/// Gateway event handler answering custom command invocations
pub mod messages;
/// Button paginator for long embeds
pub mod paginator;
