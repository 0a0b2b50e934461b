//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::Context, core::custom_command};
use tracing::error;

/// Provides autocomplete suggestions for custom command names of the current guild.
///
/// Returns nothing outside of guilds or when the lookup fails; autocomplete
/// has no way to surface errors to the user.
pub async fn autocomplete_custom_command(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };
    let db = &ctx.data().database;

    match custom_command::search_command_names(db, &guild_id.to_string(), partial).await {
        Ok(names) => names,
        Err(e) => {
            error!("Autocomplete: failed to fetch custom command names: {:?}", e);
            Vec::new()
        }
    }
}
