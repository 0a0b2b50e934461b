//! Gateway event handler for custom command invocations.
//!
//! Every guild message starting with the configured prefix is checked against
//! the guild's custom commands. Messages that name a built-in command are left
//! to the framework.

use crate::{
    bot::BotData,
    core::custom_command,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Whether `name` is taken by a built-in command or one of its aliases.
#[must_use]
pub fn is_builtin_command(commands: &[poise::Command<BotData, Error>], name: &str) -> bool {
    commands
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(name) || c.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
}

/// Framework event handler.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!(
                "Connected to {} guild(s) as {}",
                data_about_bot.guilds.len(),
                data_about_bot.user.name
            );
        }
        serenity::FullEvent::Message { new_message } => {
            handle_message(ctx, new_message, framework, data).await?;
        }
        _ => {}
    }
    Ok(())
}

async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if message.author.bot {
        return Ok(());
    }
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };
    let Some(name) = custom_command::parse_invocation(&message.content, &data.settings.prefix)
    else {
        return Ok(());
    };
    if is_builtin_command(&framework.options().commands, &name) {
        return Ok(());
    }

    let guild_id = guild_id.to_string();
    let Some(command) = custom_command::get_command(&data.database, &guild_id, &name).await? else {
        debug!(%guild_id, %name, "No custom command matched");
        return Ok(());
    };

    message.channel_id.say(&ctx.http, &command.content).await?;
    custom_command::record_use(&data.database, command.id).await?;
    info!(%guild_id, %name, user = %message.author.name, "Custom command triggered");
    Ok(())
}
