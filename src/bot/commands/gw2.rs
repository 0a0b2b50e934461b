//! Guild Wars 2 Discord commands - API keys, account info and play sessions.
//!
//! `gw2 key` registers the API key every other command reads from. Key
//! replies are ephemeral and key commands are slash-only so keys never end up
//! in a public channel. `gw2 session start`/`end` snapshot the account and
//! report what changed in between.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_COLOR},
        core::{
            gw2_key::{self, KeyDetails},
            session::{self, SessionSummary},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::{info, warn};

    type Context<'a> = poise::Context<'a, BotData, Error>;

    const SUCCESS_COLOR: u32 = 0x002E_CC71;
    const WARNING_COLOR: u32 = 0x00F1_C40F;

    /// Renders `Label: +n` lines for every non-zero counter.
    #[must_use]
    pub fn counter_lines(counters: &[(&str, i64)]) -> String {
        counters
            .iter()
            .filter(|(_, value)| *value != 0)
            .map(|(label, value)| format!("{label}: {value:+}\n"))
            .collect()
    }

    /// Embed reporting a finished session.
    #[must_use]
    pub fn summary_embed(title: &str, summary: &SessionSummary) -> serenity::CreateEmbed {
        let delta = &summary.delta;
        let mut embed = serenity::CreateEmbed::new()
            .title(title)
            .description(format!(
                "**{}** played for **{}**",
                summary.session.account_name,
                session::format_duration(delta.duration)
            ))
            .color(SUCCESS_COLOR)
            .field("Gold", session::format_coins(delta.coins), true)
            .field("Deaths", summary.total_deaths().to_string(), true);

        let currencies = counter_lines(&delta.currencies());
        if !currencies.is_empty() {
            embed = embed.field("Currencies", currencies, false);
        }
        let wvw = counter_lines(&delta.wvw());
        if !wvw.is_empty() {
            embed = embed.field("World vs. World", wvw, false);
        }
        if !summary.characters.is_empty() {
            let deaths = summary
                .characters
                .iter()
                .map(|c| format!("{} ({}): {}\n", c.name, c.profession, c.deaths))
                .collect::<String>();
            embed = embed.field("Deaths per character", deaths, false);
        }

        embed.footer(serenity::CreateEmbedFooter::new(format!(
            "Session #{}",
            summary.session.id
        )))
    }

    /// Guild Wars 2 companion commands.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("gw2_key", "gw2_account", "gw2_session")
    )]
    pub async fn gw2(ctx: Context<'_>) -> Result<()> {
        ctx.say(
            "Guild Wars 2 commands:\n\
            `/gw2 key add <key>` - Register your API key\n\
            `/gw2 key info` - Show your registered key\n\
            `/gw2 key remove` - Forget your key\n\
            `gw2 account` - Show your account\n\
            `gw2 session start` - Start tracking a play session\n\
            `gw2 session end` - End the session and show the results\n\
            `gw2 session last` - Show your last finished session",
        )
        .await?;
        Ok(())
    }

    /// Manage your Guild Wars 2 API key.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "key",
        subcommands("gw2_key_add", "gw2_key_remove", "gw2_key_info")
    )]
    pub async fn gw2_key(ctx: Context<'_>) -> Result<()> {
        ctx.say("Use `/gw2 key add`, `/gw2 key info` or `/gw2 key remove`. Key commands are slash-only to keep your key private.")
            .await?;
        Ok(())
    }

    /// Registers (or replaces) your Guild Wars 2 API key.
    ///
    /// Create a key at https://account.arena.net/applications. Sessions need
    /// the account, wallet, progression and characters permissions.
    #[poise::command(slash_command, rename = "add", ephemeral)]
    pub async fn gw2_key_add(
        ctx: Context<'_>,
        #[description = "Your API key from account.arena.net"] key: String,
    ) -> Result<()> {
        let key = key.trim().to_string();
        if !gw2_key::looks_like_api_key(&key) {
            ctx.say("❌ That does not look like a Guild Wars 2 API key.")
                .await?;
            return Ok(());
        }

        ctx.defer_ephemeral().await?;
        let client = &ctx.data().gw2;

        let token = client.token_info(&key).await?;
        let missing = gw2_key::missing_permissions(&token.permissions, gw2_key::ACCOUNT_PERMISSIONS);
        if !missing.is_empty() {
            return Err(Error::MissingPermissions { missing });
        }

        let account = client.account(&key).await?;
        let world = match client.world(account.world).await {
            Ok(world) => world.name,
            Err(e) => {
                warn!(world_id = account.world, "World lookup failed: {e}");
                account.world.to_string()
            }
        };

        let user_id = ctx.author().id.to_string();
        let saved = gw2_key::upsert_key(
            &ctx.data().database,
            &user_id,
            KeyDetails {
                api_key: key,
                key_name: token.name,
                account_name: account.name,
                world,
                permissions: token.permissions,
            },
        )
        .await?;

        let mut reply = format!(
            "✅ Key `{}` registered for **{}** ({}).",
            gw2_key::mask_key(&saved.api_key),
            saved.account_name,
            saved.world
        );
        let session_missing =
            gw2_key::missing_permissions(&gw2_key::stored_permissions(&saved), gw2_key::SESSION_PERMISSIONS);
        if !session_missing.is_empty() {
            write!(
                reply,
                "\n⚠️ Sessions will not work, the key is missing: {}",
                session_missing.join(", ")
            )?;
        }

        ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Forgets your Guild Wars 2 API key.
    #[poise::command(slash_command, rename = "remove", ephemeral)]
    pub async fn gw2_key_remove(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        if !gw2_key::delete_key(&ctx.data().database, &user_id).await? {
            return Err(Error::ApiKeyNotFound);
        }
        ctx.say("✅ Your API key has been removed.").await?;
        Ok(())
    }

    /// Shows the API key registered for you.
    #[poise::command(slash_command, rename = "info", ephemeral)]
    pub async fn gw2_key_info(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let key = gw2_key::require_key(&ctx.data().database, &user_id).await?;

        let embed = serenity::CreateEmbed::new()
            .title("Guild Wars 2 API key")
            .color(EMBED_COLOR)
            .field("Key", gw2_key::mask_key(&key.api_key), false)
            .field("Name", &key.key_name, true)
            .field("Account", &key.account_name, true)
            .field("World", &key.world, true)
            .field("Permissions", key.permissions.replace(',', ", "), false)
            .field(
                "Registered",
                format!("<t:{}:R>", key.updated_at.timestamp()),
                true,
            );

        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Shows your Guild Wars 2 account.
    #[poise::command(slash_command, prefix_command, rename = "account")]
    pub async fn gw2_account(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let key = gw2_key::require_key(&ctx.data().database, &user_id).await?;
        ctx.defer().await?;

        let account = ctx.data().gw2.account(&key.api_key).await?;
        // The world stored with the key goes stale after a transfer
        let world = match ctx.data().gw2.world(account.world).await {
            Ok(world) => world.name,
            Err(e) => {
                warn!(world_id = account.world, "World lookup failed: {e}");
                account.world.to_string()
            }
        };

        let age = i64::try_from(account.age)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_default();
        let mut embed = serenity::CreateEmbed::new()
            .title(&account.name)
            .color(EMBED_COLOR)
            .field("World", world, true)
            .field("Played", session::format_duration(age), true)
            .field(
                "Commander",
                if account.commander { "Yes" } else { "No" },
                true,
            );
        if let Some(rank) = account.wvw_rank {
            embed = embed.field("WvW rank", rank.to_string(), true);
        }
        if let Some(created) = account.created {
            embed = embed.field("Created", format!("<t:{}:D>", created.timestamp()), true);
        }
        if !account.access.is_empty() {
            embed = embed.field("Access", account.access.join(", "), false);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Track a play session.
    #[poise::command(
        slash_command,
        prefix_command,
        rename = "session",
        subcommands("gw2_session_start", "gw2_session_end", "gw2_session_last")
    )]
    pub async fn gw2_session(ctx: Context<'_>) -> Result<()> {
        ctx.say("Use `gw2 session start` before playing and `gw2 session end` afterwards.")
            .await?;
        Ok(())
    }

    /// Starts a session by taking a snapshot of your account.
    #[poise::command(slash_command, prefix_command, rename = "start")]
    pub async fn gw2_session_start(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let key = gw2_key::require_key(&ctx.data().database, &user_id).await?;
        gw2_key::require_permissions(&key, gw2_key::SESSION_PERMISSIONS)?;
        ctx.defer().await?;

        let snapshot = ctx.data().gw2.fetch_snapshot(&key.api_key).await?;
        let started = session::start_session(&ctx.data().database, &user_id, &snapshot).await?;

        let mut description = format!(
            "Tracking **{}** with {} character(s). Use `gw2 session end` when you are done.",
            snapshot.account_name,
            snapshot.characters.len()
        );
        if let Some(discarded) = started.discarded_session_id {
            write!(
                description,
                "\n⚠️ Your unfinished session #{discarded} was discarded."
            )?;
        }

        let embed = serenity::CreateEmbed::new()
            .title("Session started")
            .description(description)
            .color(if started.discarded_session_id.is_some() {
                WARNING_COLOR
            } else {
                SUCCESS_COLOR
            })
            .field("Gold", session::format_coins(snapshot.coins), true)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Session #{}",
                started.session.id
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Ends your session and shows what changed.
    #[poise::command(slash_command, prefix_command, rename = "end")]
    pub async fn gw2_session_end(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;
        let key = gw2_key::require_key(db, &user_id).await?;
        if session::active_session(db, &user_id).await?.is_none() {
            return Err(Error::NoActiveSession);
        }
        ctx.defer().await?;

        let snapshot = ctx.data().gw2.fetch_snapshot(&key.api_key).await?;
        let summary = session::end_session(db, &user_id, &snapshot).await?;
        info!(
            %user_id,
            session_id = summary.session.id,
            coins = summary.delta.coins,
            "Reporting ended session"
        );

        ctx.send(poise::CreateReply::default().embed(summary_embed("Session ended", &summary)))
            .await?;
        Ok(())
    }

    /// Shows your most recent finished session.
    #[poise::command(slash_command, prefix_command, rename = "last")]
    pub async fn gw2_session_last(ctx: Context<'_>) -> Result<()> {
        let user_id = ctx.author().id.to_string();
        let Some(summary) = session::last_session_summary(&ctx.data().database, &user_id).await?
        else {
            ctx.say("ℹ️ You have no finished sessions yet. Start one with `gw2 session start`.")
                .await?;
            return Ok(());
        };

        ctx.send(poise::CreateReply::default().embed(summary_embed("Last session", &summary)))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
