//! Custom command Discord commands - the `cc` command group.
//!
//! Moderators (Manage Messages) add, edit and remove server-scoped text
//! responses; everyone can list them and inspect one. Invoking a custom command
//! is handled by the message listener in `bot::handlers::messages`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, EMBED_COLOR,
            handlers::{autocomplete, messages::is_builtin_command, paginator},
        },
        core::{custom_command, pagination::Pager},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    type Context<'a> = poise::Context<'a, BotData, Error>;

    /// Guild of the invocation; `guild_only` guarantees it is present.
    fn guild_key(ctx: Context<'_>) -> Result<String> {
        ctx.guild_id()
            .map(|id| id.to_string())
            .ok_or_else(|| Error::Config {
                message: "custom commands are only available in servers".to_string(),
            })
    }

    /// Manage this server's custom commands.
    ///
    /// Custom commands are text responses triggered by the bot prefix followed
    /// by the command name, e.g. `!rules`.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        subcommands(
            "cc_add",
            "cc_edit",
            "cc_remove",
            "cc_remove_all",
            "cc_list",
            "cc_info"
        )
    )]
    pub async fn cc(ctx: Context<'_>) -> Result<()> {
        let prefix = &ctx.data().settings.prefix;
        let help_text = format!(
            "Custom command management. Available subcommands:\n\
            `cc add <name> <response>` - Create a command\n\
            `cc edit <name> <response>` - Change a command's response\n\
            `cc remove <name>` - Delete a command\n\
            `cc removeall` - Delete every command of this server\n\
            `cc list` - List this server's commands\n\
            `cc info <name>` - Show details of a command\n\n\
            Trigger a command by typing `{prefix}<name>`."
        );
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a custom command for this server.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        rename = "add",
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn cc_add(
        ctx: Context<'_>,
        #[description = "Command name (letters, digits, '_' and '-')"] name: String,
        #[description = "Text the bot replies with"]
        #[rest]
        response: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = &ctx.data().settings;
        let name = custom_command::normalize_name(&name, &settings.prefix)?;

        if is_builtin_command(&ctx.framework().options().commands, &name) {
            ctx.say(format!(
                "❌ `{name}` is a built-in command and cannot be used as a custom command name."
            ))
            .await?;
            return Ok(());
        }

        let db = &ctx.data().database;
        let author_id = ctx.author().id.to_string();
        let created =
            custom_command::create_command(db, &guild_id, &name, &response, &author_id).await?;

        ctx.say(format!(
            "✅ Custom command `{}{}` created.",
            settings.prefix, created.name
        ))
        .await?;
        Ok(())
    }

    /// Changes the response of an existing custom command.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        rename = "edit",
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn cc_edit(
        ctx: Context<'_>,
        #[description = "Command to edit"]
        #[autocomplete = "autocomplete::autocomplete_custom_command"]
        name: String,
        #[description = "New response text"]
        #[rest]
        response: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = &ctx.data().settings;
        let name = custom_command::normalize_name(&name, &settings.prefix)?;
        let editor_id = ctx.author().id.to_string();

        let updated = custom_command::update_command(
            &ctx.data().database,
            &guild_id,
            &name,
            &response,
            &editor_id,
        )
        .await?;

        ctx.say(format!(
            "✅ Custom command `{}{}` updated.",
            settings.prefix, updated.name
        ))
        .await?;
        Ok(())
    }

    /// Deletes a custom command from this server.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        rename = "remove",
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn cc_remove(
        ctx: Context<'_>,
        #[description = "Command to delete"]
        #[autocomplete = "autocomplete::autocomplete_custom_command"]
        name: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = &ctx.data().settings;
        let name = custom_command::normalize_name(&name, &settings.prefix)?;

        custom_command::delete_command(&ctx.data().database, &guild_id, &name).await?;

        ctx.say(format!(
            "✅ Custom command `{}{name}` deleted.",
            settings.prefix
        ))
        .await?;
        Ok(())
    }

    /// Deletes every custom command of this server.
    ///
    /// Asks for confirmation with buttons before deleting anything.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        rename = "removeall",
        required_permissions = "MANAGE_MESSAGES"
    )]
    pub async fn cc_remove_all(ctx: Context<'_>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let db = &ctx.data().database;

        let count = custom_command::list_commands(db, &guild_id).await?.len();
        if count == 0 {
            ctx.say("ℹ️ This server has no custom commands.").await?;
            return Ok(());
        }

        let ctx_id = ctx.id();
        let confirm_id = format!("{ctx_id}confirm");
        let cancel_id = format!("{ctx_id}cancel");
        let buttons = serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&confirm_id)
                .label("Delete all")
                .style(serenity::ButtonStyle::Danger),
            serenity::CreateButton::new(&cancel_id)
                .label("Cancel")
                .style(serenity::ButtonStyle::Secondary),
        ]);
        let handle = ctx
            .send(
                poise::CreateReply::default()
                    .content(format!(
                        "⚠️ Delete all {count} custom command(s) of this server?"
                    ))
                    .components(vec![buttons]),
            )
            .await?;

        let author_id = ctx.author().id;
        let id_prefix = ctx_id.to_string();
        let press = serenity::ComponentInteractionCollector::new(ctx.serenity_context())
            .author_id(author_id)
            .filter(move |press| press.data.custom_id.starts_with(&id_prefix))
            .timeout(std::time::Duration::from_secs(60))
            .await;

        let outcome = match press {
            Some(press) if press.data.custom_id == confirm_id => {
                press
                    .create_response(ctx.serenity_context(), serenity::CreateInteractionResponse::Acknowledge)
                    .await?;
                let removed = custom_command::delete_all_commands(db, &guild_id).await?;
                format!("✅ Deleted {removed} custom command(s).")
            }
            Some(press) => {
                press
                    .create_response(ctx.serenity_context(), serenity::CreateInteractionResponse::Acknowledge)
                    .await?;
                "Cancelled.".to_string()
            }
            None => "Timed out, nothing was deleted.".to_string(),
        };

        handle
            .edit(
                ctx,
                poise::CreateReply::default()
                    .content(outcome)
                    .components(Vec::new()),
            )
            .await?;
        Ok(())
    }

    /// Lists this server's custom commands.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "list")]
    pub async fn cc_list(ctx: Context<'_>) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = &ctx.data().settings;
        let commands = custom_command::list_commands(&ctx.data().database, &guild_id).await?;

        let lines: Vec<String> = commands
            .iter()
            .map(|c| format!("`{}{}` ({} uses)", settings.prefix, c.name, c.uses))
            .collect();
        let pager = Pager::new(
            &lines,
            settings.pagination.page_size,
            "No custom commands yet. Create one with `cc add`.",
        );

        let title = format!("Custom Commands ({})", commands.len());
        paginator::paginate(ctx, &title, EMBED_COLOR, pager, false).await
    }

    /// Shows the response and history of a custom command.
    #[poise::command(slash_command, prefix_command, guild_only, rename = "info")]
    pub async fn cc_info(
        ctx: Context<'_>,
        #[description = "Command to inspect"]
        #[autocomplete = "autocomplete::autocomplete_custom_command"]
        name: String,
    ) -> Result<()> {
        let guild_id = guild_key(ctx)?;
        let settings = &ctx.data().settings;
        let name = custom_command::normalize_name(&name, &settings.prefix)?;

        let Some(command) =
            custom_command::get_command(&ctx.data().database, &guild_id, &name).await?
        else {
            return Err(Error::CommandNotFound { name });
        };

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("{}{}", settings.prefix, command.name))
            .description(&command.content)
            .color(EMBED_COLOR)
            .field("Created by", format!("<@{}>", command.created_by), true)
            .field("Uses", command.uses.to_string(), true)
            .field(
                "Created",
                format!("<t:{}:R>", command.created_at.timestamp()),
                true,
            );
        if let Some(editor) = &command.updated_by {
            embed = embed
                .field("Last edited by", format!("<@{editor}>"), true)
                .field(
                    "Edited",
                    format!("<t:{}:R>", command.updated_at.timestamp()),
                    true,
                );
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
