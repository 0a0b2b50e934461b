//! General Discord commands - ping and paginated help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, EMBED_COLOR, handlers::paginator},
        core::pagination::Pager,
        errors::{Error, Result},
    };

    type Command = poise::Command<BotData, Error>;

    /// Renders one help line per invocable command, descending into subcommands.
    ///
    /// `parent` is the space separated path of the enclosing command, empty at the top level.
    pub(crate) fn help_lines(commands: &[Command], prefix: &str, parent: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for command in commands {
            if command.hide_in_help {
                continue;
            }
            let path = if parent.is_empty() {
                command.name.clone()
            } else {
                format!("{parent} {}", command.name)
            };
            if command.subcommands.is_empty() {
                let description = command.description.as_deref().unwrap_or("No description");
                lines.push(format!("`{prefix}{path}`: {description}"));
            } else {
                lines.extend(help_lines(&command.subcommands, prefix, &path));
            }
        }
        lines
    }

    /// Finds a command by its space separated path, e.g. `gw2 session`.
    ///
    /// Returns the command and its normalized path.
    pub(crate) fn find_command<'a>(
        commands: &'a [Command],
        query: &str,
    ) -> Option<(&'a Command, String)> {
        let mut words = query.split_whitespace();
        let first = words.next()?;
        let mut found = commands.iter().find(|c| c.name.eq_ignore_ascii_case(first))?;
        let mut path = found.name.clone();
        for word in words {
            found = found
                .subcommands
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(word))?;
            path.push(' ');
            path.push_str(&found.name);
        }
        Some((found, path))
    }

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Shows the available commands, or details about one command.
    ///
    /// Without an argument the overview is paginated; with a command name
    /// (e.g. `gw2 session`) the command's help text and subcommands are shown.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Command to show help for"]
        #[rest]
        command: Option<String>,
    ) -> Result<()> {
        let settings = &ctx.data().settings;
        let commands = &ctx.framework().options().commands;
        let prefix = if ctx.prefix() == "/" {
            "/"
        } else {
            settings.prefix.as_str()
        };

        let (title, lines) = match command.as_deref().map(str::trim) {
            None | Some("") => ("Guildmate Help".to_string(), help_lines(commands, prefix, "")),
            Some(query) => {
                let Some((found, path)) = find_command(commands, query) else {
                    ctx.say(format!("❌ No command named `{query}`.")).await?;
                    return Ok(());
                };
                let mut lines = Vec::new();
                if let Some(text) = found.help_text.as_deref().or(found.description.as_deref()) {
                    lines.push(text.to_string());
                }
                if !found.subcommands.is_empty() {
                    lines.push(String::new());
                    lines.push("**Subcommands**".to_string());
                    lines.extend(help_lines(&found.subcommands, prefix, &path));
                }
                (format!("Help: {path}"), lines)
            }
        };

        let pager = Pager::new(&lines, settings.pagination.page_size, "No commands available.");
        paginator::paginate(ctx, &title, EMBED_COLOR, pager, false).await
    }

}

// Re-export all commands
pub use inner::*;
