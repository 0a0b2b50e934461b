//! Custom command business logic - Server-scoped text responses.
//!
//! Provides validation of command names and responses, CRUD operations scoped
//! to a guild, and parsing of chat messages into command invocations. A name
//! registered in one guild never resolves in another.

use crate::{
    entities::{CustomCommand, custom_command},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use tracing::{debug, info, instrument};

/// Longest accepted command name
pub const MAX_NAME_LENGTH: usize = 32;
/// Longest accepted response, Discord's message limit
pub const MAX_CONTENT_LENGTH: usize = 2000;
/// Discord autocomplete limit
const MAX_SUGGESTIONS: u64 = 25;

/// Normalizes a user-supplied command name.
///
/// Surrounding whitespace and a leading `prefix` are stripped and the result
/// is lowercased. Valid names are 1 to [`MAX_NAME_LENGTH`] characters of
/// ASCII letters, digits, `_` and `-`.
pub fn normalize_name(raw: &str, prefix: &str) -> Result<String> {
    let trimmed = raw.trim();
    let stripped = if prefix.is_empty() {
        trimmed
    } else {
        trimmed.strip_prefix(prefix).unwrap_or(trimmed)
    };
    let name = stripped.to_lowercase();

    let invalid = |reason: &str| Error::InvalidCommandName {
        name: raw.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(&format!(
            "name cannot be longer than {MAX_NAME_LENGTH} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(invalid(
            "only letters, digits, '_' and '-' are allowed",
        ));
    }

    Ok(name)
}

/// Validates and trims a command response.
pub fn validate_content(raw: &str) -> Result<String> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(Error::InvalidCommandContent {
            reason: "response cannot be empty".to_string(),
        });
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(Error::InvalidCommandContent {
            reason: format!("response cannot be longer than {MAX_CONTENT_LENGTH} characters"),
        });
    }
    Ok(content.to_string())
}

/// Extracts the command name from a chat message such as `!rules please`.
///
/// Returns `None` when the message does not start with `prefix` or the first
/// word is not a valid command name.
#[must_use]
pub fn parse_invocation(content: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let rest = content.trim_start().strip_prefix(prefix)?;
    let word = rest.split_whitespace().next()?;
    // "! rules" is not an invocation
    if !rest.starts_with(word) {
        return None;
    }
    normalize_name(word, "").ok()
}

/// Finds a command by guild and normalized name.
pub async fn get_command(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
) -> Result<Option<custom_command::Model>> {
    CustomCommand::find()
        .filter(custom_command::Column::GuildId.eq(guild_id))
        .filter(custom_command::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every command of a guild, ordered by name.
pub async fn list_commands(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Vec<custom_command::Model>> {
    CustomCommand::find()
        .filter(custom_command::Column::GuildId.eq(guild_id))
        .order_by_asc(custom_command::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Escapes `LIKE` metacharacters so `partial` matches literally.
fn like_literal(partial: &str) -> String {
    let mut escaped = String::with_capacity(partial.len());
    for c in partial.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Returns up to 25 command names of a guild containing `partial`, for autocomplete.
pub async fn search_command_names(
    db: &DatabaseConnection,
    guild_id: &str,
    partial: &str,
) -> Result<Vec<String>> {
    let partial = partial.trim().to_lowercase();
    let mut query = CustomCommand::find().filter(custom_command::Column::GuildId.eq(guild_id));
    if !partial.is_empty() {
        let pattern = format!("%{}%", like_literal(&partial));
        query = query.filter(
            Expr::col(custom_command::Column::Name).like(LikeExpr::new(pattern).escape('\\')),
        );
    }

    let commands = query
        .order_by_asc(custom_command::Column::Name)
        .limit(MAX_SUGGESTIONS)
        .all(db)
        .await?;
    Ok(commands.into_iter().map(|c| c.name).collect())
}

/// Registers a new command in a guild.
///
/// `name` and `content` are validated here; callers may pass raw user input.
#[instrument(skip(db, content))]
pub async fn create_command(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    content: &str,
    author_id: &str,
) -> Result<custom_command::Model> {
    let name = normalize_name(name, "")?;
    let content = validate_content(content)?;

    if get_command(db, guild_id, &name).await?.is_some() {
        return Err(Error::CommandAlreadyExists { name });
    }

    let now = chrono::Utc::now();
    let command = custom_command::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        name: Set(name),
        content: Set(content),
        created_by: Set(author_id.to_string()),
        updated_by: Set(None),
        uses: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = command.insert(db).await?;
    info!(guild_id, name = %created.name, "Custom command created");
    Ok(created)
}

/// Replaces the response of an existing command.
#[instrument(skip(db, content))]
pub async fn update_command(
    db: &DatabaseConnection,
    guild_id: &str,
    name: &str,
    content: &str,
    editor_id: &str,
) -> Result<custom_command::Model> {
    let name = normalize_name(name, "")?;
    let content = validate_content(content)?;

    let Some(existing) = get_command(db, guild_id, &name).await? else {
        return Err(Error::CommandNotFound { name });
    };

    let mut active_model: custom_command::ActiveModel = existing.into();
    active_model.content = Set(content);
    active_model.updated_by = Set(Some(editor_id.to_string()));
    active_model.updated_at = Set(chrono::Utc::now());

    let updated = active_model.update(db).await?;
    info!(guild_id, name = %updated.name, "Custom command updated");
    Ok(updated)
}

/// Removes a command from a guild.
#[instrument(skip(db))]
pub async fn delete_command(db: &DatabaseConnection, guild_id: &str, name: &str) -> Result<()> {
    let name = normalize_name(name, "")?;

    let Some(existing) = get_command(db, guild_id, &name).await? else {
        return Err(Error::CommandNotFound { name });
    };

    existing.delete(db).await?;
    info!(guild_id, name, "Custom command deleted");
    Ok(())
}

/// Removes every command of a guild, returning how many were deleted.
#[instrument(skip(db))]
pub async fn delete_all_commands(db: &DatabaseConnection, guild_id: &str) -> Result<u64> {
    let result = CustomCommand::delete_many()
        .filter(custom_command::Column::GuildId.eq(guild_id))
        .exec(db)
        .await?;
    info!(guild_id, removed = result.rows_affected, "All custom commands deleted");
    Ok(result.rows_affected)
}

/// Atomically increments the usage counter of a command.
pub async fn record_use(db: &DatabaseConnection, command_id: i64) -> Result<()> {
    CustomCommand::update_many()
        .col_expr(
            custom_command::Column::Uses,
            Expr::col(custom_command::Column::Uses).add(1),
        )
        .filter(custom_command::Column::Id.eq(command_id))
        .exec(db)
        .await?;
    debug!(command_id, "Custom command use recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Rules ", "!").unwrap(), "rules");
        assert_eq!(normalize_name("!Raid-Times", "!").unwrap(), "raid-times");
        assert_eq!(normalize_name("build_1", "").unwrap(), "build_1");

        assert!(matches!(
            normalize_name("   ", "!"),
            Err(Error::InvalidCommandName { .. })
        ));
        assert!(matches!(
            normalize_name("two words", "!"),
            Err(Error::InvalidCommandName { .. })
        ));
        assert!(matches!(
            normalize_name(&"a".repeat(MAX_NAME_LENGTH + 1), "!"),
            Err(Error::InvalidCommandName { .. })
        ));
        assert_eq!(normalize_name(&"a".repeat(MAX_NAME_LENGTH), "!").unwrap().len(), 32);
    }

    #[test]
    fn test_validate_content() {
        assert_eq!(validate_content("  hello \n").unwrap(), "hello");
        assert!(matches!(
            validate_content(" \n "),
            Err(Error::InvalidCommandContent { .. })
        ));
        assert!(validate_content(&"x".repeat(MAX_CONTENT_LENGTH)).is_ok());
        assert!(matches!(
            validate_content(&"x".repeat(MAX_CONTENT_LENGTH + 1)),
            Err(Error::InvalidCommandContent { .. })
        ));
    }

    #[test]
    fn test_parse_invocation() {
        assert_eq!(parse_invocation("!rules", "!"), Some("rules".to_string()));
        assert_eq!(
            parse_invocation("  !Rules please", "!"),
            Some("rules".to_string())
        );
        assert_eq!(parse_invocation("?rules", "?"), Some("rules".to_string()));
        assert_eq!(parse_invocation("gw!rules", "gw!"), Some("rules".to_string()));
        assert_eq!(parse_invocation("rules", "!"), None);
        assert_eq!(parse_invocation("! rules", "!"), None);
        assert_eq!(parse_invocation("!", "!"), None);
        assert_eq!(parse_invocation("!what?", "!"), None);
        assert_eq!(parse_invocation("!rules", ""), None);
    }

    #[tokio::test]
    async fn test_create_and_get_command() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_command(&db, GUILD_A, "Rules", " Be nice. ", "author").await?;
        assert_eq!(created.name, "rules");
        assert_eq!(created.content, "Be nice.");
        assert_eq!(created.uses, 0);
        assert!(created.updated_by.is_none());

        let fetched = get_command(&db, GUILD_A, "rules").await?.unwrap();
        assert_eq!(fetched, created);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_command(&db, GUILD_A, "rules").await?;

        let result = create_command(&db, GUILD_A, "RULES", "again", "author").await;
        assert!(matches!(
            result,
            Err(Error::CommandAlreadyExists { name }) if name == "rules"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_commands_are_scoped_to_guild() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_command(&db, GUILD_A, "rules").await?;

        assert!(get_command(&db, GUILD_B, "rules").await?.is_none());

        // Same name in another guild is allowed
        create_test_command(&db, GUILD_B, "rules").await?;
        assert_eq!(list_commands(&db, GUILD_A).await?.len(), 1);
        assert_eq!(list_commands(&db, GUILD_B).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_command() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_command(&db, GUILD_A, "rules").await?;

        let updated = update_command(&db, GUILD_A, "rules", "New rules", "editor").await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.content, "New rules");
        assert_eq!(updated.updated_by.as_deref(), Some("editor"));
        assert_eq!(updated.created_by, created.created_by);

        let missing = update_command(&db, GUILD_A, "nope", "text", "editor").await;
        assert!(matches!(missing, Err(Error::CommandNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_command() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_command(&db, GUILD_A, "rules").await?;

        delete_command(&db, GUILD_A, "Rules").await?;
        assert!(get_command(&db, GUILD_A, "rules").await?.is_none());

        let again = delete_command(&db, GUILD_A, "rules").await;
        assert!(matches!(again, Err(Error::CommandNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_all_commands_only_touches_one_guild() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_command(&db, GUILD_A, "one").await?;
        create_test_command(&db, GUILD_A, "two").await?;
        create_test_command(&db, GUILD_B, "one").await?;

        assert_eq!(delete_all_commands(&db, GUILD_A).await?, 2);
        assert!(list_commands(&db, GUILD_A).await?.is_empty());
        assert_eq!(list_commands(&db, GUILD_B).await?.len(), 1);
        assert_eq!(delete_all_commands(&db, GUILD_A).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_and_search_are_sorted() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["raid", "build", "rules", "discord"] {
            create_test_command(&db, GUILD_A, name).await?;
        }

        let names: Vec<String> = list_commands(&db, GUILD_A)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["build", "discord", "raid", "rules"]);

        assert_eq!(
            search_command_names(&db, GUILD_A, "R").await?,
            vec!["discord", "raid", "rules"]
        );
        assert_eq!(search_command_names(&db, GUILD_A, "").await?.len(), 4);
        assert!(search_command_names(&db, GUILD_B, "r").await?.is_empty());
        Ok(())
    }

    #[test]
    fn test_like_literal_escapes_wildcards() {
        assert_eq!(like_literal("raid_"), "raid\\_");
        assert_eq!(like_literal("100%"), "100\\%");
        assert_eq!(like_literal("a\\b"), "a\\\\b");
        assert_eq!(like_literal("rules"), "rules");
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_command(&db, GUILD_A, "raid_boss").await?;
        create_test_command(&db, GUILD_A, "raidxboss").await?;
        create_test_command(&db, GUILD_A, "rules").await?;

        assert_eq!(
            search_command_names(&db, GUILD_A, "raid_").await?,
            vec!["raid_boss".to_string()]
        );
        assert!(search_command_names(&db, GUILD_A, "%").await?.is_empty());
        assert_eq!(search_command_names(&db, GUILD_A, "x").await?, vec!["raidxboss".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_use_increments() -> Result<()> {
        let db = setup_test_db().await?;
        let command = create_test_command(&db, GUILD_A, "rules").await?;

        record_use(&db, command.id).await?;
        record_use(&db, command.id).await?;

        let fetched = get_command(&db, GUILD_A, "rules").await?.unwrap();
        assert_eq!(fetched.uses, 2);
        Ok(())
    }
}
