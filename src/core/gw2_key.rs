//! GW2 API key business logic.
//!
//! Each Discord user can register one key. The key is validated against the
//! API before it is stored (see the `gw2 key add` command); this module only
//! checks its shape, the granted permissions, and persists it.

use crate::{
    entities::{Gw2ApiKey, gw2_api_key},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Permissions needed to register a key at all
pub const ACCOUNT_PERMISSIONS: &[&str] = &["account"];

/// Permissions needed to take session snapshots
pub const SESSION_PERMISSIONS: &[&str] = &["account", "wallet", "progression", "characters"];

/// Details of a validated key, as reported by the API
#[derive(Debug, Clone)]
pub struct KeyDetails {
    /// The API key
    pub api_key: String,
    /// Name the owner gave the key
    pub key_name: String,
    /// GW2 account name
    pub account_name: String,
    /// Home world name
    pub world: String,
    /// Granted permissions
    pub permissions: Vec<String>,
}

/// Checks the shape of a GW2 API key.
///
/// Keys are two dash-separated hex GUIDs glued together:
/// `8-4-4-4-20` followed by `8-4-4-4-12`, 72 characters in total.
#[must_use]
pub fn looks_like_api_key(raw: &str) -> bool {
    const GROUPS: [usize; 9] = [8, 4, 4, 4, 20, 4, 4, 4, 12];

    let parts: Vec<&str> = raw.trim().split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Returns the `required` permissions that are not in `granted`.
#[must_use]
pub fn missing_permissions<S: AsRef<str>>(granted: &[S], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|req| !granted.iter().any(|g| g.as_ref().eq_ignore_ascii_case(req)))
        .map(|req| (*req).to_string())
        .collect()
}

/// Splits the stored comma separated permission list.
#[must_use]
pub fn stored_permissions(model: &gw2_api_key::Model) -> Vec<&str> {
    model
        .permissions
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Ensures a stored key grants `required`, otherwise returns `MissingPermissions`.
pub fn require_permissions(model: &gw2_api_key::Model, required: &[&str]) -> Result<()> {
    let missing = missing_permissions(&stored_permissions(model), required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingPermissions { missing })
    }
}

/// Hides all but the first group of a key for display.
#[must_use]
pub fn mask_key(api_key: &str) -> String {
    let first = api_key.split('-').next().unwrap_or_default();
    format!("{first}-****")
}

/// Gets the key registered by a user.
pub async fn get_key(db: &DatabaseConnection, user_id: &str) -> Result<Option<gw2_api_key::Model>> {
    Gw2ApiKey::find()
        .filter(gw2_api_key::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Gets the key registered by a user or fails with `ApiKeyNotFound`.
pub async fn require_key(db: &DatabaseConnection, user_id: &str) -> Result<gw2_api_key::Model> {
    get_key(db, user_id).await?.ok_or(Error::ApiKeyNotFound)
}

/// Stores a key for a user, replacing any previous one.
#[instrument(skip(db, details), fields(account = %details.account_name))]
pub async fn upsert_key(
    db: &DatabaseConnection,
    user_id: &str,
    details: KeyDetails,
) -> Result<gw2_api_key::Model> {
    let now = chrono::Utc::now();
    let permissions = details.permissions.join(",");

    let saved = if let Some(existing) = get_key(db, user_id).await? {
        let mut active_model: gw2_api_key::ActiveModel = existing.into();
        active_model.api_key = Set(details.api_key);
        active_model.key_name = Set(details.key_name);
        active_model.account_name = Set(details.account_name);
        active_model.world = Set(details.world);
        active_model.permissions = Set(permissions);
        active_model.updated_at = Set(now);
        active_model.update(db).await?
    } else {
        gw2_api_key::ActiveModel {
            user_id: Set(user_id.to_string()),
            api_key: Set(details.api_key),
            key_name: Set(details.key_name),
            account_name: Set(details.account_name),
            world: Set(details.world),
            permissions: Set(permissions),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    info!(user_id, "GW2 API key saved");
    Ok(saved)
}

/// Removes a user's key. Returns `false` if none was registered.
#[instrument(skip(db))]
pub async fn delete_key(db: &DatabaseConnection, user_id: &str) -> Result<bool> {
    let result = Gw2ApiKey::delete_many()
        .filter(gw2_api_key::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if result.rows_affected > 0 {
        info!(user_id, "GW2 API key removed");
    }
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_looks_like_api_key() {
        assert!(looks_like_api_key(TEST_API_KEY));
        assert!(looks_like_api_key(&format!("  {TEST_API_KEY}\n")));
        assert!(!looks_like_api_key(""));
        assert!(!looks_like_api_key("not-a-key"));
        // Right shape, not hex
        assert!(!looks_like_api_key(&TEST_API_KEY.replace('A', "Z")));
        // First GUID only
        assert!(!looks_like_api_key(&TEST_API_KEY[..36]));
    }

    #[test]
    fn test_missing_permissions() {
        let granted = ["account", "Wallet", "characters"];
        assert!(missing_permissions(&granted, ACCOUNT_PERMISSIONS).is_empty());
        assert_eq!(
            missing_permissions(&granted, SESSION_PERMISSIONS),
            vec!["progression".to_string()]
        );
        assert_eq!(
            missing_permissions::<&str>(&[], SESSION_PERMISSIONS).len(),
            SESSION_PERMISSIONS.len()
        );
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(TEST_API_KEY), "A1B2C3D4-****");
        assert_eq!(mask_key(""), "-****");
    }

    #[tokio::test]
    async fn test_upsert_get_and_delete_key() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_key(&db, "user1").await?.is_none());
        assert!(matches!(
            require_key(&db, "user1").await,
            Err(Error::ApiKeyNotFound)
        ));

        let saved = upsert_key(&db, "user1", test_key_details("account,wallet")).await?;
        assert_eq!(saved.account_name, "Sample.1234");
        assert_eq!(stored_permissions(&saved), vec!["account", "wallet"]);

        assert!(delete_key(&db, "user1").await?);
        assert!(!delete_key(&db, "user1").await?);
        assert!(get_key(&db, "user1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_key() -> Result<()> {
        let db = setup_test_db().await?;
        let first = upsert_key(&db, "user1", test_key_details("account")).await?;

        let mut details = test_key_details("account,wallet,progression,characters");
        details.key_name = "second key".to_string();
        let second = upsert_key(&db, "user1", details).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.key_name, "second key");
        require_permissions(&second, SESSION_PERMISSIONS)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_require_permissions_reports_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let saved = upsert_key(&db, "user1", test_key_details("account,wallet")).await?;

        let result = require_permissions(&saved, SESSION_PERMISSIONS);
        assert!(matches!(
            result,
            Err(Error::MissingPermissions { missing })
                if missing == vec!["progression".to_string(), "characters".to_string()]
        ));
        Ok(())
    }
}
