//! Deserialization targets for the GW2 API endpoints the bot uses.
//!
//! Only the fields the bot reads are declared; everything else in the
//! payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `/v2/tokeninfo`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Key identifier
    pub id: String,
    /// Name given to the key by its owner
    pub name: String,
    /// Granted scopes (`account`, `wallet`, `characters`...)
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// `/v2/account`
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account name, e.g. `Name.1234`
    pub name: String,
    /// Home world id
    pub world: u32,
    /// Seconds played on the account
    #[serde(default)]
    pub age: u64,
    /// World vs World rank (requires `progression`)
    #[serde(default)]
    pub wvw_rank: Option<u32>,
    /// Whether the account owns the commander tag
    #[serde(default)]
    pub commander: bool,
    /// Account creation time
    pub created: Option<DateTime<Utc>>,
    /// Purchased expansions and other access flags
    #[serde(default)]
    pub access: Vec<String>,
}

/// One entry of `/v2/account/wallet`
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct WalletEntry {
    /// Currency id
    pub id: u32,
    /// Amount held
    pub value: i64,
}

/// One entry of `/v2/account/achievements`
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct AchievementProgress {
    /// Achievement id
    pub id: u32,
    /// Current progress
    #[serde(default)]
    pub current: Option<i64>,
    /// Whether the achievement is done
    #[serde(default)]
    pub done: bool,
}

/// One entry of `/v2/characters?ids=all`
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    /// Character name
    pub name: String,
    /// Profession, e.g. `Necromancer`
    pub profession: String,
    /// Character level
    #[serde(default)]
    pub level: u32,
    /// Lifetime deaths
    #[serde(default)]
    pub deaths: i64,
}

/// One entry of `/v2/worlds`
#[derive(Debug, Clone, Deserialize)]
pub struct World {
    /// World id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Population bracket
    #[serde(default)]
    pub population: Option<String>,
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable message
    pub text: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_account_ignores_unknown_fields() {
        let json = r#"{
            "id": "A2A2A2A2-0000-0000-0000-000000000000",
            "name": "Sample.1234",
            "age": 3600,
            "world": 2003,
            "guilds": [],
            "created": "2015-08-28T15:24:00Z",
            "access": ["GuildWars2", "HeartOfThorns"],
            "commander": true,
            "fractal_level": 80,
            "wvw_rank": 312
        }"#;

        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.name, "Sample.1234");
        assert_eq!(account.world, 2003);
        assert_eq!(account.wvw_rank, Some(312));
        assert!(account.commander);
        assert_eq!(account.access.len(), 2);
        assert!(account.created.is_some());
    }

    #[test]
    fn test_parse_account_without_progression_scope() {
        let json = r#"{"name": "Sample.1234", "world": 1001, "created": "2015-08-28T15:24:00Z"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.wvw_rank, None);
        assert_eq!(account.age, 0);
        assert!(!account.commander);
    }

    #[test]
    fn test_parse_achievement_without_current() {
        let json = r#"[{"id": 283, "current": 120, "max": 100, "done": true}, {"id": 1, "done": false}]"#;
        let progress: Vec<AchievementProgress> = serde_json::from_str(json).unwrap();
        assert_eq!(progress[0].current, Some(120));
        assert!(progress[0].done);
        assert_eq!(progress[1].current, None);
    }

    #[test]
    fn test_parse_tokeninfo() {
        let json = r#"{"id": "ABC", "name": "bot key", "permissions": ["account", "wallet"]}"#;
        let info: TokenInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.name, "bot key");
        assert_eq!(info.permissions, vec!["account", "wallet"]);
    }
}
