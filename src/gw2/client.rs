//! HTTP client for the Guild Wars 2 REST API.
//!
//! Authenticated endpoints receive the user's key as a bearer token. Every
//! request pins the schema version so the payload shapes in [`super::models`]
//! stay stable.

use super::models::{
    AchievementProgress, Account, ApiErrorBody, Character, TokenInfo, WalletEntry, World,
};
use super::snapshot::Snapshot;
use crate::config::settings::Gw2Settings;
use crate::errors::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const SCHEMA_VERSION: &str = "2019-12-19T00:00:00.000Z";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct Gw2Client {
    http: reqwest::Client,
    base_url: String,
}

impl Gw2Client {
    /// Builds a client from settings.
    pub fn new(settings: &Gw2Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        api_key: Option<&str>,
    ) -> Result<T> {
        let mut request = self
            .http
            .get(self.url(path))
            .query(&[("v", SCHEMA_VERSION)])
            .query(query);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(path, %status, "GW2 API response");

        if status.is_success() {
            return response.json::<T>().await.map_err(Into::into);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(path, %status, "GW2 API request failed");
        Err(status_error(status, &body))
    }

    /// `/v2/tokeninfo`
    #[instrument(skip(self, api_key))]
    pub async fn token_info(&self, api_key: &str) -> Result<TokenInfo> {
        self.get("tokeninfo", &[], Some(api_key)).await
    }

    /// `/v2/account`
    #[instrument(skip(self, api_key))]
    pub async fn account(&self, api_key: &str) -> Result<Account> {
        self.get("account", &[], Some(api_key)).await
    }

    /// `/v2/account/wallet`
    #[instrument(skip(self, api_key))]
    pub async fn wallet(&self, api_key: &str) -> Result<Vec<WalletEntry>> {
        self.get("account/wallet", &[], Some(api_key)).await
    }

    /// `/v2/account/achievements`, every achievement the account has progressed
    #[instrument(skip(self, api_key))]
    pub async fn achievements(&self, api_key: &str) -> Result<Vec<AchievementProgress>> {
        self.get("account/achievements", &[], Some(api_key)).await
    }

    /// `/v2/characters?ids=all`
    #[instrument(skip(self, api_key))]
    pub async fn characters(&self, api_key: &str) -> Result<Vec<Character>> {
        self.get("characters", &[("ids", "all")], Some(api_key)).await
    }

    /// `/v2/worlds?id=...` (public)
    #[instrument(skip(self))]
    pub async fn world(&self, world_id: u32) -> Result<World> {
        let id = world_id.to_string();
        self.get("worlds", &[("id", id.as_str())], None).await
    }

    /// Fetches everything a session snapshot needs.
    ///
    /// Requests are issued concurrently; any failure aborts the snapshot.
    #[instrument(skip(self, api_key))]
    pub async fn fetch_snapshot(&self, api_key: &str) -> Result<Snapshot> {
        let (account, wallet, achievements, characters) = tokio::try_join!(
            self.account(api_key),
            self.wallet(api_key),
            self.achievements(api_key),
            self.characters(api_key),
        )?;

        Ok(Snapshot::from_api(
            chrono::Utc::now(),
            &account,
            &wallet,
            &achievements,
            &characters,
        ))
    }
}

/// Maps a non-success response to an error.
///
/// 401 and 403 mean the key itself was rejected.
fn status_error(status: StatusCode, body: &str) -> Error {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Error::InvalidApiKey;
    }
    Error::Gw2Api {
        status: status.as_u16(),
        message: error_text(body),
    }
}

/// Extracts the `text` field of an API error body, falling back to the raw body.
fn error_text(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body).map_or_else(
        |_| {
            if body.trim().is_empty() {
                "no details".to_string()
            } else {
                body.trim().to_string()
            }
        },
        |parsed| parsed.text,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_error_text_prefers_api_message() {
        assert_eq!(error_text(r#"{"text": "no such id"}"#), "no such id");
        assert_eq!(error_text("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_text("  "), "no details");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, r#"{"text": "Invalid access token"}"#),
            Error::InvalidApiKey
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            Error::InvalidApiKey
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, r#"{"text": "no such id"}"#),
            Error::Gw2Api { status: 404, ref message } if message == "no such id"
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            Error::Gw2Api { status: 503, ref message } if message == "no details"
        ));
    }

    #[test]
    fn test_url_joins_paths() {
        let client = Gw2Client::new(&Gw2Settings {
            api_base_url: "http://localhost:1234/".to_string(),
            request_timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(client.url("account/wallet"), "http://localhost:1234/v2/account/wallet");
        assert_eq!(client.url("/tokeninfo"), "http://localhost:1234/v2/tokeninfo");
    }
}
