use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use crate::http::{build_client, read_value};
use crate::urls;
use courier_api::types::FarcasterUser;
use courier_api::validation::validate_handle;

pub const DEFAULT_NEYNAR_BASE_URL: &str = "https://api.neynar.com";

/// Farcaster username lookups via the Neynar API. The API key stays
/// server-side; callers never see it.
#[derive(Debug)]
pub struct NeynarClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    cfg: LookupConfig,
}

impl NeynarClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        cfg: LookupConfig,
    ) -> Result<NeynarClient> {
        let base_url = urls::validated_base(&base_url.into())?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LookupError::InvalidInput("api_key"));
        }
        let http = build_client(&cfg)?;
        Ok(NeynarClient {
            base_url,
            api_key,
            http,
            cfg,
        })
    }

    /// Looks up a user by username. 404 means no such user and yields
    /// `Ok(None)`; other non-success statuses are surfaced as errors for the
    /// caller to log and demote.
    pub async fn user_by_username(&self, username: &str) -> Result<Option<FarcasterUser>> {
        validate_handle(username).map_err(|_| LookupError::InvalidInput("username"))?;
        let url = urls::farcaster_user_by_username(&self.base_url, username)?;
        let resp = self
            .http
            .get(url)
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .send()
            .await?;
        if resp.status().as_u16() == 404 {
            return Ok(None);
        }
        let value = read_value(resp, self.cfg.max_response_bytes).await?;
        Ok(parse_user_payload(&value))
    }
}

/// The API has returned both `{"user": {...}}` and the bare user object
/// across versions; accept either.
pub fn parse_user_payload(value: &serde_json::Value) -> Option<FarcasterUser> {
    if let Some(user) = value.get("user") {
        return serde_json::from_value(user.clone()).ok();
    }
    if value.get("username").is_some() {
        return serde_json::from_value(value.clone()).ok();
    }
    None
}
