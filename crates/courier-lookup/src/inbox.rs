use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use crate::http::{build_client, read_value};
use crate::urls;
use async_trait::async_trait;
use courier_api::validation::normalize_wallet_address;
use serde_json::json;

/// Wallet address → messaging-network inbox id, best effort.
#[async_trait]
pub trait InboxDirectory: Send + Sync {
    async fn inbox_id_for_address(&self, address: &str) -> Result<Option<String>>;
}

/// Probes the network's identity API. Deployments expose a few live endpoint
/// shapes, so candidates are tried in sequence and a probe failure only
/// advances to the next candidate; the POST bulk endpoint is the final
/// fallback.
#[derive(Debug)]
pub struct InboxClient {
    bases: Vec<String>,
    http: reqwest::Client,
    cfg: LookupConfig,
}

impl InboxClient {
    pub fn new(base_urls: &[String], cfg: LookupConfig) -> Result<InboxClient> {
        if base_urls.is_empty() {
            return Err(LookupError::InvalidInput("base_urls"));
        }
        let mut bases = Vec::new();
        for url in base_urls {
            bases.push(urls::validated_base(url)?);
        }
        let http = build_client(&cfg)?;
        Ok(InboxClient { bases, http, cfg })
    }

    async fn get_value(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self
            .http
            .get(url)
            .header("content-type", "application/json")
            .send()
            .await?;
        read_value(resp, self.cfg.max_response_bytes).await
    }

    async fn post_value(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let resp = self.http.post(url).json(payload).send().await?;
        read_value(resp, self.cfg.max_response_bytes).await
    }
}

#[async_trait]
impl InboxDirectory for InboxClient {
    async fn inbox_id_for_address(&self, address: &str) -> Result<Option<String>> {
        let address =
            normalize_wallet_address(address).map_err(|_| LookupError::InvalidInput("address"))?;
        for base in &self.bases {
            for url in urls::inbox_identity_candidates(base, &address)? {
                match self.get_value(&url).await {
                    Ok(value) => {
                        if let Some(inbox_id) = extract_inbox_id(&value, &address) {
                            return Ok(Some(inbox_id));
                        }
                    }
                    Err(err) => {
                        log::warn!("identity probe failed for {}: {}", url, err);
                    }
                }
            }
        }
        if let Some(base) = self.bases.first() {
            let url = urls::inbox_bulk_lookup(base)?;
            let payload = json!({ "requests": [{ "address": address }] });
            match self.post_value(&url, &payload).await {
                Ok(value) => {
                    if let Some(inbox_id) = value
                        .pointer("/responses/0/inbox_id")
                        .and_then(|v| v.as_str())
                    {
                        return Ok(Some(inbox_id.to_string()));
                    }
                }
                Err(err) => {
                    log::warn!("bulk identity lookup failed for {}: {}", url, err);
                }
            }
        }
        Ok(None)
    }
}

/// Pulls an inbox id out of the response shapes seen in the wild:
/// `{"inboxId": ...}`, `{"<address>": {"inboxId": ...}}`, and
/// `[{"inboxId": ...}]`.
pub fn extract_inbox_id(value: &serde_json::Value, address: &str) -> Option<String> {
    if let Some(id) = value.get("inboxId").and_then(|v| v.as_str()) {
        return Some(id.to_string());
    }
    if let Some(id) = value
        .get(address)
        .and_then(|entry| entry.get("inboxId"))
        .and_then(|v| v.as_str())
    {
        return Some(id.to_string());
    }
    if let Some(id) = value
        .as_array()
        .and_then(|items| items.first())
        .and_then(|entry| entry.get("inboxId"))
        .and_then(|v| v.as_str())
    {
        return Some(id.to_string());
    }
    None
}
