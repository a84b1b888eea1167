use crate::config::LookupConfig;
use crate::error::{LookupError, Result};
use reqwest::Response;
use std::time::Duration;

pub(crate) fn build_client(cfg: &LookupConfig) -> Result<reqwest::Client> {
    if cfg.timeout_ms == 0 {
        return Err(LookupError::InvalidInput("timeout_ms"));
    }
    if cfg.connect_timeout_ms == 0 {
        return Err(LookupError::InvalidInput("connect_timeout_ms"));
    }
    if cfg.max_response_bytes == 0 {
        return Err(LookupError::InvalidInput("max_response_bytes"));
    }
    if cfg.user_agent.trim().is_empty() {
        return Err(LookupError::InvalidInput("user_agent"));
    }
    Ok(reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
        .build()?)
}

pub(crate) async fn read_value(resp: Response, max_bytes: usize) -> Result<serde_json::Value> {
    let status = resp.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }
    let body = resp.bytes().await?;
    if body.len() > max_bytes {
        return Err(LookupError::ResponseTooLarge);
    }
    Ok(serde_json::from_slice(&body)?)
}
