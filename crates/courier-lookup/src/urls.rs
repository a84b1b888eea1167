use crate::error::{LookupError, Result};

pub fn validated_base(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(LookupError::InvalidBaseUrl);
    }
    if trimmed.len() < 8 {
        return Err(LookupError::InvalidBaseUrl);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

pub fn farcaster_user_by_username(base_url: &str, username: &str) -> Result<String> {
    Ok(format!(
        "{}/v2/farcaster/user/by_username?username={}",
        validated_base(base_url)?,
        urlencoding::encode(username)
    ))
}

/// Candidate identity endpoints, tried in order. The network exposes both a
/// RESTful path and a query-param form depending on the deployment.
pub fn inbox_identity_candidates(base_url: &str, address: &str) -> Result<Vec<String>> {
    let base = validated_base(base_url)?;
    Ok(vec![
        format!("{}/v1/identities/{}", base, address),
        format!("{}/v1/identities?address={}", base, address),
    ])
}

pub fn inbox_bulk_lookup(base_url: &str) -> Result<String> {
    Ok(format!(
        "{}/message/v1/get-inbox-ids",
        validated_base(base_url)?
    ))
}
