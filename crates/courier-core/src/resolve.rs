use crate::agents::AgentDirectory;
use crate::error::CoreError;
use async_trait::async_trait;
use courier_api::types::{FarcasterUser, IdentitySource, ResolvedIdentity};
use courier_api::validation::{validate_handle, ENS_SUFFIX};
use serde_json::json;
use std::sync::Arc;

/// ENS name → wallet address, one request, no retry.
#[async_trait]
pub trait EnsResolver: Send + Sync {
    async fn resolve_name(&self, name: &str) -> Result<Option<String>, CoreError>;
}

/// Farcaster username → user profile, one request, no retry.
#[async_trait]
pub trait FarcasterResolver: Send + Sync {
    async fn user_by_username(&self, username: &str)
        -> Result<Option<FarcasterUser>, CoreError>;
}

/// Stand-in for an unconfigured lookup service: every name is a miss.
pub struct NullEnsResolver;

#[async_trait]
impl EnsResolver for NullEnsResolver {
    async fn resolve_name(&self, _name: &str) -> Result<Option<String>, CoreError> {
        Ok(None)
    }
}

pub struct NullFarcasterResolver;

#[async_trait]
impl FarcasterResolver for NullFarcasterResolver {
    async fn user_by_username(
        &self,
        _username: &str,
    ) -> Result<Option<FarcasterUser>, CoreError> {
        Ok(None)
    }
}

#[async_trait]
impl EnsResolver for courier_lookup::EnsClient {
    async fn resolve_name(&self, name: &str) -> Result<Option<String>, CoreError> {
        courier_lookup::EnsClient::resolve_name(self, name)
            .await
            .map_err(|err| CoreError::Transport(err.to_string()))
    }
}

#[async_trait]
impl FarcasterResolver for courier_lookup::NeynarClient {
    async fn user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<FarcasterUser>, CoreError> {
        courier_lookup::NeynarClient::user_by_username(self, username)
            .await
            .map_err(|err| CoreError::Transport(err.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Whether the token came from an `@mention`. Mention syntax and ENS
    /// syntax collide on the `.eth` suffix; for mentions the suffix is part
    /// of the Farcaster username.
    pub is_mention: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { is_mention: true }
    }
}

pub fn is_ens_name(token: &str) -> bool {
    token.to_ascii_lowercase().ends_with(ENS_SUFFIX)
}

/// Address selection for a Farcaster user: the verified primary ETH address
/// wins, then the first verified ETH address, then nothing.
pub fn primary_eth_address(user: &FarcasterUser) -> Option<String> {
    let verified = user.verified_addresses.as_ref()?;
    if let Some(primary) = verified
        .primary
        .as_ref()
        .and_then(|p| p.eth_address.as_deref())
    {
        return Some(primary.to_ascii_lowercase());
    }
    verified
        .eth_addresses
        .first()
        .map(|address| address.to_ascii_lowercase())
}

/// Orders the identity resolvers by token shape and returns the first hit.
///
/// Dispatch:
///   - not a mention and ends in `.eth` → ENS only, and an ENS miss is
///     final (no Farcaster or directory fallback);
///   - otherwise → Farcaster first (a mention ending in `.eth` is a literal
///     Farcaster username), then the agent directory;
///   - nothing matched → `Ok(None)`.
///
/// A transport failure from a resolver is logged and demoted to a miss for
/// that source; the pipeline never distinguishes it from "not found".
pub struct ResolutionPipeline {
    ens: Arc<dyn EnsResolver>,
    farcaster: Arc<dyn FarcasterResolver>,
    directory: AgentDirectory,
}

impl ResolutionPipeline {
    pub fn new(
        ens: Arc<dyn EnsResolver>,
        farcaster: Arc<dyn FarcasterResolver>,
        directory: AgentDirectory,
    ) -> Self {
        Self {
            ens,
            farcaster,
            directory,
        }
    }

    pub async fn resolve(
        &self,
        token: &str,
        opts: &ResolveOptions,
    ) -> Result<Option<ResolvedIdentity>, CoreError> {
        let token = token.trim().trim_start_matches('@');
        validate_handle(token).map_err(|err| CoreError::Validation(err.to_string()))?;

        if !opts.is_mention && is_ens_name(token) {
            let address = match self.ens.resolve_name(token).await {
                Ok(address) => address,
                Err(err) => {
                    log::warn!("ens lookup failed for {}: {}", token, err);
                    None
                }
            };
            return Ok(address.map(|address| ResolvedIdentity {
                handle: token.to_string(),
                display_label: token.to_string(),
                wallet_address: Some(address.to_ascii_lowercase()),
                avatar_url: None,
                source: IdentitySource::Ens,
                extra: None,
            }));
        }

        let user = match self.farcaster.user_by_username(token).await {
            Ok(user) => user,
            Err(err) => {
                log::warn!("farcaster lookup failed for {}: {}", token, err);
                None
            }
        };
        if let Some(user) = user {
            let address = primary_eth_address(&user);
            return Ok(Some(ResolvedIdentity {
                handle: token.to_string(),
                display_label: user
                    .display_name
                    .clone()
                    .unwrap_or_else(|| format!("@{}", token)),
                wallet_address: address,
                avatar_url: user.pfp_url.clone(),
                source: IdentitySource::Farcaster,
                extra: Some(json!({ "fid": user.fid })),
            }));
        }

        if let Some(agent) = self.directory.find_by_handle(token) {
            return Ok(Some(ResolvedIdentity {
                handle: agent.handle.clone(),
                display_label: agent.display_name.clone(),
                wallet_address: Some(agent.wallet_address.to_ascii_lowercase()),
                avatar_url: agent.avatar_url.clone(),
                source: IdentitySource::Directory,
                extra: agent
                    .description
                    .as_ref()
                    .map(|description| json!({ "description": description })),
            }));
        }

        Ok(None)
    }
}
