use serde::{Deserialize, Serialize};

/// Which lookup produced a resolved identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentitySource {
    Farcaster,
    Ens,
    Directory,
    Manual,
}

/// Outcome of resolving a user-typed handle to a wallet identity.
///
/// Immutable once created; a re-resolution produces a fresh value that
/// replaces the cached one. `wallet_address` is lowercased when present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedIdentity {
    pub handle: String,
    pub display_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub source: IdentitySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

/// Farcaster user payload as returned by the Neynar API.
///
/// Deliberately tolerant: the upstream object carries many more fields and
/// grows new ones; only what address selection needs is modeled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FarcasterUser {
    pub fid: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_addresses: Option<VerifiedAddresses>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifiedAddresses {
    #[serde(default)]
    pub eth_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<PrimaryAddresses>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,
}

/// An identity known to the application itself rather than to any external
/// registry (bots, system accounts). Loaded from daemon config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentIdentity {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsLookupResponse {
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarcasterLookupResponse {
    pub user: FarcasterUser,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InboxIdentityResponse {
    #[serde(rename = "inboxId")]
    pub inbox_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveResponse {
    pub identity: ResolvedIdentity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}
