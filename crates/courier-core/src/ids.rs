use courier_api::validation::normalize_wallet_address;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A validated Ethereum wallet address, always held lowercased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WalletAddress {
    value: String,
}

impl WalletAddress {
    pub fn parse(input: &str) -> Option<Self> {
        normalize_wallet_address(input)
            .ok()
            .map(|value| Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Case-insensitive comparison against an address in whatever casing the
    /// messaging library or a lookup service handed back.
    pub fn matches(&self, other: &str) -> bool {
        other.trim().eq_ignore_ascii_case(&self.value)
    }

    /// Abbreviated `0x1234...abcd` form for labels and guidance text.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.value[..6], &self.value[38..])
    }
}

impl Display for WalletAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationId {
    pub value: String,
}

impl ConversationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InboxId {
    pub value: String,
}

impl InboxId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
