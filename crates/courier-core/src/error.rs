use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("storage")]
    Storage,
    #[error("validation {0}")]
    Validation(String),
    #[error("transport {0}")]
    Transport(String),
    #[error("not found")]
    NotFound,
    #[error("recipient has no messaging identity")]
    PeerUnregistered,
    #[error("inbox lookup failed {0}")]
    InboxLookup(String),
}

impl CoreError {
    /// Guidance text for the failures a user can act on. The two
    /// reconciliation outcomes need different advice: an unregistered peer
    /// must join the network first, while a failed inbox lookup against a
    /// reachable peer is usually transient.
    pub fn user_message(&self) -> Option<String> {
        match self {
            CoreError::PeerUnregistered => Some(
                "This address doesn't have a messaging identity yet. \
                 Ask them to connect their wallet to a messaging app first, \
                 or have them send you a message."
                    .to_string(),
            ),
            CoreError::InboxLookup(_) => Some(
                "The address is reachable but its inbox id could not be \
                 retrieved. This is usually temporary; try again in a moment."
                    .to_string(),
            ),
            _ => None,
        }
    }
}
