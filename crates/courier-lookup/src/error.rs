use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid base url")]
    InvalidBaseUrl,
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("http error")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("json error")]
    Json(#[from] serde_json::Error),
    #[error("response too large")]
    ResponseTooLarge,
    #[error("rpc error: {0}")]
    Rpc(String),
}
