use thiserror::Error;

pub const MAX_HANDLE_LEN: usize = 64;
pub const ENS_SUFFIX: &str = ".eth";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty field {0}")]
    Empty(&'static str),
    #[error("too long {0}")]
    TooLong(&'static str),
    #[error("invalid format {0}")]
    Format(&'static str),
}

/// Characters permitted in a handle (Farcaster usernames, ENS labels and
/// directory keys all fit inside this class).
pub fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    if handle.is_empty() {
        return Err(ValidationError::Empty("handle"));
    }
    if handle.len() > MAX_HANDLE_LEN {
        return Err(ValidationError::TooLong("handle"));
    }
    if !handle.chars().all(is_handle_char) {
        return Err(ValidationError::Format("handle"));
    }
    Ok(())
}

/// Validates a `0x`-prefixed 20-byte hex address and returns it lowercased.
/// Wallet addresses are compared case-insensitively everywhere in this
/// system.
pub fn normalize_wallet_address(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty("address"));
    }
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(ValidationError::Format("address"));
    }
    if !trimmed[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::Format("address"));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Appends the ENS suffix when missing; names are resolved with the suffix
/// regardless of how the user typed them.
pub fn normalize_ens_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty("name"));
    }
    if trimmed.len() > MAX_HANDLE_LEN {
        return Err(ValidationError::TooLong("name"));
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.ends_with(ENS_SUFFIX) {
        Ok(lower)
    } else {
        Ok(format!("{}{}", lower, ENS_SUFFIX))
    }
}
