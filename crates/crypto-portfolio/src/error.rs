//! Error Types for Crypto Portfolio

use bot_core::BotError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortfolioError>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Top-level error for configuration and wiring
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Failures of the document store or of the portfolio operations on top of it
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Profile {0} does not exist")]
    UnknownProfile(String),

    #[error("Profile {0} already exists")]
    ProfileExists(String),

    #[error("No free locator left for profile {0}")]
    LocatorsExhausted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Credentials or sharing settings are wrong, as opposed to a transient failure
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}

impl From<StoreError> for BotError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownProfile(name) => {
                Self::NotFound(format!("Profile {name} does not exist."))
            }
            StoreError::ProfileExists(name) => {
                Self::Conflict(format!("Profile {name} already exists."))
            }
            other => Self::Storage(other.to_string()),
        }
    }
}

/// Per-asset price lookup failures. These never leave the price fetcher.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("No pairs data for {0}")]
    NoPairs(String),

    #[error("No USD price for {0}")]
    MissingPrice(String),

    #[error("Bad request for {address}: {body}")]
    BadRequest { address: String, body: String },

    #[error("Unexpected status {status} for {address}")]
    Status { address: String, status: u16 },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Undecodable response: {0}")]
    Decode(String),

    #[error("Invalid price {value:?} for {address}")]
    InvalidPrice { address: String, value: String },

    #[error("Invalid oracle base URL {0:?}")]
    InvalidUrl(String),
}

impl OracleError {
    /// Conditions the oracle reports normally (logged at warn rather than error)
    pub const fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NoPairs(_) | Self::MissingPrice(_) | Self::Status { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_conversation_taxonomy() {
        assert!(matches!(
            BotError::from(StoreError::UnknownProfile("x".into())),
            BotError::NotFound(_)
        ));
        assert!(matches!(
            BotError::from(StoreError::ProfileExists("x".into())),
            BotError::Conflict(_)
        ));
        assert!(matches!(
            BotError::from(StoreError::Unavailable("down".into())),
            BotError::Storage(_)
        ));
    }

    #[test]
    fn test_permission_denied_detection() {
        assert!(StoreError::PermissionDenied("sheet".into()).is_permission_denied());
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(StoreError::Io(io).is_permission_denied());
        assert!(!StoreError::Unavailable("x".into()).is_permission_denied());
    }

    #[test]
    fn test_oracle_error_levels() {
        assert!(OracleError::NoPairs("0x1".into()).is_expected());
        assert!(OracleError::Status { address: "0x1".into(), status: 503 }.is_expected());
        assert!(!OracleError::BadRequest { address: "0x1".into(), body: String::new() }.is_expected());
        assert!(!OracleError::Decode("eof".into()).is_expected());
    }
}
