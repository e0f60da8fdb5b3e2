//! Error Types

use thiserror::Error;

use crate::message::UserId;

/// Result type alias for conversation operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Fixed reply for identities that are not allowed to talk to the bot
pub const DENIAL_MESSAGE: &str = "Sorry, you don't have permission to use this bot.";

/// Conversation-layer error types
#[derive(Error, Debug)]
pub enum BotError {
    /// Triggering identity is not authorized
    #[error("Unauthorized user: {0}")]
    Unauthorized(UserId),

    /// Malformed user input (the user is re-prompted)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced profile or asset no longer exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistent store failed on a write path
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BotError {
    /// Whether the outcome is an expected, user-facing condition rather than a fault
    pub const fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => DENIAL_MESSAGE.into(),
            Self::Validation(msg) | Self::NotFound(msg) | Self::Conflict(msg) => msg.clone(),
            Self::Storage(_) => {
                "Something went wrong while saving your changes. Please try again.".into()
            }
        }
    }
}
