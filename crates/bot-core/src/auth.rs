//! Authorization Guard
//!
//! Runs before any state transition. A mismatched identity gets the fixed
//! denial message and never touches session state.

use std::collections::HashSet;

use crate::error::{BotError, Result};
use crate::message::UserId;

/// Allow-list of identities permitted to use the bot
#[derive(Clone, Debug, Default)]
pub struct Authorizer {
    allowed: HashSet<UserId>,
}

impl Authorizer {
    pub fn new<I, U>(users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        Self {
            allowed: users.into_iter().map(Into::into).collect(),
        }
    }

    /// Single authorized identity
    pub fn single(user: impl Into<UserId>) -> Self {
        Self::new([user])
    }

    pub fn is_authorized(&self, user: &UserId) -> bool {
        self.allowed.contains(user)
    }

    /// Check an identity; denial is expected traffic, not an error condition
    pub fn check(&self, user: &UserId) -> Result<()> {
        if self.is_authorized(user) {
            Ok(())
        } else {
            tracing::info!(user = %user, "Rejected unauthorized user");
            Err(BotError::Unauthorized(user.clone()))
        }
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
