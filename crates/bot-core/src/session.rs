//! Session Management
//!
//! Per-user conversation state. Each user gets an independent session behind
//! its own async mutex, so events from one user are handled in order and
//! users never see each other's pending flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::message::UserId;

/// Pending step of a multi-step flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Neutral state; the main menu is on screen
    #[default]
    Idle,
    ChoosingProfile,
    AddingProfile,
    RemovingProfile,
    AddingAsset,
    RemovingAsset,
    UpdatingAsset,
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ChoosingProfile => "choosing_profile",
            Self::AddingProfile => "adding_profile",
            Self::RemovingProfile => "removing_profile",
            Self::AddingAsset => "adding_asset",
            Self::RemovingAsset => "removing_asset",
            Self::UpdatingAsset => "updating_asset",
        };
        write!(f, "{name}")
    }
}

/// Conversation state for one user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Owner of the session
    pub user: UserId,

    /// Current flow step
    pub state: ConversationState,

    /// Profile all asset operations apply to
    pub active_profile: Option<String>,

    /// Symbol picked in the update-amount flow
    pub updating_symbol: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserId) -> Self {
        let now = Utc::now();
        Self {
            user,
            state: ConversationState::Idle,
            active_profile: None,
            updating_symbol: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Move to another flow step
    pub fn enter(&mut self, state: ConversationState) {
        self.state = state;
        self.touch();
    }

    /// Back to neutral. The active profile survives; transient flow fields do not.
    pub fn reset(&mut self) {
        self.state = ConversationState::Idle;
        self.updating_symbol = None;
        self.touch();
    }

    pub fn is_idle(&self) -> bool {
        self.state == ConversationState::Idle
    }
}

/// Shared handle to one user's session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Session store keyed by user identity
pub trait SessionStore: Send + Sync {
    /// Fetch the user's session, creating a neutral one on first contact
    fn get_or_create(&self, user: &UserId) -> SessionHandle;

    /// Fetch an existing session
    fn get(&self, user: &UserId) -> Option<SessionHandle>;

    /// Drop a user's session
    fn remove(&self, user: &UserId);

    /// Number of live sessions
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session store; sessions live for the process lifetime
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<UserId, SessionHandle>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_or_create(&self, user: &UserId) -> SessionHandle {
        self.sessions
            .entry(user.clone())
            .or_insert_with(|| {
                tracing::debug!(user = %user, "Creating session");
                Arc::new(Mutex::new(Session::new(user.clone())))
            })
            .clone()
    }

    fn get(&self, user: &UserId) -> Option<SessionHandle> {
        self.sessions.get(user).map(|entry| entry.clone())
    }

    fn remove(&self, user: &UserId) {
        self.sessions.remove(user);
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_active_profile() {
        let mut session = Session::new(UserId::new("1"));
        session.active_profile = Some("main".into());
        session.updating_symbol = Some("ETH".into());
        session.enter(ConversationState::UpdatingAsset);

        session.reset();

        assert!(session.is_idle());
        assert_eq!(session.active_profile.as_deref(), Some("main"));
        assert!(session.updating_symbol.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let store = MemorySessionStore::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        store.get_or_create(&alice).lock().await.active_profile = Some("a".into());
        store.get_or_create(&bob).lock().await.active_profile = Some("b".into());

        assert_eq!(store.len(), 2);
        let alice_session = store.get(&alice).unwrap();
        assert_eq!(alice_session.lock().await.active_profile.as_deref(), Some("a"));

        // Same handle on repeated lookups
        let again = store.get_or_create(&alice);
        assert!(Arc::ptr_eq(&alice_session, &again));

        store.remove(&bob);
        assert!(store.get(&bob).is_none());
    }
}
