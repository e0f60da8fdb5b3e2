//! Application State

use std::sync::Arc;

use crypto_portfolio::{ConversationMachine, PortfolioStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Per-user conversation state machine
    pub machine: Arc<ConversationMachine>,

    /// Portfolio store, for health reporting
    pub store: Arc<PortfolioStore>,
}
