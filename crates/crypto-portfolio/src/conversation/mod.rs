//! Conversation State Machine
//!
//! Drives the multi-step profile and asset flows. Each event is handled as:
//!
//! ```text
//! (user, event) ──▶ Authorizer ──▶ session lock ──▶ dispatch(state, event) ──▶ Vec<Reply>
//!                      │ denied                           │ error
//!                      ▼                                  ▼
//!               denial message                 user message + main menu, state reset
//! ```
//!
//! Every terminal step (completion, cancellation, failure) leaves the session
//! in `Idle` with the main menu on screen.

mod action;
mod input;
mod render;

pub use action::{Action, Command};
pub use input::{is_cancel, parse_amount, AssetLine, InputError};

use std::sync::Arc;

use bot_core::{
    Authorizer, BotError, ConversationState, InputEvent, Reply, Result, Session, SessionStore,
    UserId,
};

use crate::config::{PortfolioBotConfig, DEFAULT_CANCEL_KEYWORD};
use crate::model::{Portfolio, Valuation};
use crate::pricing::PriceFetcher;
use crate::store::PortfolioStore;

/// Per-user finite-state machine over the portfolio store and price fetcher
pub struct ConversationMachine {
    store: Arc<PortfolioStore>,
    prices: Arc<PriceFetcher>,
    sessions: Arc<dyn SessionStore>,
    authorizer: Authorizer,
    cancel_keyword: String,
}

impl ConversationMachine {
    pub fn new(
        store: Arc<PortfolioStore>,
        prices: Arc<PriceFetcher>,
        sessions: Arc<dyn SessionStore>,
        authorizer: Authorizer,
    ) -> Self {
        Self {
            store,
            prices,
            sessions,
            authorizer,
            cancel_keyword: DEFAULT_CANCEL_KEYWORD.into(),
        }
    }

    /// Build from configuration
    pub fn from_config(
        config: &PortfolioBotConfig,
        store: Arc<PortfolioStore>,
        prices: Arc<PriceFetcher>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self::new(
            store,
            prices,
            sessions,
            Authorizer::new(config.authorized_users.iter().cloned()),
        )
        .with_cancel_keyword(&config.cancel_keyword)
    }

    pub fn with_cancel_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.cancel_keyword = keyword.into();
        self
    }

    pub fn cancel_keyword(&self) -> &str {
        &self.cancel_keyword
    }

    /// Copy of a user's session, if one exists
    pub async fn session(&self, user: &UserId) -> Option<Session> {
        let handle = self.sessions.get(user)?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Handle one front-end event and return what to render
    pub async fn handle(&self, user: &UserId, event: InputEvent) -> Vec<Reply> {
        if let Err(denied) = self.authorizer.check(user) {
            return vec![Reply::text(denied.user_message())];
        }

        let handle = self.sessions.get_or_create(user);
        let mut session = handle.lock().await;
        session.touch();

        let from = session.state;
        match self.dispatch(&mut session, event).await {
            Ok(replies) => {
                if from != session.state {
                    tracing::debug!(user = %user, %from, to = %session.state, "State transition");
                }
                replies
            }
            Err(err) => {
                if err.is_informational() {
                    tracing::info!(user = %user, state = %from, "{}", err);
                } else {
                    tracing::error!(user = %user, state = %from, "Flow failed: {}", err);
                }
                session.reset();
                vec![
                    Reply::text(err.user_message()),
                    render::main_menu(session.active_profile.as_deref()),
                ]
            }
        }
    }

    async fn dispatch(&self, session: &mut Session, event: InputEvent) -> Result<Vec<Reply>> {
        match event {
            InputEvent::Command { name } => match Command::parse(&name) {
                Command::Start => Ok(self.main_menu(session)),
                Command::Help => Ok(vec![render::help()]),
                Command::Cancel => Ok(self.cancelled(session)),
                Command::Unknown(name) => {
                    let mut replies = vec![Reply::text(format!("Unknown command /{name}."))];
                    replies.extend(self.main_menu(session));
                    Ok(replies)
                }
            },
            InputEvent::ChoiceSelected { token } => match Action::parse(&token) {
                Some(action) => self.on_action(session, action).await,
                None => Ok(self.stale_choice(session, "That option is not available.")),
            },
            InputEvent::FreeText { text } => self.on_text(session, &text).await,
        }
    }

    async fn on_action(&self, session: &mut Session, action: Action) -> Result<Vec<Reply>> {
        use ConversationState as S;

        match (session.state, action) {
            (_, Action::MainMenu) => Ok(self.main_menu(session)),
            (_, Action::Help) => Ok(vec![render::help()]),
            (_, Action::ManageProfiles) => {
                session.reset();
                Ok(vec![render::manage_profiles()])
            }
            (_, Action::ChooseProfile) => Ok(self.choose_profile(session).await),
            (_, Action::AddProfile) => {
                session.reset();
                session.enter(S::AddingProfile);
                Ok(vec![render::prompt("Enter the new profile name:", &self.cancel_keyword)])
            }
            (_, Action::RemoveProfile) => Ok(self.remove_profile_prompt(session).await),
            (_, Action::ViewPortfolio | Action::RefreshPrices) => {
                Ok(self.view_portfolio(session).await)
            }
            (_, Action::AddAsset) => Ok(self.add_asset_prompt(session)),
            (_, Action::RemoveAsset) => Ok(self.asset_picker(session, S::RemovingAsset).await),
            (_, Action::UpdateAsset) => Ok(self.asset_picker(session, S::UpdatingAsset).await),

            (S::ChoosingProfile, Action::SetProfile(name)) => self.set_profile(session, name).await,
            (S::RemovingProfile, Action::ConfirmRemoveProfile(name)) => {
                self.delete_profile(session, &name).await
            }
            (S::RemovingAsset, Action::PickRemoveAsset(symbol)) => {
                self.remove_asset(session, &symbol).await
            }
            (S::UpdatingAsset, Action::PickUpdateAsset(symbol)) => {
                session.updating_symbol = Some(symbol.clone());
                Ok(vec![render::prompt(
                    format!("Enter a new amount for {symbol}:"),
                    &self.cancel_keyword,
                )])
            }

            // In-flow buttons pressed outside their flow
            (
                _,
                Action::SetProfile(_)
                | Action::ConfirmRemoveProfile(_)
                | Action::PickRemoveAsset(_)
                | Action::PickUpdateAsset(_),
            ) => Ok(self.stale_choice(session, "That option has expired.")),
        }
    }

    async fn on_text(&self, session: &mut Session, text: &str) -> Result<Vec<Reply>> {
        use ConversationState as S;

        if is_cancel(text, &self.cancel_keyword) && !session.is_idle() {
            return Ok(self.cancelled(session));
        }

        match session.state {
            S::Idle => {
                let mut replies = vec![Reply::text("Please use the menu below.")];
                replies.extend(self.main_menu(session));
                Ok(replies)
            }
            S::AddingProfile => self.create_profile(session, text).await,
            S::AddingAsset => self.add_asset(session, text).await,
            S::UpdatingAsset if session.updating_symbol.is_some() => {
                self.update_amount(session, text).await
            }
            S::ChoosingProfile | S::RemovingProfile | S::RemovingAsset | S::UpdatingAsset => {
                Ok(vec![Reply::text(format!(
                    "Please pick one of the options above, or type '{}' to cancel.",
                    self.cancel_keyword
                ))])
            }
        }
    }

    fn main_menu(&self, session: &mut Session) -> Vec<Reply> {
        session.reset();
        vec![render::main_menu(session.active_profile.as_deref())]
    }

    /// Outcome message followed by the main menu; ends the flow
    fn finish(&self, session: &mut Session, outcome: impl Into<String>) -> Vec<Reply> {
        let mut replies = vec![Reply::text(outcome)];
        replies.extend(self.main_menu(session));
        replies
    }

    fn cancelled(&self, session: &mut Session) -> Vec<Reply> {
        let what = match session.state {
            ConversationState::AddingProfile => "Adding the profile was cancelled.",
            ConversationState::AddingAsset => "Adding the asset was cancelled.",
            ConversationState::UpdatingAsset => "Updating the asset amount was cancelled.",
            ConversationState::RemovingAsset => "Removing the asset was cancelled.",
            ConversationState::RemovingProfile => "Deleting the profile was cancelled.",
            ConversationState::ChoosingProfile | ConversationState::Idle => "Cancelled.",
        };
        self.finish(session, what)
    }

    fn stale_choice(&self, session: &mut Session, message: &str) -> Vec<Reply> {
        self.finish(session, message)
    }

    /// Active profile, or the "select a profile first" reply
    fn require_profile(session: &mut Session) -> std::result::Result<String, Vec<Reply>> {
        session.active_profile.clone().ok_or_else(|| {
            session.reset();
            vec![render::select_profile_first()]
        })
    }

    // ---------------------------------------------------------------------
    // Profile flows
    // ---------------------------------------------------------------------

    async fn choose_profile(&self, session: &mut Session) -> Vec<Reply> {
        session.reset();
        let profiles = self.store.get_profiles().await;
        if profiles.is_empty() {
            return vec![render::no_profiles()];
        }

        session.enter(ConversationState::ChoosingProfile);
        vec![render::profile_picker(
            "Select profile:",
            &profiles,
            Action::SetProfile,
            &Action::MainMenu,
        )]
    }

    async fn set_profile(&self, session: &mut Session, name: String) -> Result<Vec<Reply>> {
        if !self.store.get_profiles().await.contains(&name) {
            return Err(BotError::NotFound(format!("Profile {name} no longer exists.")));
        }

        let outcome = format!("Active profile: {name}");
        session.active_profile = Some(name);
        Ok(self.finish(session, outcome))
    }

    async fn create_profile(&self, session: &mut Session, text: &str) -> Result<Vec<Reply>> {
        let name = text.trim();
        if name.is_empty() {
            return Ok(vec![render::prompt(
                "The profile name cannot be empty. Enter the new profile name:",
                &self.cancel_keyword,
            )]);
        }

        self.store.create_profile(name).await?;
        Ok(self.finish(session, format!("Profile {name} successfully created.")))
    }

    async fn remove_profile_prompt(&self, session: &mut Session) -> Vec<Reply> {
        session.reset();
        let profiles = self.store.get_profiles().await;
        if profiles.is_empty() {
            return self.finish(session, "You don't have a profile to delete.");
        }

        session.enter(ConversationState::RemovingProfile);
        vec![render::profile_picker(
            "Select the profile to delete:",
            &profiles,
            Action::ConfirmRemoveProfile,
            &Action::ManageProfiles,
        )]
    }

    async fn delete_profile(&self, session: &mut Session, name: &str) -> Result<Vec<Reply>> {
        self.store.delete_profile(name).await?;

        if session.active_profile.as_deref() == Some(name) {
            session.active_profile = None;
        }
        Ok(self.finish(session, format!("Profile {name} successfully deleted.")))
    }

    // ---------------------------------------------------------------------
    // Asset flows
    // ---------------------------------------------------------------------

    async fn view_portfolio(&self, session: &mut Session) -> Vec<Reply> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return replies,
        };
        session.reset();

        let portfolio = self.store.get_portfolio(&profile).await;
        if portfolio.is_empty() {
            return vec![render::empty_portfolio(&profile)];
        }

        let prices = self.prices.fetch_prices(&portfolio).await;
        let valuation = Valuation::new(profile, &portfolio, &prices);
        tracing::info!(
            profile = %valuation.profile,
            assets = valuation.lines.len(),
            unpriced = valuation.unpriced(),
            total = ?valuation.total_value(),
            "Rendered valuation"
        );
        vec![render::valuation(&valuation)]
    }

    fn add_asset_prompt(&self, session: &mut Session) -> Vec<Reply> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return replies,
        };
        session.reset();
        session.enter(ConversationState::AddingAsset);

        vec![render::prompt(
            format!(
                "To add an asset to profile '{profile}', send a message in the format:\n\
                 <SYMBOL> <AMOUNT> <TOKEN_ADDRESS>\n\
                 Example: BTC 0.5 0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"
            ),
            &self.cancel_keyword,
        )]
    }

    async fn add_asset(&self, session: &mut Session, text: &str) -> Result<Vec<Reply>> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return Ok(replies),
        };

        let line = match AssetLine::parse(text) {
            Ok(line) => line,
            Err(InputError::OutOfRange) => {
                return Ok(vec![render::prompt(OUT_OF_RANGE, &self.cancel_keyword)]);
            }
            Err(InputError::WrongShape | InputError::NotANumber) => {
                return Ok(vec![render::prompt(
                    "Invalid format. Use: <SYMBOL> <AMOUNT> <TOKEN_ADDRESS>",
                    &self.cancel_keyword,
                )]);
            }
        };

        let mut portfolio = self.store.load_portfolio(&profile).await?;
        portfolio.upsert(&line.symbol, line.amount, line.token_address.clone());
        self.store.update_portfolio(&profile, &portfolio).await?;

        Ok(self.finish(
            session,
            format!(
                "Asset {} ({}) with token address {} added to profile '{profile}'.",
                line.symbol, line.amount, line.token_address
            ),
        ))
    }

    /// Entry to the remove/update flows: list the portfolio's symbols
    async fn asset_picker(&self, session: &mut Session, next: ConversationState) -> Vec<Reply> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return replies,
        };
        session.reset();

        let portfolio = self.store.get_portfolio(&profile).await;
        if portfolio.is_empty() {
            return vec![render::empty_portfolio(&profile)];
        }

        session.enter(next);
        let reply = if next == ConversationState::RemovingAsset {
            render::asset_picker(
                &format!("Select the asset to remove from profile '{profile}':"),
                &portfolio,
                Action::PickRemoveAsset,
            )
        } else {
            render::asset_picker(
                &format!("Select the asset to update in profile '{profile}':"),
                &portfolio,
                Action::PickUpdateAsset,
            )
        };
        vec![reply]
    }

    async fn remove_asset(&self, session: &mut Session, symbol: &str) -> Result<Vec<Reply>> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return Ok(replies),
        };

        let mut portfolio = self.store.load_portfolio(&profile).await?;
        if portfolio.remove(symbol).is_none() {
            return Err(not_found(symbol, &profile));
        }
        self.store.update_portfolio(&profile, &portfolio).await?;

        Ok(self.finish(session, format!("Asset {symbol} removed from profile '{profile}'.")))
    }

    async fn update_amount(&self, session: &mut Session, text: &str) -> Result<Vec<Reply>> {
        let profile = match Self::require_profile(session) {
            Ok(profile) => profile,
            Err(replies) => return Ok(replies),
        };
        let Some(symbol) = session.updating_symbol.clone() else {
            return Err(BotError::Validation(
                "There was an error. Please start again from the main menu.".into(),
            ));
        };

        let amount = match parse_amount(text) {
            Ok(amount) => amount,
            Err(InputError::OutOfRange) => {
                return Ok(vec![render::prompt(OUT_OF_RANGE, &self.cancel_keyword)]);
            }
            Err(_) => {
                return Ok(vec![render::prompt(
                    "The amount must be a number. Please try again.",
                    &self.cancel_keyword,
                )]);
            }
        };

        let mut portfolio: Portfolio = self.store.load_portfolio(&profile).await?;
        if !portfolio.set_amount(&symbol, amount) {
            return Err(not_found(&symbol, &profile));
        }
        self.store.update_portfolio(&profile, &portfolio).await?;

        Ok(self.finish(
            session,
            format!("Amount of {symbol} updated to {amount} in profile '{profile}'."),
        ))
    }
}

const OUT_OF_RANGE: &str =
    "The amount is out of range. Use a number smaller than 1e28 with at most 28 decimal places.";

fn not_found(symbol: &str, profile: &str) -> BotError {
    BotError::NotFound(format!(
        "Asset {symbol} not found in profile '{profile}'. No changes made."
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bot_core::{ConversationState, InputEvent, MemorySessionStore, Reply, UserId, DENIAL_MESSAGE};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::cache::PriceCache;
    use crate::oracle::MockPriceOracle;
    use crate::pricing::PriceFetcher;
    use crate::store::{MemoryDocumentStore, PortfolioStore};

    const OWNER: &str = "1001";

    struct Harness {
        documents: Arc<MemoryDocumentStore>,
        store: Arc<PortfolioStore>,
        machine: ConversationMachine,
        owner: UserId,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_users(&[OWNER])
        }

        fn with_users(users: &[&str]) -> Self {
            let documents = Arc::new(MemoryDocumentStore::new());
            let store = Arc::new(PortfolioStore::new(documents.clone()));
            let oracle = MockPriceOracle::new()
                .with_price("0xABC", dec!(2000.0))
                .with_price("0xBTC", dec!(50000));
            let prices = Arc::new(PriceFetcher::new(
                Arc::new(oracle),
                Arc::new(PriceCache::new(std::time::Duration::from_secs(300))),
            ));
            let machine = ConversationMachine::new(
                store.clone(),
                prices,
                Arc::new(MemorySessionStore::new()),
                bot_core::Authorizer::new(users.iter().copied()),
            );

            Self {
                documents,
                store,
                machine,
                owner: UserId::new(OWNER),
            }
        }

        async fn send(&self, event: InputEvent) -> Vec<Reply> {
            self.machine.handle(&self.owner, event).await
        }

        async fn press(&self, token: &str) -> Vec<Reply> {
            self.send(InputEvent::choice(token)).await
        }

        async fn say(&self, text: &str) -> Vec<Reply> {
            self.send(InputEvent::text(text)).await
        }

        async fn state(&self) -> ConversationState {
            self.machine.session(&self.owner).await.unwrap().state
        }

        /// Profile "main" created and selected
        async fn with_profile(self) -> Self {
            self.press("add_profile").await;
            self.say("main").await;
            self.press("choose_profile").await;
            self.press("set_profile:main").await;
            self
        }

        /// Profile "main" holding 1.5 ETH
        async fn with_eth(self) -> Self {
            let harness = self.with_profile().await;
            harness.press("add_asset").await;
            harness.say("ETH 1.5 0xABC").await;
            harness
        }
    }

    fn all_text(replies: &[Reply]) -> String {
        replies
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_unauthorized_user_denied_without_session() {
        let harness = Harness::new();
        let stranger = UserId::new("666");

        let replies = harness.machine.handle(&stranger, InputEvent::command("start")).await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, DENIAL_MESSAGE);
        assert!(replies[0].choices.is_empty());
        assert!(harness.machine.session(&stranger).await.is_none());
    }

    #[tokio::test]
    async fn test_start_shows_main_menu() {
        let harness = Harness::new();

        let replies = harness.send(InputEvent::command("/start")).await;

        assert_eq!(replies.len(), 1);
        assert!(replies[0].text.starts_with("Welcome to your personal Crypto Portfolio Bot!"));
        assert!(replies[0].tokens().contains(&"view_portfolio"));
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_add_asset_and_view_valuation() {
        let harness = Harness::new().with_eth().await;

        let replies = harness.press("view_portfolio").await;
        let text = all_text(&replies);

        assert!(text.contains("ETH: 1.5 ($3000.00)"), "{text}");
        assert!(text.contains("Total portfolio value: $3000.00"), "{text}");
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_symbol_uppercased_on_add() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_asset").await;

        let replies = harness.say("btc 0.5 0xBTC").await;

        assert!(all_text(&replies).contains("Asset BTC (0.5)"));
        let portfolio = harness.store.get_portfolio("main").await;
        assert!(portfolio.contains("BTC"));
        assert_eq!(portfolio.symbols().collect::<Vec<_>>(), vec!["BTC"]);
    }

    #[tokio::test]
    async fn test_invalid_asset_line_reprompts() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_asset").await;

        let replies = harness.say("ETH lots").await;

        assert!(replies[0].text.starts_with("Invalid format."));
        assert_eq!(harness.state().await, ConversationState::AddingAsset);
        assert!(harness.store.get_portfolio("main").await.is_empty());
    }

    #[tokio::test]
    async fn test_huge_holding_still_renders_valuation() {
        let harness = Harness::new().with_eth().await;
        harness.press("add_asset").await;
        harness.say("BTC 79228162514264337593543950 0xBTC").await;

        let replies = harness.press("view_portfolio").await;
        let text = all_text(&replies);

        assert!(text.contains("ETH: 1.5 ($3000.00)"), "{text}");
        assert!(text.contains("(value unavailable)"), "{text}");
        assert!(text.contains("Total portfolio value: $3000.00"), "{text}");

        let replies = harness.press("update_prices").await;
        assert!(all_text(&replies).contains("Total portfolio value"));
    }

    #[tokio::test]
    async fn test_amount_out_of_range_reprompts() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_asset").await;

        let replies = harness.say("ETH 1e40 0xABC").await;

        assert!(replies[0].text.starts_with("The amount is out of range."));
        assert_eq!(harness.state().await, ConversationState::AddingAsset);
        assert!(harness.store.get_portfolio("main").await.is_empty());

        harness.say("ETH 1e3 0xABC").await;
        let portfolio = harness.store.get_portfolio("main").await;
        assert_eq!(portfolio.get("ETH").unwrap().amount, dec!(1000));
    }

    #[tokio::test]
    async fn test_update_amount_out_of_range_reprompts() {
        let harness = Harness::new().with_eth().await;
        harness.press("update_asset").await;
        harness.press("update:ETH").await;

        let replies = harness.say("1e-30").await;

        assert!(replies[0].text.starts_with("The amount is out of range."));
        assert_eq!(harness.state().await, ConversationState::UpdatingAsset);
        let portfolio = harness.store.get_portfolio("main").await;
        assert_eq!(portfolio.get("ETH").unwrap().amount, dec!(1.5));
    }

    #[tokio::test]
    async fn test_help_keeps_pending_flow() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_asset").await;

        let replies = harness.press("help").await;
        assert!(replies[0].text.starts_with("Bot usage guide"));
        assert_eq!(harness.state().await, ConversationState::AddingAsset);

        harness.send(InputEvent::command("/help")).await;
        assert_eq!(harness.state().await, ConversationState::AddingAsset);

        let replies = harness.say("ETH 1.5 0xABC").await;
        assert!(replies[0].text.starts_with("Asset ETH (1.5)"));
        assert!(harness.store.get_portfolio("main").await.contains("ETH"));
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_from_every_prompt_leaves_store_untouched() {
        let harness = Harness::new().with_eth().await;

        let entries: [(&[&str], ConversationState); 5] = [
            (&["add_profile"], ConversationState::AddingProfile),
            (&["add_asset"], ConversationState::AddingAsset),
            (&["remove_asset"], ConversationState::RemovingAsset),
            (&["update_asset", "update:ETH"], ConversationState::UpdatingAsset),
            (&["remove_profile"], ConversationState::RemovingProfile),
        ];

        for (tokens, expected) in entries {
            for token in tokens {
                harness.press(token).await;
            }
            assert_eq!(harness.state().await, expected);

            let before = harness.documents.snapshot().await;
            let replies = harness.say("  Cancel ").await;

            assert!(replies[0].text.contains("cancelled"), "{expected}");
            assert_eq!(harness.documents.snapshot().await, before);
            assert_eq!(harness.state().await, ConversationState::Idle);
            let session = harness.machine.session(&harness.owner).await.unwrap();
            assert_eq!(session.updating_symbol, None);
        }
    }

    #[tokio::test]
    async fn test_update_asset_amount() {
        let harness = Harness::new().with_eth().await;
        harness.press("update_asset").await;
        harness.press("update:ETH").await;

        let replies = harness.say("2.25").await;

        assert!(replies[0].text.contains("updated to 2.25"));
        let portfolio = harness.store.get_portfolio("main").await;
        assert_eq!(portfolio.get("ETH").unwrap().amount, dec!(2.25));
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_update_amount_must_be_numeric() {
        let harness = Harness::new().with_eth().await;
        harness.press("update_asset").await;
        harness.press("update:ETH").await;

        let replies = harness.say("lots").await;

        assert!(replies[0].text.starts_with("The amount must be a number."));
        assert_eq!(harness.state().await, ConversationState::UpdatingAsset);
    }

    #[tokio::test]
    async fn test_update_missing_symbol_reports_not_found() {
        let harness = Harness::new().with_eth().await;
        harness.press("update_asset").await;
        harness.press("update:DOGE").await;
        let before = harness.store.get_portfolio("main").await;

        let replies = harness.say("10").await;

        assert_eq!(
            replies[0].text,
            "Asset DOGE not found in profile 'main'. No changes made."
        );
        assert_eq!(harness.store.get_portfolio("main").await, before);
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_remove_asset() {
        let harness = Harness::new().with_eth().await;

        let picker = harness.press("remove_asset").await;
        assert_eq!(picker[0].tokens(), vec!["remove:ETH", "start"]);

        harness.press("remove:ETH").await;

        assert!(harness.store.get_portfolio("main").await.is_empty());
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_write_failure_reports_generic_error() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_asset").await;
        harness.documents.fail_writes(true);

        let replies = harness.say("ETH 1.5 0xABC").await;

        assert_eq!(
            replies[0].text,
            "Something went wrong while saving your changes. Please try again."
        );
        assert!(replies[1].text.starts_with("Welcome"));
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_view_without_profile() {
        let harness = Harness::new();

        let replies = harness.press("view_portfolio").await;

        assert_eq!(replies[0].text, "Please select a profile first.");
        assert!(replies[0].tokens().contains(&"choose_profile"));
    }

    #[tokio::test]
    async fn test_empty_portfolio_offers_add_asset() {
        let harness = Harness::new().with_profile().await;

        let replies = harness.press("view_portfolio").await;

        assert!(replies[0].text.contains("is empty"));
        assert!(replies[0].tokens().contains(&"add_asset"));
    }

    #[tokio::test]
    async fn test_duplicate_profile_conflict() {
        let harness = Harness::new().with_profile().await;
        harness.press("add_profile").await;

        let replies = harness.say("main").await;

        assert_eq!(replies[0].text, "Profile main already exists.");
        assert_eq!(harness.store.get_profiles().await.len(), 1);
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_empty_profile_name_reprompts() {
        let harness = Harness::new();
        harness.press("add_profile").await;

        let replies = harness.say("   ").await;

        assert!(replies[0].text.starts_with("The profile name cannot be empty."));
        assert_eq!(harness.state().await, ConversationState::AddingProfile);
    }

    #[tokio::test]
    async fn test_deleting_active_profile_clears_it() {
        let harness = Harness::new().with_profile().await;
        harness.press("remove_profile").await;

        let replies = harness.press("confirm_remove:main").await;

        assert_eq!(replies[0].text, "Profile main successfully deleted.");
        let session = harness.machine.session(&harness.owner).await.unwrap();
        assert_eq!(session.active_profile, None);
        assert!(harness.store.get_profiles().await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_choice_returns_to_menu() {
        let harness = Harness::new().with_eth().await;
        let before = harness.documents.snapshot().await;

        let replies = harness.press("remove:ETH").await;

        assert_eq!(replies[0].text, "That option has expired.");
        assert_eq!(harness.documents.snapshot().await, before);
        assert_eq!(harness.state().await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_free_text_while_idle() {
        let harness = Harness::new();

        let replies = harness.say("hello").await;

        assert_eq!(replies[0].text, "Please use the menu below.");
        assert!(replies[1].text.starts_with("Welcome"));
    }

    #[tokio::test]
    async fn test_sessions_are_per_user() {
        let harness = Harness::with_users(&[OWNER, "2002"]);
        let other = UserId::new("2002");

        harness.press("add_profile").await;
        harness
            .machine
            .handle(&other, InputEvent::command("start"))
            .await;

        assert_eq!(harness.state().await, ConversationState::AddingProfile);
        let other_session = harness.machine.session(&other).await.unwrap();
        assert_eq!(other_session.state, ConversationState::Idle);
    }
}
