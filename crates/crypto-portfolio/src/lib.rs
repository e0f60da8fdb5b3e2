//! # crypto-portfolio
//!
//! Multi-profile crypto portfolio tracking behind a button-driven chat flow.
//!
//! ## Data layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DocumentStore (cell-addressed JSON documents)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  R1C1  registry   {"main": [3, 2], "alt": [5, 2]}           │
//! │  R3C2  main       {"ETH": {"amount": 1.5, "token_address"}} │
//! │  R5C2  alt        {}                                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices come from a `PriceOracle` keyed by token contract address and are
//! held in a `PriceCache` for a configurable expiry, so repeated views of the
//! same portfolio do not hit the oracle.

pub mod cache;
pub mod config;
pub mod conversation;
pub mod error;
pub mod model;
pub mod oracle;
pub mod pricing;
pub mod store;

pub use cache::PriceCache;
pub use config::PortfolioBotConfig;
pub use conversation::ConversationMachine;
pub use error::{OracleError, PortfolioError, Result, StoreError};
pub use model::{AssetRecord, Locator, Portfolio, PriceSnapshot, ProfileRegistry, Valuation};
pub use oracle::{DexScreenerOracle, MockPriceOracle, PriceOracle};
pub use pricing::PriceFetcher;
pub use store::{DocumentStore, FileDocumentStore, MemoryDocumentStore, PortfolioStore};
