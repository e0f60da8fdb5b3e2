//! Price Oracle Integration
//!
//! Abstraction over USD price sources keyed by token address.

mod dexscreener;
mod mock;

pub use dexscreener::DexScreenerOracle;
pub use mock::MockPriceOracle;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::OracleResult;

/// Price oracle trait (Strategy pattern)
///
/// One call prices one token address. Implementations report every failure
/// as an `OracleError`; deciding what a failure means for a valuation is the
/// caller's job.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Current USD price for a token address
    async fn fetch_price(&self, token_address: &str) -> OracleResult<Decimal>;

    /// Oracle name (for logs)
    fn name(&self) -> &str;
}
