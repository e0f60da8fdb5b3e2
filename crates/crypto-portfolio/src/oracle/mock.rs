//! Mock Price Oracle
//!
//! For testing and offline demos. Serves a static price table and can be told
//! to fail for specific addresses.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::PriceOracle;
use crate::error::{OracleError, OracleResult};

/// Mock oracle with static prices
#[derive(Debug, Default)]
pub struct MockPriceOracle {
    prices: HashMap<String, Decimal>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MockPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `price` for `token_address`
    pub fn with_price(mut self, token_address: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(token_address.into(), price);
        self
    }

    /// Simulate a network failure for `token_address`
    pub fn with_failure(mut self, token_address: impl Into<String>) -> Self {
        self.failing.insert(token_address.into());
        self
    }

    /// Number of `fetch_price` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceOracle for MockPriceOracle {
    async fn fetch_price(&self, token_address: &str) -> OracleResult<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(token_address) {
            return Err(OracleError::Status {
                address: token_address.to_string(),
                status: 503,
            });
        }

        self.prices
            .get(token_address)
            .copied()
            .ok_or_else(|| OracleError::NoPairs(token_address.to_string()))
    }

    fn name(&self) -> &str {
        "MockOracle"
    }
}
