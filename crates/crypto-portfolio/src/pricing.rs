//! Price Fetching
//!
//! Turns a portfolio into a symbol -> price snapshot. Every asset is looked
//! up independently (cache first, then the oracle), so one bad token address
//! or an upstream outage only blanks that asset's price.

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;

use crate::cache::PriceCache;
use crate::error::OracleError;
use crate::model::{Portfolio, PriceSnapshot};
use crate::oracle::PriceOracle;

/// Cache-backed price lookup for whole portfolios
pub struct PriceFetcher {
    oracle: Arc<dyn PriceOracle>,
    cache: Arc<PriceCache>,
}

impl PriceFetcher {
    pub fn new(oracle: Arc<dyn PriceOracle>, cache: Arc<PriceCache>) -> Self {
        Self { oracle, cache }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Price every asset of `portfolio`.
    ///
    /// The snapshot holds exactly one entry per symbol, in portfolio order;
    /// assets whose price could not be obtained map to `None`.
    pub async fn fetch_prices(&self, portfolio: &Portfolio) -> PriceSnapshot {
        let lookups = portfolio
            .iter()
            .map(|(symbol, record)| async move {
                let price = self.price_for(symbol, &record.token_address).await;
                (symbol.to_string(), price)
            });

        let snapshot: PriceSnapshot = join_all(lookups).await.into_iter().collect();

        tracing::debug!(
            assets = snapshot.len(),
            priced = snapshot.values().filter(|p| p.is_some()).count(),
            "Fetched portfolio prices"
        );
        snapshot
    }

    async fn price_for(&self, symbol: &str, token_address: &str) -> Option<Decimal> {
        if let Some(price) = self.cache.get(token_address) {
            tracing::debug!(symbol, token_address, %price, "Price cache hit");
            return Some(price);
        }

        match self.oracle.fetch_price(token_address).await {
            Ok(price) => {
                self.cache.set(token_address, price);
                tracing::info!(
                    symbol,
                    token_address,
                    %price,
                    oracle = self.oracle.name(),
                    "Fetched price"
                );
                Some(price)
            }
            Err(err) => {
                log_failure(symbol, token_address, &err);
                None
            }
        }
    }
}

fn log_failure(symbol: &str, token_address: &str, err: &OracleError) {
    match err {
        OracleError::BadRequest { body, .. } => {
            tracing::error!(symbol, token_address, response = %body, "Bad request for price");
        }
        OracleError::Transport(e) => {
            tracing::error!(symbol, token_address, "Network error when fetching price: {}", e);
        }
        e if e.is_expected() => {
            tracing::warn!(symbol, token_address, "Price unavailable: {}", e);
        }
        e => {
            tracing::error!(symbol, token_address, "Unexpected error when fetching price: {}", e);
        }
    }
}
