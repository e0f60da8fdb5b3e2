//! DexScreener Price Oracle
//!
//! `GET {base}/latest/dex/tokens/{address}` returns every trading pair of the
//! token; the first pair's `priceUsd` is taken as the token price.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::PriceOracle;
use crate::config::{DEFAULT_PRICE_API_TIMEOUT_SECS, DEFAULT_PRICE_API_URL};
use crate::error::{OracleError, OracleResult};

#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    #[serde(default)]
    pairs: Option<Vec<PairQuote>>,
}

#[derive(Debug, Deserialize)]
struct PairQuote {
    #[serde(rename = "priceUsd", default)]
    price_usd: Option<serde_json::Value>,
}

/// HTTP client for the DexScreener token endpoint
#[derive(Clone, Debug)]
pub struct DexScreenerOracle {
    client: Client,
    base_url: String,
}

impl Default for DexScreenerOracle {
    fn default() -> Self {
        Self::new(
            DEFAULT_PRICE_API_URL,
            Duration::from_secs(DEFAULT_PRICE_API_TIMEOUT_SECS),
        )
    }
}

impl DexScreenerOracle {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint for `token_address`, which is percent-encoded as a single
    /// path segment
    fn token_url(&self, token_address: &str) -> OracleResult<Url> {
        let invalid = || OracleError::InvalidUrl(self.base_url.clone());

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(["latest", "dex", "tokens", token_address]);
        Ok(url)
    }
}

fn parse_price(address: &str, value: &serde_json::Value) -> OracleResult<Decimal> {
    let invalid = || OracleError::InvalidPrice {
        address: address.to_string(),
        value: value.to_string(),
    };

    match value {
        serde_json::Value::String(s) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| invalid()),
        serde_json::Value::Number(n) => n
            .as_f64()
            .and_then(|f| Decimal::try_from(f).ok())
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

#[async_trait]
impl PriceOracle for DexScreenerOracle {
    async fn fetch_price(&self, token_address: &str) -> OracleResult<Decimal> {
        let url = self.token_url(token_address)?;
        tracing::debug!(%url, "Requesting price");

        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body: TokenPairsResponse = response
                    .json()
                    .await
                    .map_err(|e| OracleError::Decode(e.to_string()))?;

                let pair = body
                    .pairs
                    .and_then(|pairs| pairs.into_iter().next())
                    .ok_or_else(|| OracleError::NoPairs(token_address.to_string()))?;

                let price = pair
                    .price_usd
                    .filter(|v| !v.is_null())
                    .ok_or_else(|| OracleError::MissingPrice(token_address.to_string()))?;

                parse_price(token_address, &price)
            }
            StatusCode::BAD_REQUEST => {
                let body = response.text().await.unwrap_or_default();
                Err(OracleError::BadRequest {
                    address: token_address.to_string(),
                    body,
                })
            }
            status => Err(OracleError::Status {
                address: token_address.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    fn name(&self) -> &str {
        "DexScreener"
    }
}
