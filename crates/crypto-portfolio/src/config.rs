//! Bot Configuration
//!
//! Values are read from the environment (after `.env` is loaded by the
//! binary). Parsing goes through a lookup function so tests never have to
//! mutate the process environment.

use std::path::PathBuf;
use std::time::Duration;

use bot_core::UserId;

use crate::error::{PortfolioError, Result};

pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 300;
pub const DEFAULT_PRICE_API_URL: &str = "https://api.dexscreener.com";
pub const DEFAULT_PRICE_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CANCEL_KEYWORD: &str = "cancel";
pub const DEFAULT_STORE_PATH: &str = "portfolio-store.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Runtime configuration for the portfolio bot
#[derive(Clone, Debug)]
pub struct PortfolioBotConfig {
    /// Identities allowed to use the bot
    pub authorized_users: Vec<UserId>,

    /// How long a fetched price stays fresh
    pub cache_expiry: Duration,

    /// Base URL of the price oracle
    pub price_api_url: String,

    /// Per-request oracle timeout
    pub price_api_timeout: Duration,

    /// Word that aborts any free-text prompt (matched case-insensitively)
    pub cancel_keyword: String,

    /// File backing the document store
    pub store_path: PathBuf,

    /// HTTP listen address
    pub bind_addr: String,
}

impl PortfolioBotConfig {
    /// Config for the given authorized users with all other values defaulted
    pub fn new(authorized_users: Vec<UserId>) -> Self {
        Self {
            authorized_users,
            cache_expiry: Duration::from_secs(DEFAULT_CACHE_EXPIRY_SECS),
            price_api_url: DEFAULT_PRICE_API_URL.into(),
            price_api_timeout: Duration::from_secs(DEFAULT_PRICE_API_TIMEOUT_SECS),
            cancel_keyword: DEFAULT_CANCEL_KEYWORD.into(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            bind_addr: DEFAULT_BIND_ADDR.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_users = lookup("AUTHORIZED_USER_ID")
            .ok_or_else(|| PortfolioError::Config("AUTHORIZED_USER_ID is not set".into()))?;
        let authorized_users: Vec<UserId> = raw_users
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(UserId::from)
            .collect();
        if authorized_users.is_empty() {
            return Err(PortfolioError::Config("AUTHORIZED_USER_ID is empty".into()));
        }

        let mut config = Self::new(authorized_users);

        if let Some(secs) = lookup("CACHE_EXPIRY") {
            config.cache_expiry = Duration::from_secs(parse_secs("CACHE_EXPIRY", &secs)?);
        }
        if let Some(url) = lookup("PRICE_API_URL") {
            config.price_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("PRICE_API_TIMEOUT_SECS") {
            config.price_api_timeout =
                Duration::from_secs(parse_secs("PRICE_API_TIMEOUT_SECS", &secs)?);
        }
        if let Some(keyword) = lookup("CANCEL_KEYWORD").filter(|k| !k.trim().is_empty()) {
            config.cancel_keyword = keyword.trim().to_string();
        }
        if let Some(path) = lookup("STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        Ok(config)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| PortfolioError::Config(format!("{key} must be a whole number of seconds, got {value:?}")))
}
