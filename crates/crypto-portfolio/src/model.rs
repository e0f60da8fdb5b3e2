//! Domain Models
//!
//! Core data types for profile and portfolio management.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a document lives in the store: a (row, column) cell address.
/// Serialized as a two-element array, e.g. `[3, 2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locator(pub u32, pub u32);

impl Locator {
    /// Cell holding the profile registry
    pub const REGISTRY: Self = Self(1, 1);

    /// Column used for portfolio documents
    pub const PORTFOLIO_COLUMN: u32 = 2;

    /// First row handed out to a profile
    pub const FIRST_PORTFOLIO_ROW: u32 = 3;

    pub const fn row(self) -> u32 {
        self.0
    }

    pub const fn column(self) -> u32 {
        self.1
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}C{}", self.0, self.1)
    }
}

/// Normalize a user-typed symbol to its stored form
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// One holding inside a portfolio
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Quantity held (stored as a JSON number)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// On-chain address used to look up the price
    pub token_address: String,
}

impl AssetRecord {
    pub fn new(amount: Decimal, token_address: impl Into<String>) -> Self {
        Self {
            amount,
            token_address: token_address.into(),
        }
    }
}

/// Holdings of one profile, keyed by uppercase symbol, in insertion order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    assets: IndexMap<String, AssetRecord>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a holding; the symbol is uppercased
    pub fn upsert(
        &mut self,
        symbol: &str,
        amount: Decimal,
        token_address: impl Into<String>,
    ) -> Option<AssetRecord> {
        self.assets
            .insert(normalize_symbol(symbol), AssetRecord::new(amount, token_address))
    }

    /// Remove a holding, keeping the order of the rest
    pub fn remove(&mut self, symbol: &str) -> Option<AssetRecord> {
        self.assets.shift_remove(&normalize_symbol(symbol))
    }

    /// Change the amount of an existing holding; false if the symbol is absent
    pub fn set_amount(&mut self, symbol: &str, amount: Decimal) -> bool {
        match self.assets.get_mut(&normalize_symbol(symbol)) {
            Some(record) => {
                record.amount = amount;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetRecord> {
        self.assets.get(&normalize_symbol(symbol))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.assets.contains_key(&normalize_symbol(symbol))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetRecord)> {
        self.assets.iter().map(|(s, r)| (s.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Profile name -> locator of its portfolio document, in creation order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRegistry {
    profiles: IndexMap<String, Locator>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn locator(&self, name: &str) -> Option<Locator> {
        self.profiles.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, locator: Locator) -> Option<Locator> {
        self.profiles.insert(name.into(), locator)
    }

    pub fn remove(&mut self, name: &str) -> Option<Locator> {
        self.profiles.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Locator)> {
        self.profiles.iter().map(|(n, l)| (n.as_str(), *l))
    }

    /// A locator no registered profile uses, or `None` once the row space
    /// is exhausted.
    ///
    /// Rows are odd and strictly above every row in use, so a slot freed by a
    /// deletion is never handed to a different profile while it is registered.
    pub fn next_locator(&self) -> Option<Locator> {
        let row = match self.profiles.values().map(|l| l.row()).max() {
            Some(max) => max.checked_add(2)?,
            None => Locator::FIRST_PORTFOLIO_ROW,
        };
        Some(Locator(row, Locator::PORTFOLIO_COLUMN))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Price per symbol for one valuation pass; `None` means unavailable
pub type PriceSnapshot = IndexMap<String, Option<Decimal>>;

/// One row of a valuation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationLine {
    pub symbol: String,
    pub amount: Decimal,
    pub price: Option<Decimal>,
}

impl ValuationLine {
    /// USD value of the holding; `None` if the price is unknown or the
    /// product does not fit in a `Decimal`
    pub fn value(&self) -> Option<Decimal> {
        self.price?.checked_mul(self.amount)
    }

    /// Priced, but too large to value
    pub fn overflows(&self) -> bool {
        self.price.is_some() && self.value().is_none()
    }
}

/// A priced view of a portfolio
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Valuation {
    pub profile: String,
    pub lines: Vec<ValuationLine>,
    pub taken_at: DateTime<Utc>,
}

impl Valuation {
    pub fn new(profile: impl Into<String>, portfolio: &Portfolio, prices: &PriceSnapshot) -> Self {
        let lines = portfolio
            .iter()
            .map(|(symbol, record)| ValuationLine {
                symbol: symbol.to_string(),
                amount: record.amount,
                price: prices.get(symbol).copied().flatten(),
            })
            .collect::<Vec<ValuationLine>>();

        for line in lines.iter().filter(|l| l.overflows()) {
            tracing::warn!(
                symbol = %line.symbol,
                amount = %line.amount,
                "Holding value overflows; reporting it as unavailable"
            );
        }

        Self {
            profile: profile.into(),
            lines,
            taken_at: Utc::now(),
        }
    }

    /// Sum of all valued holdings; unpriced ones count as zero. `None` if
    /// the sum itself overflows.
    pub fn total_value(&self) -> Option<Decimal> {
        self.lines
            .iter()
            .filter_map(ValuationLine::value)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Number of holdings without a price
    pub fn unpriced(&self) -> usize {
        self.lines.iter().filter(|l| l.price.is_none()).count()
    }
}
