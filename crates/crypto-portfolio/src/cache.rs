//! Price Cache
//!
//! Time-expiring token address -> price map. Entries are never evicted; a
//! stale entry is simply ignored on read until the next `set` overwrites it.

use std::time::Duration;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    value: Decimal,
    stored_at: Instant,
}

/// Last-known prices keyed by token address
#[derive(Debug)]
pub struct PriceCache {
    entries: DashMap<String, CacheEntry>,
    expiry: Duration,
}

impl PriceCache {
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            expiry,
        }
    }

    /// Fresh value for `key`, or `None` if absent or expired
    pub fn get(&self, key: &str) -> Option<Decimal> {
        let entry = self.entries.get(key)?;
        (entry.stored_at.elapsed() < self.expiry).then_some(entry.value)
    }

    /// Store `value`, stamping the current time
    pub fn set(&self, key: impl Into<String>, value: Decimal) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
