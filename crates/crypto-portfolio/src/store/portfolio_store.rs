//! Portfolio Store
//!
//! Typed profile and portfolio operations over a `DocumentStore`.
//!
//! Display reads (`get_profiles`, `get_portfolio`) log failures and fall back
//! to empty values: "no profiles" and "store unreachable" look the same on
//! screen. Writes always propagate so the user learns the change was lost.
//! The strict `load_*` reads are for read-modify-write paths, which must not
//! mistake a failed read for an empty document.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};
use crate::model::{Locator, Portfolio, ProfileRegistry};

pub struct PortfolioStore {
    documents: Arc<dyn DocumentStore>,
}

impl PortfolioStore {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    async fn read_json<T: DeserializeOwned + Default>(&self, locator: Locator) -> StoreResult<T> {
        match self.documents.read_document(locator).await? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(T::default()),
        }
    }

    async fn write_json<T: serde::Serialize>(&self, locator: Locator, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.documents.write_document(locator, &raw).await
    }

    /// Registry, propagating failures
    pub async fn load_profiles(&self) -> StoreResult<ProfileRegistry> {
        self.read_json(Locator::REGISTRY).await
    }

    /// Registry, or an empty one if the store cannot be read
    pub async fn get_profiles(&self) -> ProfileRegistry {
        self.load_profiles().await.unwrap_or_else(|e| {
            log_read_failure("profiles", &e);
            ProfileRegistry::new()
        })
    }

    pub async fn update_profiles(&self, profiles: &ProfileRegistry) -> StoreResult<()> {
        self.write_json(Locator::REGISTRY, profiles)
            .await
            .inspect(|_| tracing::info!(profiles = profiles.len(), "Profiles updated"))
            .inspect_err(|e| tracing::error!("Error updating profiles: {}", e))
    }

    /// Portfolio of `name`, propagating failures. An unknown profile yields
    /// an empty portfolio.
    pub async fn load_portfolio(&self, name: &str) -> StoreResult<Portfolio> {
        let profiles = self.load_profiles().await?;
        match profiles.locator(name) {
            Some(locator) => self.read_json(locator).await,
            None => Ok(Portfolio::new()),
        }
    }

    /// Portfolio of `name`, or an empty one if unknown or unreadable
    pub async fn get_portfolio(&self, name: &str) -> Portfolio {
        self.load_portfolio(name).await.unwrap_or_else(|e| {
            log_read_failure(name, &e);
            Portfolio::new()
        })
    }

    pub async fn update_portfolio(&self, name: &str, portfolio: &Portfolio) -> StoreResult<()> {
        let result: StoreResult<()> = async {
            let profiles = self.load_profiles().await?;
            let locator = profiles
                .locator(name)
                .ok_or_else(|| StoreError::UnknownProfile(name.to_string()))?;
            self.write_json(locator, portfolio).await
        }
        .await;

        match &result {
            Ok(()) => tracing::info!(profile = name, assets = portfolio.len(), "Portfolio updated"),
            Err(e) => tracing::error!(profile = name, "Error updating portfolio: {}", e),
        }
        result
    }

    /// Register `name` at a fresh locator and initialize an empty portfolio there.
    ///
    /// The registry read-modify-write is not atomic against other writers.
    pub async fn create_profile(&self, name: &str) -> StoreResult<Locator> {
        let result: StoreResult<Locator> = async {
            let mut profiles = self.load_profiles().await?;
            if profiles.contains(name) {
                return Err(StoreError::ProfileExists(name.to_string()));
            }

            let locator = profiles
                .next_locator()
                .ok_or_else(|| StoreError::LocatorsExhausted(name.to_string()))?;
            profiles.insert(name, locator);
            self.update_profiles(&profiles).await?;
            self.write_json(locator, &Portfolio::new()).await?;
            Ok(locator)
        }
        .await;

        match &result {
            Ok(locator) => tracing::info!(profile = name, %locator, "Profile created"),
            Err(e) => tracing::error!(profile = name, "Error creating profile: {}", e),
        }
        result
    }

    /// Unregister `name`. Its portfolio document is left in place.
    pub async fn delete_profile(&self, name: &str) -> StoreResult<()> {
        let result: StoreResult<()> = async {
            let mut profiles = self.load_profiles().await?;
            if profiles.remove(name).is_none() {
                return Err(StoreError::UnknownProfile(name.to_string()));
            }
            self.update_profiles(&profiles).await
        }
        .await;

        match &result {
            Ok(()) => tracing::info!(profile = name, "Profile deleted"),
            Err(e) => tracing::error!(profile = name, "Error deleting profile: {}", e),
        }
        result
    }
}

fn log_read_failure(what: &str, err: &StoreError) {
    if err.is_permission_denied() {
        tracing::error!(
            "Permission denied reading {}; check store credentials and sharing: {}",
            what,
            err
        );
    } else {
        tracing::error!("Error reading {}: {}", what, err);
    }
}
