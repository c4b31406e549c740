//! Dropdown reference data (jobsites, cost codes, equipment, trucks).
//!
//! The four lists are fetched concurrently and cached together for
//! `wizard.catalog_ttl_secs`. The `DataReady` flag the wizard waits on
//! before entering equipment steps is lowered while a fetch is in flight
//! (first load, TTL expiry, refresh) and raised when the attempt finishes.

mod ready;

pub use ready::{data_ready, DataReady, DataReadyHandle, LoadingGuard};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::{ApiError, CatalogApi};
use crate::types::SelectOption;

const CACHE_KEY: &str = "catalog";

/// All reference lists a wizard needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CatalogData {
    pub jobsites: Vec<SelectOption>,
    pub cost_codes: Vec<SelectOption>,
    pub equipment: Vec<SelectOption>,
    pub trucks: Vec<SelectOption>,
}

impl CatalogData {
    /// Look up a jobsite by id or QR code
    pub fn find_jobsite(&self, key: &str) -> Option<&SelectOption> {
        find(&self.jobsites, key)
    }

    pub fn find_cost_code(&self, key: &str) -> Option<&SelectOption> {
        find(&self.cost_codes, key)
    }

    pub fn find_equipment(&self, key: &str) -> Option<&SelectOption> {
        find(&self.equipment, key)
    }

    pub fn find_truck(&self, key: &str) -> Option<&SelectOption> {
        find(&self.trucks, key)
    }
}

fn find<'a>(options: &'a [SelectOption], key: &str) -> Option<&'a SelectOption> {
    options.iter().find(|o| o.id == key || o.code == key)
}

/// Cached reference data loader
#[derive(Clone)]
pub struct Catalog {
    api: Arc<dyn CatalogApi>,
    cache: Cache<&'static str, Arc<CatalogData>>,
    ready: Arc<DataReadyHandle>,
}

impl Catalog {
    pub fn new(api: Arc<dyn CatalogApi>, ttl: Duration, ready: DataReadyHandle) -> Self {
        Self {
            api,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            ready: Arc::new(ready),
        }
    }

    /// Return cached data, fetching all lists when the cache is cold.
    ///
    /// All four requests must succeed; the first failure is returned and
    /// nothing is cached.
    pub async fn load(&self) -> Result<Arc<CatalogData>, ApiError> {
        if let Some(cached) = self.cache.get(CACHE_KEY).await {
            return Ok(cached);
        }

        let _loading = self.ready.loading();
        let result = tokio::try_join!(
            self.api.jobsites(),
            self.api.cost_codes(),
            self.api.equipment(),
            self.api.trucks(),
        );

        let (jobsites, cost_codes, equipment, trucks) = result.map_err(|e| {
            tracing::error!(endpoint = %e.endpoint(), error = %e, "Failed to load reference data");
            e
        })?;

        tracing::debug!(
            jobsites = jobsites.len(),
            cost_codes = cost_codes.len(),
            equipment = equipment.len(),
            trucks = trucks.len(),
            "Loaded reference data"
        );

        let data = Arc::new(CatalogData {
            jobsites,
            cost_codes,
            equipment,
            trucks,
        });
        self.cache.insert(CACHE_KEY, data.clone()).await;
        Ok(data)
    }

    /// Drop cached data and fetch it again
    pub async fn refresh(&self) -> Result<Arc<CatalogData>, ApiError> {
        self.cache.invalidate(CACHE_KEY).await;
        self.load().await
    }
}
