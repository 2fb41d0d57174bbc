//! Caching layer for line resolution.
//!
//! Line search results change rarely (a line's directional records are
//! stable within a day), while vehicle positions change every few seconds.
//! This wrapper caches `Linha/Buscar` responses per search term and always
//! passes position and prediction fetches straight through. With the
//! engine re-resolving
//! every tracked line each poll cycle, this removes roughly half the
//! upstream calls of a steady-state cycle.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::engine::TransitApi;
use crate::olhovivo::{ArrivalPredictionDto, LineDto, OlhoVivoError, VehicleDto};

/// Configuration for the line resolution cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached search results.
    pub ttl: Duration,

    /// Maximum number of cached search terms.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 500,
        }
    }
}

/// A [`TransitApi`] that caches line searches and delegates the rest.
pub struct CachedClient<C: TransitApi> {
    inner: C,
    lines: MokaCache<String, Arc<Vec<LineDto>>>,
}

impl<C: TransitApi> CachedClient<C> {
    /// Wrap a client with a line resolution cache.
    pub fn new(inner: C, config: &CacheConfig) -> Self {
        let lines = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, lines }
    }

    /// Access the wrapped client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Number of cached search terms.
    pub fn cached_terms(&self) -> u64 {
        self.lines.entry_count()
    }

    /// Drop all cached search results.
    pub fn invalidate(&self) {
        self.lines.invalidate_all();
    }
}

impl<C: TransitApi> TransitApi for CachedClient<C> {
    async fn authenticate(&self) -> bool {
        self.inner.authenticate().await
    }

    async fn search_lines(&self, term: &str) -> Result<Vec<LineDto>, OlhoVivoError> {
        if let Some(cached) = self.lines.get(term).await {
            return Ok((*cached).clone());
        }

        // Failures are not cached; the next cycle retries the search.
        let records = self.inner.search_lines(term).await?;
        self.lines
            .insert(term.to_string(), Arc::new(records.clone()))
            .await;

        Ok(records)
    }

    async fn line_positions(&self, internal_id: u32) -> Result<Vec<VehicleDto>, OlhoVivoError> {
        // Real-time data, never cached.
        self.inner.line_positions(internal_id).await
    }

    async fn arrival_predictions(
        &self,
        internal_id: u32,
    ) -> Result<ArrivalPredictionDto, OlhoVivoError> {
        // Real-time data, never cached.
        self.inner.arrival_predictions(internal_id).await
    }
}
