//! Request orchestration: validate, consult the cache, run all categories
//! concurrently, and assemble the response envelope.
//!
//! Degradation is invisible to the caller: a category whose sources all
//! failed is an empty list, never an error object.

use crate::adapters::{Category, SourceRegistry};
use crate::aggregator::{Aggregator, SourceOutcome};
use crate::cache::{CacheStatsReport, ResultCache};
use crate::config::AppConfig;
use crate::error::{SearchError, SetupError};
use crate::offer::Offer;
use crate::places::{PlacesClient, PlacesLookup};
use crate::query::SearchQuery;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;
use tracing::{info, warn};

const PLACES_SCOPE: &str = "places";

/// The response envelope returned for every successful search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub transportation: Vec<Offer>,
    pub hotels: Vec<Offer>,
    pub tourist_places: Vec<Offer>,
    pub meta: SearchMeta,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub search_params: SearchQuery,
    pub timestamp: DateTime<Utc>,
    pub counts: CategoryCounts,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub transportation: usize,
    pub hotels: usize,
    pub tourist_places: usize,
}

/// Last observed outcome for one declared source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SourceState {
    Untried,
    Healthy { offers: usize },
    Failing { reason: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    pub source: &'static str,
    pub category: Category,
    #[serde(flatten)]
    pub state: SourceState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Operability snapshot: uptime, cache size, declared source status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub uptime_secs: u64,
    pub cache_entries: usize,
    pub sources: Vec<SourceStatus>,
}

struct SessionRun {
    id: u64,
    abort: AbortHandle,
}

/// The service owning the whole pipeline: registry, aggregator, cache, and
/// places lookup. Constructed once at process start and shared behind `Arc`.
pub struct SearchService {
    config: AppConfig,
    registry: Arc<SourceRegistry>,
    aggregator: Aggregator,
    cache: ResultCache,
    places: Arc<dyn PlacesLookup>,
    started_at: Instant,
    source_status: RwLock<HashMap<&'static str, SourceStatus>>,
    sessions: DashMap<String, SessionRun>,
    run_counter: AtomicU64,
}

impl SearchService {
    pub fn new(config: AppConfig) -> Result<Self, SetupError> {
        let registry = SourceRegistry::with_defaults(&config)?;
        let places = Arc::new(PlacesClient::new(config.http_timeout)?);
        Ok(Self::with_sources(config, registry, places))
    }

    /// Assemble a service from explicit parts. This is the seam tests use to
    /// swap in scripted sources.
    pub fn with_sources(
        config: AppConfig,
        registry: SourceRegistry,
        places: Arc<dyn PlacesLookup>,
    ) -> Self {
        let source_status = registry
            .declared_sources()
            .into_iter()
            .map(|(category, source)| {
                (
                    source,
                    SourceStatus {
                        source,
                        category,
                        state: SourceState::Untried,
                    },
                )
            })
            .collect();

        Self {
            aggregator: Aggregator::new(config.category_timeout),
            cache: ResultCache::new(config.cache_ttl),
            config,
            registry: Arc::new(registry),
            places,
            started_at: Instant::now(),
            source_status: RwLock::new(source_status),
            sessions: DashMap::new(),
            run_counter: AtomicU64::new(0),
        }
    }

    /// Validate raw request fields and run the search.
    pub async fn search_params(
        &self,
        from: &str,
        to: &str,
        check_in: &str,
        check_out: Option<&str>,
    ) -> Result<SearchResponse, SearchError> {
        let query = SearchQuery::new(from, to, check_in, check_out)?;
        self.search(query).await
    }

    /// Run one search under the outer deadline. The per-category timeouts
    /// are strictly tighter, so the deadline expiring means something is
    /// wrong inside the service itself.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse, SearchError> {
        let budget = self.config.search_timeout;
        match tokio::time::timeout(budget, self.run_search(&query)).await {
            Ok(response) => Ok(response),
            Err(_) => {
                warn!(budget_secs = budget.as_secs(), "search deadline exceeded");
                Err(SearchError::DeadlineExceeded(budget))
            }
        }
    }

    /// Like [`search`](Self::search), but keeps at most one in-flight run
    /// per logical client session: a new request for the same session aborts
    /// the previous one, which then observes [`SearchError::Cancelled`].
    pub async fn search_for_session(
        self: &Arc<Self>,
        session_id: &str,
        query: SearchQuery,
    ) -> Result<SearchResponse, SearchError> {
        let run_id = self.run_counter.fetch_add(1, Ordering::SeqCst);
        let service = Arc::clone(self);
        let task = tokio::spawn(async move { service.search(query).await });
        let abort = task.abort_handle();

        if let Some(previous) = self
            .sessions
            .insert(session_id.to_string(), SessionRun { id: run_id, abort })
        {
            info!(session = session_id, "superseding in-flight search");
            previous.abort.abort();
        }

        let result = match task.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(SearchError::Cancelled),
            Err(err) => Err(SearchError::Internal(err.to_string())),
        };

        // Only drop the registration if it is still ours; a newer run may
        // have replaced it already.
        self.sessions
            .remove_if(session_id, |_, run| run.id == run_id);
        result
    }

    async fn run_search(&self, query: &SearchQuery) -> SearchResponse {
        info!(
            from = %query.from,
            to = %query.to,
            check_in = %query.check_in,
            check_out = %query.check_out,
            "searching"
        );

        // All categories start simultaneously; none waits for another.
        let (transportation, hotels, tourist_places) = tokio::join!(
            self.category_results(Category::Transportation, query),
            self.category_results(Category::Hotels, query),
            self.tourist_places(query),
        );

        let counts = CategoryCounts {
            transportation: transportation.len(),
            hotels: hotels.len(),
            tourist_places: tourist_places.len(),
        };
        SearchResponse {
            transportation,
            hotels,
            tourist_places,
            meta: SearchMeta {
                search_params: query.clone(),
                timestamp: Utc::now(),
                counts,
            },
        }
    }

    async fn category_results(&self, category: Category, query: &SearchQuery) -> Vec<Offer> {
        if let Some(cached) = self.cache.get(category.label(), query) {
            info!(
                category = category.label(),
                count = cached.len(),
                "returning cached results"
            );
            return cached;
        }

        let (offers, outcomes) = self
            .aggregator
            .aggregate(&self.registry, category, query)
            .await;
        self.record_outcomes(&outcomes);
        self.cache.set(category.label(), query, offers.clone());
        offers
    }

    async fn tourist_places(&self, query: &SearchQuery) -> Vec<Offer> {
        if let Some(cached) = self.cache.get(PLACES_SCOPE, query) {
            return cached;
        }
        let places = self.places.lookup(query).await;
        self.cache.set(PLACES_SCOPE, query, places.clone());
        places
    }

    fn record_outcomes(&self, outcomes: &[SourceOutcome]) {
        let mut status = self.source_status.write();
        for outcome in outcomes {
            let state = match outcome {
                SourceOutcome::Succeeded { count, .. } => SourceState::Healthy { offers: *count },
                SourceOutcome::Failed { reason, .. } => SourceState::Failing {
                    reason: reason.clone(),
                },
                SourceOutcome::TimedOut { .. } => SourceState::Failing {
                    reason: "timed out".to_string(),
                },
            };
            if let Some(entry) = status.get_mut(outcome.source()) {
                entry.state = state;
            }
        }
    }

    /// Empty the result cache, reporting how many entries were removed.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.clear();
        info!(removed, "cache cleared");
        removed
    }

    pub fn cache_stats(&self) -> CacheStatsReport {
        self.cache.stats()
    }

    pub fn health(&self) -> HealthReport {
        let mut sources: Vec<SourceStatus> =
            self.source_status.read().values().cloned().collect();
        sources.sort_by(|a, b| {
            a.category
                .label()
                .cmp(b.category.label())
                .then(a.source.cmp(b.source))
        });

        let status = if sources
            .iter()
            .any(|s| matches!(s.state, SourceState::Failing { .. }))
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthReport {
            status,
            uptime_secs: self.started_at.elapsed().as_secs(),
            cache_entries: self.cache.len(),
            sources,
        }
    }
}
