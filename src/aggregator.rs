//! The aggregation core: run every adapter for a category concurrently,
//! bound total wall-clock time, and collapse partial failures into a single
//! deduplicated, sorted result.
//!
//! One failing or timed-out adapter never affects the others and never fails
//! the aggregation; if every adapter fails the category is simply empty.

use crate::adapters::{Category, SourceRegistry};
use crate::offer::Offer;
use crate::query::SearchQuery;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How one adapter's run ended, for logging and the health report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Succeeded { source: &'static str, count: usize },
    Failed { source: &'static str, reason: String },
    TimedOut { source: &'static str },
}

impl SourceOutcome {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Succeeded { source, .. }
            | Self::Failed { source, .. }
            | Self::TimedOut { source } => source,
        }
    }
}

pub struct Aggregator {
    timeout: Duration,
}

impl Aggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Fan out to every adapter registered for `category`, wait for all of
    /// them to settle but no longer than the timeout, then merge survivors.
    ///
    /// The timeout is cooperative: a straggler's future is dropped, which
    /// cancels it at its next suspension point, and whatever it would have
    /// returned is discarded.
    pub async fn aggregate(
        &self,
        registry: &SourceRegistry,
        category: Category,
        query: &SearchQuery,
    ) -> (Vec<Offer>, Vec<SourceOutcome>) {
        let tasks: Vec<_> = registry
            .adapters(category)
            .iter()
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                let query = query.clone();
                let budget = self.timeout;
                tokio::spawn(async move {
                    let name = adapter.name();
                    (name, tokio::time::timeout(budget, adapter.fetch(&query)).await)
                })
            })
            .collect();

        let settled = futures::future::join_all(tasks).await;

        let mut merged = Vec::new();
        let mut outcomes = Vec::with_capacity(settled.len());
        for joined in settled {
            match joined {
                Ok((source, Ok(Ok(offers)))) => {
                    info!(source, count = offers.len(), category = category.label(), "source succeeded");
                    outcomes.push(SourceOutcome::Succeeded {
                        source,
                        count: offers.len(),
                    });
                    merged.extend(offers);
                }
                Ok((source, Ok(Err(failure)))) => {
                    warn!(source, error = %failure, category = category.label(), "source failed");
                    outcomes.push(SourceOutcome::Failed {
                        source,
                        reason: failure.to_string(),
                    });
                }
                Ok((source, Err(_elapsed))) => {
                    warn!(source, timeout_secs = self.timeout.as_secs(), category = category.label(), "source timed out");
                    outcomes.push(SourceOutcome::TimedOut { source });
                }
                Err(join_error) => {
                    // A panicking adapter is indistinguishable from a failed
                    // one as far as the merge is concerned.
                    warn!(error = %join_error, category = category.label(), "source task panicked");
                }
            }
        }

        let offers = merge(category, merged);
        info!(
            category = category.label(),
            count = offers.len(),
            "aggregation complete"
        );
        (offers, outcomes)
    }
}

/// Admission, dedupe, and ordering for one category's concatenated offers.
/// Input order is registration order, which decides name collisions.
pub fn merge(category: Category, offers: Vec<Offer>) -> Vec<Offer> {
    let admitted = match category {
        // Price is part of the admission predicate for hotels; an unknown
        // price cannot be ranked.
        Category::Hotels => offers
            .into_iter()
            .filter(|offer| !offer.name.is_empty() && offer.has_known_price())
            .collect(),
        Category::Transportation => offers
            .into_iter()
            .filter(|offer| !offer.name.is_empty())
            .collect(),
    };

    let mut unique = dedupe_by_name(admitted);
    sort_for_category(category, &mut unique);
    unique
}

/// Exact, case-sensitive display-name dedupe; the first occurrence wins.
pub fn dedupe_by_name(offers: Vec<Offer>) -> Vec<Offer> {
    let mut seen = HashSet::new();
    offers
        .into_iter()
        .filter(|offer| seen.insert(offer.name.clone()))
        .collect()
}

fn sort_for_category(category: Category, offers: &mut [Offer]) {
    match category {
        Category::Hotels => {
            offers.sort_by(|a, b| a.price_sort_key().total_cmp(&b.price_sort_key()));
        }
        Category::Transportation => {
            offers.sort_by(|a, b| {
                a.kind
                    .transport_rank()
                    .cmp(&b.kind.transport_rank())
                    .then(a.is_informational().cmp(&b.is_informational()))
                    .then(a.price_sort_key().total_cmp(&b.price_sort_key()))
            });
        }
    }
}
