//! Source adapters: one fetch-and-normalize unit per external data source.
//!
//! The aggregator only ever sees the [`SourceAdapter`] trait; everything
//! source-specific (selectors, browsers, fallback tables) stays behind it.

pub mod agoda;
pub mod booking;
pub mod buses;
pub mod flights;
pub mod makemytrip;
pub mod multimodal;
pub mod trains;

pub use agoda::AgodaAdapter;
pub use booking::BookingComAdapter;
pub use buses::BusSource;
pub use flights::FlightSource;
pub use makemytrip::MakeMyTripAdapter;
pub use multimodal::MultimodalLinkSource;
pub use trains::TrainSource;

use crate::config::AppConfig;
use crate::error::{SetupError, SourceFailure};
use crate::offer::Offer;
use crate::query::SearchQuery;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Aggregation category an adapter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hotels,
    Transportation,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hotels => "hotels",
            Self::Transportation => "transportation",
        }
    }
}

/// Contract every data source implements: produce normalized offers for a
/// query, or fail with one typed error. Source-specific errors must never
/// escape raw, and a changed site layout yields an empty result rather than
/// a failure.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn category(&self) -> Category;

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure>;
}

/// Static adapter sets per category. Registration order matters: on a name
/// collision during merge, the earliest-registered adapter's offer wins.
pub struct SourceRegistry {
    hotels: Vec<Arc<dyn SourceAdapter>>,
    transportation: Vec<Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new(
        hotels: Vec<Arc<dyn SourceAdapter>>,
        transportation: Vec<Arc<dyn SourceAdapter>>,
    ) -> Self {
        Self {
            hotels,
            transportation,
        }
    }

    /// The production adapter set.
    pub fn with_defaults(config: &AppConfig) -> Result<Self, SetupError> {
        Ok(Self::new(
            vec![
                Arc::new(BookingComAdapter::new(config.http_timeout)),
                Arc::new(AgodaAdapter::new(config)?),
                Arc::new(MakeMyTripAdapter::new(config)?),
            ],
            vec![
                Arc::new(FlightSource::new(config.flight_seed)),
                Arc::new(BusSource::new(config)?),
                Arc::new(TrainSource::new()),
                Arc::new(MultimodalLinkSource::new()),
            ],
        ))
    }

    pub fn adapters(&self, category: Category) -> &[Arc<dyn SourceAdapter>] {
        match category {
            Category::Hotels => &self.hotels,
            Category::Transportation => &self.transportation,
        }
    }

    /// Declared sources per category, for the health report.
    pub fn declared_sources(&self) -> Vec<(Category, &'static str)> {
        let mut sources = Vec::new();
        for category in [Category::Hotels, Category::Transportation] {
            for adapter in self.adapters(category) {
                sources.push((category, adapter.name()));
            }
        }
        sources
    }
}

// Static CSS selectors are compile-time constants; a parse failure here is a
// programming error, not a runtime condition.
macro_rules! selector {
    ($s:expr) => {
        scraper::Selector::parse($s).expect(concat!("invalid CSS selector: ", $s))
    };
}
pub(crate) use selector;

/// Browser-like user agent for plain HTTP sources.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared HTTP client for scraping adapters.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, SetupError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

/// Pull a price out of scraped text by keeping digits and dots.
/// Returns `None` when nothing numeric and positive is present.
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse::<f64>().ok().filter(|p| *p > 0.0)
}

/// Whether an HTTP error is worth retrying inside the adapter.
pub(crate) fn is_transient_http(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::OfferKind;

    struct NamedAdapter(&'static str, Category);

    #[async_trait]
    impl SourceAdapter for NamedAdapter {
        fn name(&self) -> &'static str {
            self.0
        }

        fn category(&self) -> Category {
            self.1
        }

        async fn fetch(&self, _query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
            Ok(vec![Offer::new(OfferKind::Hotel, "x", self.0)])
        }
    }

    #[test]
    fn parse_price_extracts_numbers_from_markup_text() {
        assert_eq!(parse_price("BDT 4,500"), Some(4500.0));
        assert_eq!(parse_price("$ 129.99 / night"), Some(129.99));
        assert_eq!(parse_price("Sold out"), None);
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = SourceRegistry::new(
            vec![
                Arc::new(NamedAdapter("A", Category::Hotels)),
                Arc::new(NamedAdapter("B", Category::Hotels)),
            ],
            vec![Arc::new(NamedAdapter("T", Category::Transportation))],
        );

        let names: Vec<_> = registry
            .adapters(Category::Hotels)
            .iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["A", "B"]);

        assert_eq!(
            registry.declared_sources(),
            vec![
                (Category::Hotels, "A"),
                (Category::Hotels, "B"),
                (Category::Transportation, "T"),
            ]
        );
    }
}
