//! travel_scout - multi-source travel offer aggregation.
//!
//! Fetches hotel and transportation offers from several unreliable external
//! sources concurrently, bounds total latency, collapses partial failures
//! into a still-useful result, and caches the outcome per query.
//!
//! # Architecture
//!
//! - [`adapters`] - one fetch-and-normalize unit per source, behind a trait
//! - [`aggregator`] - concurrent fan-out with timeout, merge/dedupe/sort
//! - [`cache`] - TTL result cache keyed by (category, query)
//! - [`orchestrator`] - validation, caching, parallel categories, envelope
//! - [`offer`] / [`query`] - the normalization contract and query model
//! - [`places`] - tourist-places lookup via the wiki APIs
//! - [`routes`] - static route and fare tables
//!
//! # Example
//!
//! ```no_run
//! use travel_scout::{AppConfig, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = SearchService::new(AppConfig::from_env())?;
//!     let response = service
//!         .search_params("Dhaka", "Sylhet", "2025-06-01", None)
//!         .await?;
//!     println!("{} hotels", response.hotels.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod offer;
pub mod orchestrator;
pub mod places;
pub mod query;
pub mod retry;
pub mod routes;

// Re-export key types for convenience
pub use adapters::{Category, SourceAdapter, SourceRegistry};
pub use aggregator::{Aggregator, SourceOutcome};
pub use cache::{CacheStatsReport, ResultCache};
pub use config::{AppConfig, RetryConfig};
pub use error::{SearchError, SetupError, SourceFailure, ValidationError};
pub use offer::{Offer, OfferKind, Rating};
pub use orchestrator::{HealthReport, HealthStatus, SearchResponse, SearchService};
pub use places::{PlacesClient, PlacesLookup};
pub use query::SearchQuery;
