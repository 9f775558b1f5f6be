// Error taxonomy for the aggregation pipeline.
//
// Failures are recovered as close to their origin as possible: adapters
// convert every source-specific error into one `SourceFailure`, the
// aggregator logs those and moves on, and only validation problems or a
// genuine internal fault ever reach the caller.

use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

/// Rejected query input. Surfaced to the caller before any aggregation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid date `{value}` for {field}, expected YYYY-MM-DD")]
    BadDate { field: &'static str, value: String },

    #[error("check-out {check_out} is before check-in {check_in}")]
    CheckOutBeforeCheckIn {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// One adapter's failure, carrying the source name and a readable cause.
///
/// Adapters never let lower-level errors escape raw; everything crossing the
/// adapter boundary is one of these variants or an empty result.
#[derive(Error, Debug)]
pub enum SourceFailure {
    #[error("{adapter}: network error: {cause}")]
    Network { adapter: &'static str, cause: String },

    #[error("{adapter}: parse error: {cause}")]
    Parse { adapter: &'static str, cause: String },

    #[error("{adapter}: browser error: {cause}")]
    Browser { adapter: &'static str, cause: String },
}

impl SourceFailure {
    pub fn network(source: &'static str, cause: impl ToString) -> Self {
        Self::Network {
            adapter: source,
            cause: cause.to_string(),
        }
    }

    pub fn parse(source: &'static str, cause: impl ToString) -> Self {
        Self::Parse {
            adapter: source,
            cause: cause.to_string(),
        }
    }

    pub fn browser(source: &'static str, cause: impl ToString) -> Self {
        Self::Browser {
            adapter: source,
            cause: cause.to_string(),
        }
    }

    /// Which adapter produced this failure.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Network { adapter, .. }
            | Self::Parse { adapter, .. }
            | Self::Browser { adapter, .. } => adapter,
        }
    }

    /// Transient failures are worth an in-adapter retry; parse and browser
    /// failures are not, since the same input will fail the same way.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Failure of a setup step, before any request is in flight.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Top-level outcome of one search call.
///
/// A degraded category is not an error: callers always receive a well-formed
/// envelope with empty lists where sources failed. Only the variants below
/// abort a search.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("search cancelled: superseded by a newer request for the same session")]
    Cancelled,

    #[error("search deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// True for caller mistakes (4xx-equivalent), false for service faults.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
