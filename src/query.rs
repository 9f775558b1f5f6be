//! Search query validation and the stable cache-key serialization.

use crate::error::ValidationError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One inbound search. Constructed once per request, used as the cache key,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub from: String,
    pub to: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl SearchQuery {
    /// Validate raw request fields into a query.
    ///
    /// `check_out` defaults to the calendar day after `check_in`, which
    /// rolls over months and years exactly.
    pub fn new(
        from: &str,
        to: &str,
        check_in: &str,
        check_out: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let from = required("from", from)?;
        let to = required("to", to)?;
        let check_in = parse_date("checkIn", check_in)?;

        let check_out = match check_out.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date("checkOut", raw)?,
            None => check_in
                .checked_add_days(Days::new(1))
                .ok_or_else(|| ValidationError::BadDate {
                    field: "checkOut",
                    value: format!("{check_in} + 1 day"),
                })?,
        };

        if check_out < check_in {
            return Err(ValidationError::CheckOutBeforeCheckIn {
                check_in,
                check_out,
            });
        }

        Ok(Self {
            from,
            to,
            check_in,
            check_out,
        })
    }

    pub fn nights(&self) -> i64 {
        self.check_out.signed_duration_since(self.check_in).num_days()
    }

    /// Stable serialization used for cache keys. Field order is fixed so
    /// structurally identical queries always collide on the same key.
    pub fn cache_key(&self) -> String {
        format!(
            "from={}|to={}|checkIn={}|checkOut={}",
            self.from, self.to, self.check_in, self.check_out
        )
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let bad = || ValidationError::BadDate {
        field,
        value: value.to_string(),
    };
    // chrono accepts unpadded months and days, the wire format does not.
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(bad());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| bad())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn builds_a_valid_query() {
        let query = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", Some("2025-06-03")).unwrap();
        assert_eq!(query.from, "Dhaka");
        assert_eq!(query.nights(), 2);
    }

    #[test_case("2025-06-01", "2025-06-02"; "mid month")]
    #[test_case("2025-06-30", "2025-07-01"; "month rollover")]
    #[test_case("2025-12-31", "2026-01-01"; "year rollover")]
    #[test_case("2024-02-28", "2024-02-29"; "leap day")]
    fn check_out_defaults_to_the_next_calendar_day(check_in: &str, expected: &str) {
        let query = SearchQuery::new("Dhaka", "Sylhet", check_in, None).unwrap();
        assert_eq!(query.check_out.to_string(), expected);
    }

    #[test]
    fn blank_check_out_is_treated_as_absent() {
        let query = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", Some("  ")).unwrap();
        assert_eq!(query.check_out.to_string(), "2025-06-02");
    }

    #[test]
    fn rejects_missing_endpoints() {
        let err = SearchQuery::new("  ", "Sylhet", "2025-06-01", None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("from"));
        let err = SearchQuery::new("Dhaka", "", "2025-06-01", None).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("to"));
    }

    #[test_case("2025/06/01")]
    #[test_case("01-06-2025")]
    #[test_case("2025-6-1")]
    #[test_case("2025-13-01")]
    #[test_case("yesterday")]
    fn rejects_malformed_dates(raw: &str) {
        let err = SearchQuery::new("Dhaka", "Sylhet", raw, None).unwrap_err();
        assert!(matches!(err, ValidationError::BadDate { field: "checkIn", .. }));
    }

    #[test]
    fn rejects_check_out_before_check_in() {
        let err =
            SearchQuery::new("Dhaka", "Sylhet", "2025-06-10", Some("2025-06-01")).unwrap_err();
        assert!(matches!(err, ValidationError::CheckOutBeforeCheckIn { .. }));
    }

    #[test]
    fn same_day_check_out_is_allowed() {
        let query = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", Some("2025-06-01")).unwrap();
        assert_eq!(query.nights(), 0);
    }

    #[test]
    fn cache_key_is_stable_and_distinguishes_queries() {
        let a = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", None).unwrap();
        let b = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", None).unwrap();
        let c = SearchQuery::new("Dhaka", "Chittagong", "2025-06-01", None).unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert_eq!(
            a.cache_key(),
            "from=Dhaka|to=Sylhet|checkIn=2025-06-01|checkOut=2025-06-02"
        );
    }
}
