//! Bangladesh Railway schedule lookup. Pure table, no I/O.

use crate::adapters::{Category, SourceAdapter};
use crate::error::SourceFailure;
use crate::offer::{Offer, OfferKind};
use crate::query::SearchQuery;
use async_trait::async_trait;
use tracing::info;

const SOURCE: &str = "Bangladesh Railway";
const BOOKING_SITE: &str = "https://eticket.railway.gov.bd";

struct TrainRun {
    name: &'static str,
    classes: &'static str,
    fare: f64,
    duration: &'static str,
    departure: &'static str,
}

const SCHEDULE: &[(&str, &str, &[TrainRun])] = &[
    (
        "dhaka",
        "chittagong",
        &[
            TrainRun { name: "Suborna Express (701/702)", classes: "AC / Snigdha / S.Chair", fare: 650.0, duration: "5h 30m", departure: "07:00 AM" },
            TrainRun { name: "Mahanagar Provati (703/704)", classes: "AC / S.Chair", fare: 580.0, duration: "5h 45m", departure: "07:40 AM" },
            TrainRun { name: "Turna Express (741/742)", classes: "AC / S.Chair / Shovon", fare: 550.0, duration: "6h", departure: "11:30 PM" },
            TrainRun { name: "Chattala Express (763/764)", classes: "S.Chair / Shovon", fare: 480.0, duration: "6h 15m", departure: "03:00 PM" },
        ],
    ),
    (
        "dhaka",
        "sylhet",
        &[
            TrainRun { name: "Parabat Express (709/710)", classes: "AC / S.Chair / Shovon", fare: 550.0, duration: "6h 30m", departure: "06:40 AM" },
            TrainRun { name: "Upaban Express (725/726)", classes: "AC / S.Chair", fare: 520.0, duration: "7h", departure: "09:50 PM" },
            TrainRun { name: "Jayantika Express (727/728)", classes: "S.Chair / Shovon", fare: 420.0, duration: "7h 30m", departure: "12:00 PM" },
        ],
    ),
    (
        "dhaka",
        "rajshahi",
        &[
            TrainRun { name: "Silk City Express (753/754)", classes: "AC / S.Chair", fare: 480.0, duration: "4h", departure: "02:40 PM" },
            TrainRun { name: "Dhumketu Express (757/758)", classes: "AC / S.Chair", fare: 520.0, duration: "3h 40m", departure: "06:00 AM" },
            TrainRun { name: "Padma Express (765/766)", classes: "S.Chair / Shovon", fare: 400.0, duration: "5h", departure: "09:00 PM" },
        ],
    ),
    (
        "dhaka",
        "khulna",
        &[
            TrainRun { name: "Sundarban Express (725/726)", classes: "AC / S.Chair", fare: 500.0, duration: "8h", departure: "06:20 AM" },
            TrainRun { name: "Chitra Express (763/764)", classes: "S.Chair / Shovon", fare: 370.0, duration: "9h", departure: "10:00 PM" },
            TrainRun { name: "Sagardari Express (785/786)", classes: "AC / S.Chair", fare: 450.0, duration: "8h 30m", departure: "07:30 PM" },
        ],
    ),
    (
        "dhaka",
        "rangpur",
        &[
            TrainRun { name: "Rangpur Express (771/772)", classes: "S.Chair / Shovon", fare: 400.0, duration: "8h", departure: "09:45 PM" },
            TrainRun { name: "Kurigram Express (789/790)", classes: "AC / S.Chair", fare: 480.0, duration: "7h 30m", departure: "08:00 AM" },
        ],
    ),
];

const RAIL_CITIES: &[&str] = &[
    "dhaka",
    "chittagong",
    "chattogram",
    "sylhet",
    "rajshahi",
    "khulna",
    "rangpur",
    "mymensingh",
    "comilla",
];

pub struct TrainSource;

impl TrainSource {
    pub fn new() -> Self {
        Self
    }

    fn is_rail_city(city: &str) -> bool {
        let c = city.to_lowercase();
        RAIL_CITIES.iter().any(|known| c.contains(known))
    }

    /// Chattogram and Chittagong name the same station.
    fn normalize(city: &str) -> String {
        city.trim().to_lowercase().replace("chattogram", "chittagong")
    }

    fn runs_between(from: &str, to: &str) -> Option<&'static [TrainRun]> {
        let f = Self::normalize(from);
        let t = Self::normalize(to);
        SCHEDULE
            .iter()
            .find(|(a, b, _)| {
                (f.contains(a) && t.contains(b)) || (f.contains(b) && t.contains(a))
            })
            .map(|(_, _, runs)| *runs)
    }
}

impl Default for TrainSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for TrainSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn category(&self) -> Category {
        Category::Transportation
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        if !Self::is_rail_city(&query.from) || !Self::is_rail_city(&query.to) {
            info!(from = %query.from, to = %query.to, "not a rail route");
            return Ok(Vec::new());
        }

        let Some(runs) = Self::runs_between(&query.from, &query.to) else {
            info!(from = %query.from, to = %query.to, "no scheduled trains");
            return Ok(Vec::new());
        };

        let offers = runs
            .iter()
            .map(|run| Offer {
                price: Some(run.fare),
                currency: Some("BDT".to_string()),
                provider: Some(SOURCE.to_string()),
                duration: Some(run.duration.to_string()),
                departure_time: Some(run.departure.to_string()),
                arrival_time: Some("See website".to_string()),
                stops: Some(0),
                description: Some(format!("{} · {} · {SOURCE}", run.classes, run.duration)),
                booking_link: Some(BOOKING_SITE.to_string()),
                ..Offer::new(OfferKind::Train, run.name, SOURCE)
            })
            .collect::<Vec<_>>();

        info!(count = offers.len(), "found scheduled trains");
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn query(from: &str, to: &str) -> SearchQuery {
        SearchQuery::new(from, to, "2025-06-01", None).unwrap()
    }

    #[tokio::test]
    async fn looks_up_scheduled_runs() {
        let offers = TrainSource::new()
            .fetch(&query("Dhaka", "Sylhet"))
            .await
            .unwrap();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers[0].name, "Parabat Express (709/710)");
        assert_eq!(offers[0].price, Some(550.0));
        assert_eq!(offers[0].kind, OfferKind::Train);
        assert_eq!(offers[0].source, SOURCE);
        assert_eq!(offers[0].booking_link.as_deref(), Some(BOOKING_SITE));
    }

    #[tokio::test]
    async fn routes_are_symmetric() {
        let out = TrainSource::new().fetch(&query("Dhaka", "Khulna")).await.unwrap();
        let back = TrainSource::new().fetch(&query("Khulna", "Dhaka")).await.unwrap();
        assert_eq!(out.len(), back.len());
        assert_eq!(out[0].name, back[0].name);
    }

    #[tokio::test]
    async fn chattogram_normalizes_to_chittagong() {
        let offers = TrainSource::new()
            .fetch(&query("Dhaka", "Chattogram"))
            .await
            .unwrap();
        assert_eq!(offers.len(), 4);
        assert_eq!(offers[0].name, "Suborna Express (701/702)");
    }

    #[test_case("Dhaka", "London"; "international")]
    #[test_case("Dhaka", "Barisal"; "no rail link")]
    #[test_case("Sylhet", "Rajshahi"; "pair not scheduled")]
    fn unknown_pairs_return_empty(from: &str, to: &str) {
        let offers = tokio_test::block_on(TrainSource::new().fetch(&query(from, to))).unwrap();
        assert!(offers.is_empty());
    }
}
