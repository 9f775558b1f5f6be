//! Bus options for domestic Bangladesh routes.
//!
//! Primary path scrapes Shohoz trip cards; when the scrape fails or finds
//! nothing, a known-operator fare table produces estimated options instead,
//! so the category degrades rather than disappears.

use crate::adapters::{self, selector, Category, SourceAdapter};
use crate::config::AppConfig;
use crate::error::{SetupError, SourceFailure};
use crate::offer::{Offer, OfferKind};
use crate::query::SearchQuery;
use crate::retry::with_retry;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{info, warn};

const SOURCE: &str = "Shohoz";
const FALLBACK_SOURCE: &str = "TravelScout";

static TRIP: Lazy<Selector> =
    Lazy::new(|| selector!(".trip-item, .bus-list-item, [class*='tripItem']"));
static OPERATOR: Lazy<Selector> =
    Lazy::new(|| selector!(".operator-name, .company-name, h3, h4"));
static FARE: Lazy<Selector> = Lazy::new(|| selector!(".fare, .price, [class*='fare']"));
static DEPARTURE: Lazy<Selector> = Lazy::new(|| selector!(".departure, .dep-time"));
static ARRIVAL: Lazy<Selector> = Lazy::new(|| selector!(".arrival, .arr-time"));

const BD_CITIES: &[&str] = &[
    "dhaka",
    "chittagong",
    "chattogram",
    "sylhet",
    "rajshahi",
    "khulna",
    "barisal",
    "rangpur",
    "mymensingh",
    "comilla",
    "gazipur",
    "narayanganj",
    "cox's bazar",
    "coxs bazar",
];

// (name, coach type, fare multiplier)
const OPERATORS: &[(&str, &str, f64)] = &[
    ("Green Line Paribahan", "AC", 1.5),
    ("Hanif Enterprise", "AC", 1.2),
    ("Ena Transport", "AC", 1.3),
    ("Shyamoli Paribahan", "AC/Non-AC", 1.0),
    ("S.R. Travels", "AC", 1.4),
    ("Desh Travels", "AC", 1.1),
    ("BRTC", "Non-AC/AC", 0.8),
];

// Base fares in BDT for known city pairs; unlisted pairs fall back to 500.
const BASE_FARES: &[(&str, &str, f64)] = &[
    ("dhaka", "chittagong", 800.0),
    ("dhaka", "chattogram", 800.0),
    ("dhaka", "sylhet", 700.0),
    ("dhaka", "rajshahi", 650.0),
    ("dhaka", "khulna", 600.0),
    ("dhaka", "barisal", 500.0),
    ("dhaka", "rangpur", 750.0),
    ("dhaka", "mymensingh", 250.0),
    ("dhaka", "comilla", 200.0),
    ("dhaka", "cox's bazar", 1200.0),
    ("dhaka", "coxs bazar", 1200.0),
    ("chittagong", "cox's bazar", 500.0),
    ("chittagong", "coxs bazar", 500.0),
    ("chittagong", "sylhet", 900.0),
    ("rajshahi", "khulna", 450.0),
];

const DEPARTURE_TIMES: &[&str] = &[
    "06:00 AM",
    "08:00 AM",
    "10:30 AM",
    "01:00 PM",
    "05:00 PM",
    "08:00 PM",
    "10:30 PM",
];

pub struct BusSource {
    client: reqwest::Client,
    retry: crate::config::RetryConfig,
}

impl BusSource {
    pub fn new(config: &AppConfig) -> Result<Self, SetupError> {
        Ok(Self {
            client: adapters::http_client(config.http_timeout)?,
            retry: config.retry.clone(),
        })
    }

    fn is_domestic(from: &str, to: &str) -> bool {
        let f = from.to_lowercase();
        let t = to.to_lowercase();
        BD_CITIES.iter().any(|c| f.contains(c)) && BD_CITIES.iter().any(|c| t.contains(c))
    }

    fn booking_url(from: &str, to: &str) -> String {
        format!(
            "https://www.shohoz.com/bus-tickets/{}-to-{}",
            urlencoding::encode(from),
            urlencoding::encode(to)
        )
    }

    fn search_url(from: &str, to: &str, query: &SearchQuery) -> String {
        format!(
            "{}?journeyDate={}",
            Self::booking_url(from, to),
            query.check_in
        )
    }

    fn parse_trip_cards(html: &str, from: &str, to: &str) -> Vec<Offer> {
        let document = Html::parse_document(html);
        let booking_link = Self::booking_url(from, to);
        let mut buses = Vec::new();

        for trip in document.select(&TRIP) {
            let name = trip
                .select(&OPERATOR)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let price = trip
                .select(&FARE)
                .next()
                .and_then(|el| adapters::parse_price(&el.text().collect::<String>()));

            if name.is_empty() && price.is_none() {
                continue;
            }

            let time_text = |sel: &Selector| {
                trip.select(sel)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "See website".to_string())
            };

            buses.push(Offer {
                price,
                currency: Some("BDT".to_string()),
                provider: Some(if name.is_empty() {
                    SOURCE.to_string()
                } else {
                    name.clone()
                }),
                duration: Some("See website".to_string()),
                departure_time: Some(time_text(&DEPARTURE)),
                arrival_time: Some(time_text(&ARRIVAL)),
                stops: Some(0),
                description: Some(format!("{from} → {to} Bus")),
                booking_link: Some(booking_link.clone()),
                ..Offer::new(
                    OfferKind::Bus,
                    if name.is_empty() {
                        "Bus Service".to_string()
                    } else {
                        name
                    },
                    SOURCE,
                )
            });
        }

        buses
    }

    /// Estimated options from the operator table when the scrape yields
    /// nothing.
    fn fallback_options(from: &str, to: &str) -> Vec<Offer> {
        let f = from.to_lowercase();
        let t = to.to_lowercase();
        let base_fare = BASE_FARES
            .iter()
            .find(|(a, b, _)| (f.contains(a) && t.contains(b)) || (f.contains(b) && t.contains(a)))
            .map(|(_, _, fare)| *fare)
            .unwrap_or(500.0);
        let est_hours = (base_fare / 100.0 + 2.0).round() as u32;
        let booking_link = Self::booking_url(&f, &t);

        OPERATORS
            .iter()
            .take(5)
            .enumerate()
            .map(|(i, (name, coach, mult))| Offer {
                price: Some((base_fare * mult).round()),
                currency: Some("BDT".to_string()),
                provider: Some(name.to_string()),
                duration: Some(format!("~{est_hours}h")),
                departure_time: Some(DEPARTURE_TIMES[i % DEPARTURE_TIMES.len()].to_string()),
                arrival_time: Some("See booking site".to_string()),
                stops: Some(0),
                description: Some(format!("{coach} Coach · {from} → {to} · ~{est_hours}h")),
                booking_link: Some(booking_link.clone()),
                ..Offer::new(OfferKind::Bus, name.to_string(), FALLBACK_SOURCE)
            })
            .collect()
    }

    async fn scrape_shohoz(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        let from = query.from.to_lowercase();
        let to = query.to.to_lowercase();
        let url = Self::search_url(&from, &to, query);

        let html = with_retry(&self.retry, SourceFailure::is_transient, || async {
            let response = self
                .client
                .get(&url)
                .header("Accept", "text/html")
                .send()
                .await
                .map_err(|e| SourceFailure::network(SOURCE, e))?;

            if !response.status().is_success() {
                return Err(SourceFailure::network(
                    SOURCE,
                    format!("status {}", response.status()),
                ));
            }

            response
                .text()
                .await
                .map_err(|e| SourceFailure::network(SOURCE, e))
        })
        .await?;

        Ok(Self::parse_trip_cards(&html, &query.from, &query.to))
    }
}

#[async_trait]
impl SourceAdapter for BusSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn category(&self) -> Category {
        Category::Transportation
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        if !Self::is_domestic(&query.from, &query.to) {
            info!(from = %query.from, to = %query.to, "international pair, no bus routes");
            return Ok(Vec::new());
        }

        match self.scrape_shohoz(query).await {
            Ok(buses) if !buses.is_empty() => {
                info!(count = buses.len(), "scraped bus options");
                Ok(buses)
            }
            Ok(_) => {
                info!("scrape found no trips, using operator table");
                Ok(Self::fallback_options(&query.from, &query.to))
            }
            Err(err) => {
                warn!(error = %err, "scrape failed, using operator table");
                Ok(Self::fallback_options(&query.from, &query.to))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use std::time::Duration;

    fn source() -> BusSource {
        BusSource::new(&AppConfig {
            http_timeout: Duration::from_millis(10),
            retry: RetryConfig {
                max_attempts: 1,
                backoff: Duration::from_millis(1),
            },
            ..AppConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn international_pairs_have_no_bus_routes() {
        let offers = source()
            .fetch(&SearchQuery::new("Dhaka", "London", "2025-06-01", None).unwrap())
            .await
            .unwrap();
        assert!(offers.is_empty());
    }

    #[test]
    fn parses_scraped_trip_cards() {
        let html = r#"
        <div class="trip-item">
          <div class="operator-name">Green Line Paribahan</div>
          <div class="fare">BDT 1,250</div>
          <div class="departure">10:30 PM</div>
        </div>
        <div class="bus-list-item">
          <h3>Hanif Enterprise</h3>
          <span class="price">900</span>
        </div>
        <div class="trip-item"><div class="something-else">ad banner</div></div>"#;

        let buses = BusSource::parse_trip_cards(html, "Dhaka", "Sylhet");
        assert_eq!(buses.len(), 2);
        assert_eq!(buses[0].name, "Green Line Paribahan");
        assert_eq!(buses[0].price, Some(1250.0));
        assert_eq!(buses[0].departure_time.as_deref(), Some("10:30 PM"));
        assert_eq!(buses[0].arrival_time.as_deref(), Some("See website"));
        assert_eq!(buses[1].name, "Hanif Enterprise");
        assert_eq!(buses[1].source, "Shohoz");
    }

    #[test]
    fn fallback_uses_route_fares_and_operator_multipliers() {
        let buses = BusSource::fallback_options("Dhaka", "Sylhet");
        assert_eq!(buses.len(), 5);

        // Base fare 700, Green Line multiplier 1.5.
        assert_eq!(buses[0].name, "Green Line Paribahan");
        assert_eq!(buses[0].price, Some(1050.0));
        assert_eq!(buses[0].duration.as_deref(), Some("~9h"));
        assert_eq!(buses[0].source, "TravelScout");
        assert_eq!(buses[0].kind, OfferKind::Bus);

        // BRTC is sixth in the table and therefore not included.
        assert!(buses.iter().all(|b| b.name != "BRTC"));
    }

    #[test]
    fn fallback_fare_is_symmetric_and_defaults_for_unknown_pairs() {
        let forward = BusSource::fallback_options("Dhaka", "Khulna");
        let reverse = BusSource::fallback_options("Khulna", "Dhaka");
        assert_eq!(forward[0].price, reverse[0].price);

        let unknown = BusSource::fallback_options("Gazipur", "Narayanganj");
        // Default base fare 500 with the 1.5 multiplier.
        assert_eq!(unknown[0].price, Some(750.0));
    }

    #[tokio::test]
    async fn domestic_pair_with_unreachable_site_falls_back_to_table() {
        // The client timeout is 10ms, so the scrape fails fast and the
        // operator table takes over.
        let offers = source()
            .fetch(&SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", None).unwrap())
            .await
            .unwrap();
        assert_eq!(offers.len(), 5);
        assert!(offers.iter().all(|o| o.kind == OfferKind::Bus));
    }
}
