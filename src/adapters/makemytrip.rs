//! MakeMyTrip hotel adapter. Same HTTP + selector shape as Agoda, with
//! MakeMyTrip's own markup classes.

use crate::adapters::{self, selector, Category, SourceAdapter};
use crate::config::AppConfig;
use crate::error::{SetupError, SourceFailure};
use crate::offer::{Offer, OfferKind, Rating};
use crate::query::SearchQuery;
use crate::retry::with_retry;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::info;
use url::Url;

const SOURCE: &str = "MakeMyTrip";

static BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.makemytrip.com").expect("valid base URL"));

static CARD: Lazy<Selector> = Lazy::new(|| selector!(".hotelCardListing"));
static NAME: Lazy<Selector> = Lazy::new(|| selector!(".hotelName"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector!(".price"));
static RATING: Lazy<Selector> = Lazy::new(|| selector!(".rating"));
static AREA: Lazy<Selector> = Lazy::new(|| selector!(".areaName"));
static LINK: Lazy<Selector> = Lazy::new(|| selector!("a"));
static AMENITIES: Lazy<Selector> = Lazy::new(|| selector!(".amenityList span"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector!(".hotelImage img"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector!(".hotelDesc"));

pub struct MakeMyTripAdapter {
    client: reqwest::Client,
    retry: crate::config::RetryConfig,
}

impl MakeMyTripAdapter {
    pub fn new(config: &AppConfig) -> Result<Self, SetupError> {
        Ok(Self {
            client: adapters::http_client(config.http_timeout)?,
            retry: config.retry.clone(),
        })
    }

    fn search_url(query: &SearchQuery) -> String {
        format!(
            "https://www.makemytrip.com/hotels/hotel-listing/?checkin={}&city={}",
            query.check_in,
            urlencoding::encode(&query.to)
        )
    }

    fn parse_hotel_cards(html: &str) -> Vec<Offer> {
        let document = Html::parse_document(html);
        let mut offers = Vec::new();

        for card in document.select(&CARD) {
            let name = card
                .select(&NAME)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let price = card
                .select(&PRICE)
                .next()
                .and_then(|el| adapters::parse_price(&el.text().collect::<String>()));

            if name.is_empty() || price.is_none() {
                continue;
            }

            offers.push(Offer {
                price,
                rating: card
                    .select(&RATING)
                    .next()
                    .map(|el| Rating::from_scraped(&el.text().collect::<String>()))
                    .unwrap_or_else(Rating::unrated),
                location: card
                    .select(&AREA)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string()),
                booking_link: card
                    .select(&LINK)
                    .next()
                    .and_then(|el| el.value().attr("href"))
                    .and_then(|href| BASE_URL.join(href).ok())
                    .map(|resolved| resolved.to_string()),
                amenities: card
                    .select(&AMENITIES)
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                image_url: card
                    .select(&IMAGE)
                    .next()
                    .and_then(|el| el.value().attr("src"))
                    .map(str::to_string),
                description: card
                    .select(&DESCRIPTION)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().to_string()),
                ..Offer::new(OfferKind::Hotel, name, SOURCE)
            });
        }

        offers
    }
}

#[async_trait]
impl SourceAdapter for MakeMyTripAdapter {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn category(&self) -> Category {
        Category::Hotels
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        let url = Self::search_url(query);

        let html = with_retry(&self.retry, SourceFailure::is_transient, || async {
            let response = self
                .client
                .get(&url)
                .header("Accept", "text/html")
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await
                .map_err(|e| classify(&e))?;

            if !response.status().is_success() {
                return Err(SourceFailure::network(
                    SOURCE,
                    format!("status {}", response.status()),
                ));
            }

            response.text().await.map_err(|e| classify(&e))
        })
        .await?;

        let offers = Self::parse_hotel_cards(&html);
        info!(count = offers.len(), "parsed hotel cards");
        Ok(offers)
    }
}

fn classify(err: &reqwest::Error) -> SourceFailure {
    if adapters::is_transient_http(err) {
        SourceFailure::network(SOURCE, err)
    } else {
        SourceFailure::parse(SOURCE, err)
    }
}
