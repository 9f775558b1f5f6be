//! Agoda hotel adapter: plain HTTP fetch plus CSS-selector extraction.

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

const SOURCE: &str = "Agoda";

static BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.agoda.com").expect("valid base URL"));

static CARD: Lazy<Selector> = Lazy::new(|| selector!(".hotel-card"));
static NAME: Lazy<Selector> = Lazy::new(|| selector!(".hotel-name"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector!(".price"));
static RATING: Lazy<Selector> = Lazy::new(|| selector!(".rating"));
static LOCATION: Lazy<Selector> = Lazy::new(|| selector!(".location"));
static LINK: Lazy<Selector> = Lazy::new(|| selector!("a"));
static AMENITIES: Lazy<Selector> = Lazy::new(|| selector!(".amenities span"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector!(".hotel-image img"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector!(".description"));

pub struct AgodaAdapter {
    client: reqwest::Client,
    retry: crate::config::RetryConfig,
}

impl AgodaAdapter {
    pub fn new(config: &AppConfig) -> Result<Self, SetupError> {
        Ok(Self {
            client: adapters::http_client(config.http_timeout)?,
            retry: config.retry.clone(),
        })
    }

    fn search_url(query: &SearchQuery) -> String {
        format!(
            "https://www.agoda.com/search?city={}&checkIn={}",
            urlencoding::encode(&query.to),
            query.check_in
        )
    }

    /// Extract hotel cards. Agoda listings without a name and a positive
    /// price are placeholders, not offers, and are skipped.
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
                    .select(&LOCATION)
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
impl SourceAdapter for AgodaAdapter {
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

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
    <div class="hotel-card">
      <a href="/grand-sylhet"></a>
      <div class="hotel-name">Grand Sylhet Hotel</div>
      <div class="price">USD 95</div>
      <div class="rating">8.4</div>
      <div class="location">Sylhet city centre</div>
      <div class="amenities"><span>Wifi</span><span>Parking</span></div>
      <div class="hotel-image"><img src="https://img.agoda.net/grand.jpg"/></div>
      <div class="description">Near the tea gardens.</div>
    </div>
    <div class="hotel-card">
      <div class="hotel-name">Nameless Price</div>
      <div class="price">Call for price</div>
    </div>
    <div class="hotel-card">
      <div class="price">120</div>
    </div>"#;

    #[test]
    fn parses_cards_and_requires_name_and_positive_price() {
        let offers = AgodaAdapter::parse_hotel_cards(FIXTURE);
        assert_eq!(offers.len(), 1, "unpriced and nameless cards are skipped");

        let offer = &offers[0];
        assert_eq!(offer.name, "Grand Sylhet Hotel");
        assert_eq!(offer.price, Some(95.0));
        assert_eq!(offer.rating, Rating::Score(8.4));
        assert_eq!(
            offer.booking_link.as_deref(),
            Some("https://www.agoda.com/grand-sylhet")
        );
        assert_eq!(offer.amenities, vec!["Wifi", "Parking"]);
        assert_eq!(offer.source, "Agoda");
    }

    #[test]
    fn changed_markup_yields_empty_not_error() {
        let offers = AgodaAdapter::parse_hotel_cards("<div class=\"totally-new-layout\"></div>");
        assert!(offers.is_empty());
    }

    #[test]
    fn search_url_targets_the_destination() {
        let query = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", None).unwrap();
        let url = AgodaAdapter::search_url(&query);
        assert_eq!(
            url,
            "https://www.agoda.com/search?city=Sylhet&checkIn=2025-06-01"
        );
    }
}
