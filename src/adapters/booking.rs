//! Booking.com hotel adapter.
//!
//! Search results only render client-side, so this adapter drives a headless
//! Chrome instance instead of fetching raw HTML. The browser handle lives
//! inside one blocking call and drops on every exit path, including when the
//! aggregator stops waiting for us.

use crate::adapters::{selector, Category, SourceAdapter, USER_AGENT};
use crate::error::SourceFailure;
use crate::offer::{Offer, OfferKind, Rating};
use crate::query::SearchQuery;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

const SOURCE: &str = "Booking.com";
const CARD_SELECTOR: &str = "[data-testid=\"property-card\"]";

static CARD: Lazy<Selector> = Lazy::new(|| selector!("[data-testid=\"property-card\"]"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector!("[data-testid=\"title\"]"));
static PRICE: Lazy<Selector> =
    Lazy::new(|| selector!("[data-testid=\"price-and-discounted-price\"]"));
static ADDRESS: Lazy<Selector> = Lazy::new(|| selector!("[data-testid=\"address\"]"));
static AMENITIES: Lazy<Selector> = Lazy::new(|| selector!("[data-testid=\"facility-icons\"] span"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector!("[data-testid=\"description\"]"));
static LINK: Lazy<Selector> = Lazy::new(|| selector!("a[href]"));
// The obfuscated review-score class changes without notice; candidates are
// tried in priority order, first match wins.
static RATING: Lazy<Vec<Selector>> = Lazy::new(|| {
    vec![
        selector!(".b5cd09854e"),
        selector!("[data-testid=\"review-score\"] div"),
    ]
});
static IMAGE: Lazy<Vec<Selector>> = Lazy::new(|| {
    vec![
        selector!("[data-testid=\"property-card-desktop-single-image\"] img"),
        selector!("img"),
    ]
});

pub struct BookingComAdapter {
    /// How long to wait for property cards before concluding the page has
    /// nothing for us.
    selector_wait: Duration,
}

impl BookingComAdapter {
    pub fn new(selector_wait: Duration) -> Self {
        Self { selector_wait }
    }

    fn search_url(query: &SearchQuery) -> String {
        format!(
            "https://www.booking.com/searchresults.html?ss={}&checkin={}&checkout={}&group_adults=2&no_rooms=1&group_children=0",
            urlencoding::encode(&query.to),
            query.check_in,
            query.check_out
        )
    }

    /// Extract hotel offers from a rendered search-results page.
    /// Records without a display title are invalid and dropped.
    fn parse_property_cards(html: &str) -> Vec<Offer> {
        let document = Html::parse_document(html);
        let mut offers = Vec::new();

        for card in document.select(&CARD) {
            let Some(name) = text_of(&card, &TITLE) else {
                continue;
            };

            offers.push(Offer {
                price: card
                    .select(&PRICE)
                    .next()
                    .and_then(|el| crate::adapters::parse_price(&collect_text(&el))),
                rating: first_text(&card, &RATING)
                    .map(|raw| Rating::from_scraped(&raw))
                    .unwrap_or_else(Rating::unrated),
                location: text_of(&card, &ADDRESS),
                booking_link: card
                    .select(&LINK)
                    .next()
                    .and_then(|el| el.value().attr("href"))
                    .map(str::to_string),
                amenities: card
                    .select(&AMENITIES)
                    .map(|el| collect_text(&el))
                    .filter(|s| !s.is_empty())
                    .collect(),
                image_url: first_attr(&card, &IMAGE, "src"),
                description: text_of(&card, &DESCRIPTION),
                ..Offer::new(OfferKind::Hotel, name, SOURCE)
            });
        }

        offers
    }
}

/// Navigate to the search page and return its rendered HTML, or `None` when
/// no property card ever appeared (empty results or changed markup, both
/// survivable).
fn fetch_results_html(url: &str, selector_wait: Duration) -> Result<Option<String>, SourceFailure> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((1920, 1080)))
        .build()
        .map_err(|e| SourceFailure::browser(SOURCE, e))?;

    let browser = Browser::new(options).map_err(|e| SourceFailure::browser(SOURCE, e))?;
    let tab = browser.new_tab().map_err(|e| SourceFailure::browser(SOURCE, e))?;
    tab.set_user_agent(USER_AGENT, None, None)
        .map_err(|e| SourceFailure::browser(SOURCE, e))?;

    debug!(url, "navigating");
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| SourceFailure::browser(SOURCE, e))?;

    if let Err(err) = tab.wait_for_element_with_custom_timeout(CARD_SELECTOR, selector_wait) {
        warn!(error = %err, "no property cards found, treating as empty result");
        return Ok(None);
    }

    let html = tab
        .get_content()
        .map_err(|e| SourceFailure::browser(SOURCE, e))?;
    Ok(Some(html))
}

#[async_trait]
impl SourceAdapter for BookingComAdapter {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn category(&self) -> Category {
        Category::Hotels
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        let url = Self::search_url(query);
        let wait = self.selector_wait;

        // The browser API is blocking; if this future is dropped at the
        // aggregation timeout the blocking thread still runs to completion
        // and releases the browser with it.
        let html = tokio::task::spawn_blocking(move || fetch_results_html(&url, wait))
            .await
            .map_err(|e| SourceFailure::browser(SOURCE, e))??;

        let offers = match html {
            Some(html) => Self::parse_property_cards(&html),
            None => Vec::new(),
        };
        info!(count = offers.len(), "parsed property cards");
        Ok(offers)
    }
}

fn collect_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn text_of(card: &ElementRef, sel: &Selector) -> Option<String> {
    card.select(sel)
        .next()
        .map(|el| collect_text(&el))
        .filter(|s| !s.is_empty())
}

fn first_text(card: &ElementRef, candidates: &[Selector]) -> Option<String> {
    candidates
        .iter()
        .find_map(|sel| card.select(sel).next().map(|el| collect_text(&el)))
        .filter(|s| !s.is_empty())
}

fn first_attr(card: &ElementRef, candidates: &[Selector], attr: &str) -> Option<String> {
    candidates
        .iter()
        .find_map(|sel| card.select(sel).next().and_then(|el| el.value().attr(attr)))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
    <html><body>
      <div data-testid="property-card">
        <a href="https://www.booking.com/hotel/bd/grand.html">
          <img src="https://cf.bstatic.com/grand.jpg" data-testid="x"/>
        </a>
        <div data-testid="property-card-desktop-single-image">
          <img src="https://cf.bstatic.com/grand-main.jpg"/>
        </div>
        <div data-testid="title">Grand Sylhet Hotel</div>
        <div data-testid="address">Airport Road, Sylhet</div>
        <span data-testid="price-and-discounted-price">BDT 9,800</span>
        <div class="b5cd09854e">8.7</div>
        <div data-testid="facility-icons"><span>Wifi</span><span>Pool</span><span> </span></div>
        <div data-testid="description">Riverside hotel with airport shuttle.</div>
      </div>
      <div data-testid="property-card">
        <div data-testid="title">Hotel Metro</div>
        <span data-testid="price-and-discounted-price">Sold out</span>
      </div>
      <div data-testid="property-card">
        <span data-testid="price-and-discounted-price">BDT 3,000</span>
      </div>
    </body></html>"#;

    #[test]
    fn parses_complete_and_partial_cards_and_drops_nameless_ones() {
        let offers = BookingComAdapter::parse_property_cards(FIXTURE);
        assert_eq!(offers.len(), 2);

        let grand = &offers[0];
        assert_eq!(grand.name, "Grand Sylhet Hotel");
        assert_eq!(grand.price, Some(9800.0));
        assert_eq!(grand.rating, Rating::Score(8.7));
        assert_eq!(grand.location.as_deref(), Some("Airport Road, Sylhet"));
        assert_eq!(grand.amenities, vec!["Wifi", "Pool"]);
        assert_eq!(
            grand.image_url.as_deref(),
            Some("https://cf.bstatic.com/grand-main.jpg")
        );
        assert_eq!(grand.source, "Booking.com");
        assert_eq!(grand.kind, OfferKind::Hotel);

        let metro = &offers[1];
        assert_eq!(metro.name, "Hotel Metro");
        assert_eq!(metro.price, None, "unparsable price stays unknown");
        assert_eq!(metro.rating, Rating::unrated());
    }

    #[test]
    fn rating_falls_back_to_the_next_candidate_selector() {
        // No .b5cd09854e anywhere; the review-score candidate must match.
        let html = r#"
        <div data-testid="property-card">
          <div data-testid="title">Hotel Fallback</div>
          <div data-testid="review-score"><div>7.9</div></div>
        </div>"#;
        let offers = BookingComAdapter::parse_property_cards(html);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].rating, Rating::Score(7.9));
    }

    #[test]
    fn empty_page_parses_to_no_offers() {
        assert!(BookingComAdapter::parse_property_cards("<html><body></body></html>").is_empty());
    }

    #[test]
    fn search_url_encodes_location_and_dates() {
        let query =
            SearchQuery::new("Dhaka", "Cox's Bazar", "2025-06-01", Some("2025-06-03")).unwrap();
        let url = BookingComAdapter::search_url(&query);
        assert!(url.contains("ss=Cox%27s%20Bazar"));
        assert!(url.contains("checkin=2025-06-01"));
        assert!(url.contains("checkout=2025-06-03"));
        assert!(url.contains("group_adults=2"));
    }
}
