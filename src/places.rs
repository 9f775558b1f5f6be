//! Tourist-places lookup against the Wikipedia and Wikivoyage APIs.
//!
//! A single-source JSON lookup rather than a scraped site: search for
//! articles about the destination, pull page extracts and thumbnails, and
//! normalize them into place offers. Degrades to an empty list on any
//! failure, mirroring how a category behaves.

use crate::error::{SetupError, SourceFailure};
use crate::offer::{Offer, OfferKind};
use crate::query::SearchQuery;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const WIKIPEDIA_API: &str = "https://en.wikipedia.org/w/api.php";
const WIKIVOYAGE_API: &str = "https://en.wikivoyage.org/w/api.php";
const USER_AGENT: &str = "TravelScout/0.1 (travel comparison; educational project)";
const EXTRACT_LIMIT: usize = 300;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    query: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub pageid: u64,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct PagesEnvelope {
    #[serde(default)]
    query: Option<PagesBody>,
}

#[derive(Debug, Deserialize)]
struct PagesBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub pageid: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub fullurl: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

/// Seam between the orchestrator and the places source, so tests can inject
/// a stub instead of talking to the wiki APIs.
#[async_trait::async_trait]
pub trait PlacesLookup: Send + Sync {
    async fn lookup(&self, query: &SearchQuery) -> Vec<Offer>;
}

pub struct PlacesClient {
    client: reqwest::Client,
}

impl PlacesClient {
    pub fn new(timeout: Duration) -> Result<Self, SetupError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
        })
    }

    async fn search(
        &self,
        endpoint: &str,
        term: &str,
        limit: u32,
    ) -> Result<Vec<SearchHit>, SourceFailure> {
        let envelope: SearchEnvelope = self
            .client
            .get(endpoint)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("format", "json"),
                ("srlimit", limit.to_string().as_str()),
                ("origin", "*"),
            ])
            .send()
            .await
            .map_err(|e| SourceFailure::network("Wikipedia", e))?
            .json()
            .await
            .map_err(|e| SourceFailure::parse("Wikipedia", e))?;

        Ok(envelope.query.map(|q| q.search).unwrap_or_default())
    }

    async fn page_details(
        &self,
        endpoint: &str,
        titles: &[String],
    ) -> Result<Vec<Page>, SourceFailure> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let envelope: PagesEnvelope = self
            .client
            .get(endpoint)
            .query(&[
                ("action", "query"),
                ("titles", titles.join("|").as_str()),
                ("prop", "extracts|pageimages|info"),
                ("exintro", "true"),
                ("explaintext", "true"),
                ("pithumbsize", "500"),
                ("inprop", "url"),
                ("format", "json"),
                ("origin", "*"),
            ])
            .send()
            .await
            .map_err(|e| SourceFailure::network("Wikipedia", e))?
            .json()
            .await
            .map_err(|e| SourceFailure::parse("Wikipedia", e))?;

        Ok(envelope
            .query
            .map(|q| q.pages.into_values().collect())
            .unwrap_or_default())
    }

    async fn wikipedia_places(&self, location: &str) -> Result<Vec<Offer>, SourceFailure> {
        let queries = [
            format!("{location} tourist attractions Bangladesh"),
            format!("{location} landmarks places to visit"),
            format!("things to do in {location}"),
        ];

        let batches = join_all(
            queries
                .iter()
                .map(|term| self.search(WIKIPEDIA_API, term, 5)),
        )
        .await;

        let mut hits = Vec::new();
        for batch in batches {
            hits.extend(batch?);
        }
        let unique = dedupe_by_pageid(hits);
        let titles: Vec<String> = unique.into_iter().map(|hit| hit.title).collect();

        let pages = self.page_details(WIKIPEDIA_API, &titles).await?;
        Ok(map_pages(pages, "Wikipedia", "No description available"))
    }

    async fn wikivoyage_places(&self, location: &str) -> Vec<Offer> {
        let result: Result<Vec<Offer>, SourceFailure> = async {
            let hits = self.search(WIKIVOYAGE_API, location, 5).await?;
            let titles: Vec<String> = hits.into_iter().map(|hit| hit.title).collect();
            let pages = self.page_details(WIKIVOYAGE_API, &titles).await?;
            Ok(map_pages(
                pages,
                "Wikivoyage",
                "Travel guide available on Wikivoyage",
            ))
        }
        .await;

        match result {
            Ok(offers) => offers,
            Err(err) => {
                warn!(error = %err, "Wikivoyage lookup failed");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl PlacesLookup for PlacesClient {
    /// Find tourist places for a destination. Never fails: any error is
    /// logged and surfaces as an empty list.
    async fn lookup(&self, query: &SearchQuery) -> Vec<Offer> {
        let location = query.to.as_str();

        let wiki = match self.wikipedia_places(location).await {
            Ok(offers) => offers,
            Err(err) => {
                warn!(error = %err, "Wikipedia lookup failed");
                Vec::new()
            }
        };
        let voyage = self.wikivoyage_places(location).await;

        let wiki_count = wiki.len();
        let voyage_count = voyage.len();

        let mut merged = wiki;
        merged.extend(voyage);
        let unique = dedupe_by_name(merged);

        info!(
            total = unique.len(),
            wikipedia = wiki_count,
            wikivoyage = voyage_count,
            "found tourist places"
        );
        unique
    }
}

fn dedupe_by_pageid(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = std::collections::HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.pageid))
        .collect()
}

fn dedupe_by_name(offers: Vec<Offer>) -> Vec<Offer> {
    let mut seen = std::collections::HashSet::new();
    offers
        .into_iter()
        .filter(|offer| seen.insert(offer.name.clone()))
        .collect()
}

fn map_pages(pages: Vec<Page>, source: &str, default_desc: &str) -> Vec<Offer> {
    pages
        .into_iter()
        .filter(|page| page.pageid.is_some_and(|id| id > 0))
        .map(|page| {
            let link = page.fullurl.clone().unwrap_or_else(|| {
                format!(
                    "https://en.{}.org/wiki/{}",
                    source.to_lowercase(),
                    urlencoding::encode(&page.title)
                )
            });
            Offer {
                description: Some(
                    page.extract
                        .as_deref()
                        .filter(|e| !e.is_empty())
                        .map(summarize)
                        .unwrap_or_else(|| default_desc.to_string()),
                ),
                image_url: page.thumbnail.map(|t| t.source),
                booking_link: Some(link),
                ..Offer::new(OfferKind::Place, page.title, source)
            }
        })
        .collect()
}

/// First 300 characters of an extract, with an ellipsis when trimmed.
/// Operates on characters, not bytes, so multibyte text stays intact.
fn summarize(extract: &str) -> String {
    let mut summary: String = extract.chars().take(EXTRACT_LIMIT).collect();
    if extract.chars().count() > EXTRACT_LIMIT {
        summary.push_str("...");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::Rating;

    #[test]
    fn deserializes_search_results() {
        let json = r#"{"query":{"search":[
            {"pageid": 101, "title": "Lalbagh Fort", "snippet": "x"},
            {"pageid": 102, "title": "Ahsan Manzil"}
        ]}}"#;
        let envelope: SearchEnvelope = serde_json::from_str(json).unwrap();
        let hits = envelope.query.unwrap().search;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Lalbagh Fort");
    }

    #[test]
    fn missing_query_body_means_no_hits() {
        let envelope: SearchEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.query.is_none());
    }

    #[test]
    fn dedupes_search_hits_by_pageid_keeping_first() {
        let hits = vec![
            SearchHit { pageid: 1, title: "A".into() },
            SearchHit { pageid: 2, title: "B".into() },
            SearchHit { pageid: 1, title: "A again".into() },
        ];
        let unique = dedupe_by_pageid(hits);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "A");
    }

    #[test]
    fn maps_pages_to_place_offers() {
        let json = r#"{"query":{"pages":{
            "101": {
                "pageid": 101,
                "title": "Lalbagh Fort",
                "extract": "An incomplete 17th century Mughal fort complex.",
                "thumbnail": {"source": "https://upload.wikimedia.org/fort.jpg", "width": 500, "height": 300},
                "fullurl": "https://en.wikipedia.org/wiki/Lalbagh_Fort"
            },
            "-1": {"title": "Missing page"}
        }}}"#;
        let envelope: PagesEnvelope = serde_json::from_str(json).unwrap();
        let pages: Vec<Page> = envelope.query.unwrap().pages.into_values().collect();
        let offers = map_pages(pages, "Wikipedia", "No description available");

        assert_eq!(offers.len(), 1, "pages without a positive pageid are dropped");
        let offer = &offers[0];
        assert_eq!(offer.kind, OfferKind::Place);
        assert_eq!(offer.name, "Lalbagh Fort");
        assert_eq!(offer.rating, Rating::unrated());
        assert_eq!(
            offer.description.as_deref(),
            Some("An incomplete 17th century Mughal fort complex.")
        );
        assert_eq!(
            offer.booking_link.as_deref(),
            Some("https://en.wikipedia.org/wiki/Lalbagh_Fort")
        );
        assert_eq!(offer.image_url.as_deref(), Some("https://upload.wikimedia.org/fort.jpg"));
    }

    #[test]
    fn pages_without_extract_get_the_default_description() {
        let pages = vec![Page {
            pageid: Some(5),
            title: "Ratargul".into(),
            extract: None,
            thumbnail: None,
            fullurl: None,
        }];
        let offers = map_pages(pages, "Wikivoyage", "Travel guide available on Wikivoyage");
        assert_eq!(
            offers[0].description.as_deref(),
            Some("Travel guide available on Wikivoyage")
        );
        assert_eq!(
            offers[0].booking_link.as_deref(),
            Some("https://en.wikivoyage.org/wiki/Ratargul")
        );
    }

    #[test]
    fn long_extracts_are_truncated_on_character_boundaries() {
        let long = "শ".repeat(400);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), EXTRACT_LIMIT + 3);
        assert!(summary.ends_with("..."));

        let short = "Short description.";
        assert_eq!(summarize(short), short);
    }

    #[test]
    fn merged_places_dedupe_by_name_first_wins() {
        let a = Offer {
            description: Some("from wikipedia".into()),
            ..Offer::new(OfferKind::Place, "Lalbagh Fort", "Wikipedia")
        };
        let b = Offer {
            description: Some("from wikivoyage".into()),
            ..Offer::new(OfferKind::Place, "Lalbagh Fort", "Wikivoyage")
        };
        let unique = dedupe_by_name(vec![a, b]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].source, "Wikipedia");
    }
}
