// Rome2Rio catch-all: one informational entry pointing at a multi-modal
// route search. Tagged with the stops sentinel so it sorts last.

use crate::adapters::{Category, SourceAdapter};
use crate::error::SourceFailure;
use crate::offer::{Offer, OfferKind};
use crate::query::SearchQuery;
use async_trait::async_trait;

const SOURCE: &str = "Rome2Rio";

pub struct MultimodalLinkSource;

impl MultimodalLinkSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MultimodalLinkSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for MultimodalLinkSource {
    fn name(&self) -> &'static str {
        SOURCE
    }

    fn category(&self) -> Category {
        Category::Transportation
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<Offer>, SourceFailure> {
        Ok(vec![Offer {
            price: Some(0.0),
            currency: Some("BDT".to_string()),
            provider: Some(SOURCE.to_string()),
            duration: Some("Various".to_string()),
            departure_time: Some("Various".to_string()),
            arrival_time: Some("Various".to_string()),
            stops: Some(-1),
            description: Some(format!(
                "Explore all transport options — flights, trains, buses, ferries — from {} to {}",
                query.from, query.to
            )),
            booking_link: Some(format!(
                "https://www.rome2rio.com/s/{}/{}",
                urlencoding::encode(&query.from),
                urlencoding::encode(&query.to)
            )),
            ..Offer::new(
                OfferKind::Multimodal,
                format!("All routes: {} → {}", query.from, query.to),
                SOURCE,
            )
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_emits_one_informational_link() {
        let query = SearchQuery::new("Dhaka", "Sylhet", "2025-06-01", None).unwrap();
        let offers = MultimodalLinkSource::new().fetch(&query).await.unwrap();

        assert_eq!(offers.len(), 1);
        let link = &offers[0];
        assert_eq!(link.kind, OfferKind::Multimodal);
        assert_eq!(link.name, "All routes: Dhaka → Sylhet");
        assert!(link.is_informational());
        assert_eq!(
            link.booking_link.as_deref(),
            Some("https://www.rome2rio.com/s/Dhaka/Sylhet")
        );
    }
}
