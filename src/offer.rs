//! The unified offer record every source adapter must produce.
//!
//! Adapters own construction; downstream stages only filter and reorder.
//! Field names serialize in camelCase, which is the external JSON contract.

use serde::{Deserialize, Serialize};

/// Discriminates which category-specific fields are meaningful.
///
/// `Place` exists so the response envelope can carry tourist-places entries
/// in the same record shape as everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Hotel,
    Flight,
    Bus,
    Train,
    Multimodal,
    Place,
}

impl OfferKind {
    /// Primary sort rank inside the transportation category: flights first,
    /// then buses, trains, and multimodal search links.
    pub fn transport_rank(self) -> u8 {
        match self {
            Self::Flight => 0,
            Self::Bus => 1,
            Self::Train => 2,
            Self::Multimodal => 3,
            Self::Hotel | Self::Place => 4,
        }
    }
}

/// A score when the source exposes one, otherwise the source's own label.
///
/// "N/A" is an explicit unknown-value sentinel and is never coerced to a
/// numeric zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Text(String),
}

impl Rating {
    pub fn unrated() -> Self {
        Self::Text("N/A".to_string())
    }

    /// Parse scraped rating text: a clean number becomes a score, anything
    /// else (including empty) stays text or the unrated sentinel.
    pub fn from_scraped(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::unrated();
        }
        match trimmed.parse::<f64>() {
            Ok(score) => Self::Score(score),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_known(&self) -> bool {
        match self {
            Self::Score(_) => true,
            Self::Text(text) => !matches!(text.as_str(), "N/A" | "Not rated"),
        }
    }
}

/// One hotel or transportation option, normalized from whichever source
/// produced it. Immutable once an adapter returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub kind: OfferKind,
    pub name: String,
    /// `None` or zero means the price is unknown. Unknown never sorts as
    /// free; it sorts after every priced offer.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub rating: Rating,
    /// Which adapter produced this record.
    pub source: String,
    pub booking_link: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    /// `-1` tags an informational entry (a search link rather than a real
    /// option) that sorts last within its rank regardless of price.
    pub stops: Option<i32>,
    pub provider: Option<String>,
}

impl Offer {
    /// A minimal offer; adapters fill in the rest with struct update syntax.
    pub fn new(kind: OfferKind, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            price: None,
            currency: None,
            rating: Rating::unrated(),
            source: source.into(),
            booking_link: None,
            location: None,
            amenities: Vec::new(),
            image_url: None,
            description: None,
            duration: None,
            departure_time: None,
            arrival_time: None,
            stops: None,
            provider: None,
        }
    }

    /// Whether this offer carries a usable, positive price.
    pub fn has_known_price(&self) -> bool {
        matches!(self.price, Some(p) if p > 0.0)
    }

    /// Informational entries are outbound search links, not bookable options.
    pub fn is_informational(&self) -> bool {
        self.stops == Some(-1)
    }

    /// Price key for ascending sorts; unknown prices land at the end.
    pub fn price_sort_key(&self) -> f64 {
        match self.price {
            Some(p) if p > 0.0 => p,
            _ => f64::INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_price_sorts_after_any_priced_offer() {
        let priced = Offer {
            price: Some(999_999.0),
            ..Offer::new(OfferKind::Hotel, "A", "test")
        };
        let free = Offer {
            price: Some(0.0),
            ..Offer::new(OfferKind::Hotel, "B", "test")
        };
        let absent = Offer::new(OfferKind::Hotel, "C", "test");

        assert!(priced.price_sort_key() < free.price_sort_key());
        assert!(priced.price_sort_key() < absent.price_sort_key());
        assert!(!free.has_known_price());
        assert!(!absent.has_known_price());
    }

    #[test]
    fn rating_sentinel_is_never_a_score() {
        assert_eq!(Rating::from_scraped(""), Rating::unrated());
        assert_eq!(Rating::from_scraped("8.4"), Rating::Score(8.4));
        assert_eq!(
            Rating::from_scraped("Scored 8.4"),
            Rating::Text("Scored 8.4".to_string())
        );
        assert!(!Rating::unrated().is_known());
        assert!(!Rating::Text("Not rated".to_string()).is_known());
        assert!(Rating::Score(0.0).is_known());
    }

    #[test]
    fn transport_rank_orders_flight_bus_train_multimodal() {
        assert!(OfferKind::Flight.transport_rank() < OfferKind::Bus.transport_rank());
        assert!(OfferKind::Bus.transport_rank() < OfferKind::Train.transport_rank());
        assert!(OfferKind::Train.transport_rank() < OfferKind::Multimodal.transport_rank());
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let offer = Offer {
            price: Some(120.0),
            booking_link: Some("https://example.com/book".to_string()),
            image_url: Some("https://example.com/img.jpg".to_string()),
            ..Offer::new(OfferKind::Hotel, "Grand Hotel", "Booking.com")
        };
        let json = serde_json::to_value(&offer).unwrap();
        assert_eq!(json["kind"], "hotel");
        assert_eq!(json["bookingLink"], "https://example.com/book");
        assert_eq!(json["imageUrl"], "https://example.com/img.jpg");
        assert_eq!(json["rating"], "N/A");
    }

    #[test]
    fn informational_entries_are_tagged_by_stop_sentinel() {
        let link = Offer {
            stops: Some(-1),
            price: Some(0.0),
            ..Offer::new(OfferKind::Multimodal, "All routes", "Rome2Rio")
        };
        assert!(link.is_informational());
        let real = Offer {
            stops: Some(1),
            ..Offer::new(OfferKind::Flight, "BG147", "TravelScout Flights")
        };
        assert!(!real.is_informational());
    }
}
