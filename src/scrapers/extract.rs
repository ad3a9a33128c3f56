use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::models::ListingSummary;
use crate::scrapers::types::{Markers, TOP_LISTINGS_LIMIT};

/// Pulls listing facts out of a search results page.
///
/// Selectors are compiled once from [`Markers`]; extraction itself never
/// panics when the markup drifts, it reports a typed error or skips cards.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    count_marker: String,
    count: Selector,
    card: Selector,
    title: Selector,
    description: Selector,
    price: Selector,
    place: Selector,
    posted_at: Selector,
}

fn class_selector(class: &str) -> Result<Selector, ExtractError> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(ExtractError::InvalidMarker {
            marker: class.to_string(),
            reason: "expected a single class name".to_string(),
        });
    }
    Selector::parse(&format!(".{}", class)).map_err(|e| ExtractError::InvalidMarker {
        marker: class.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Trimmed text of the first descendant matching `selector`
fn field_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

impl ListingExtractor {
    pub fn new(markers: &Markers) -> Result<Self, ExtractError> {
        Ok(Self {
            count_marker: markers.count.clone(),
            count: class_selector(&markers.count)?,
            card: class_selector(&markers.card)?,
            title: class_selector(&markers.title)?,
            description: class_selector(&markers.description)?,
            price: class_selector(&markers.price)?,
            place: class_selector(&markers.place)?,
            posted_at: class_selector(&markers.posted_at)?,
        })
    }

    /// Total number of listings shown in the page header.
    ///
    /// Digit groups are separated by (possibly non-breaking) spaces on the
    /// site, so all whitespace is stripped before parsing.
    pub fn extract_count(&self, body: &str) -> Result<u64, ExtractError> {
        let document = Html::parse_document(body);

        let element = document
            .select(&self.count)
            .next()
            .ok_or_else(|| ExtractError::MarkerNotFound {
                marker: self.count_marker.clone(),
            })?;

        let text = element.text().collect::<String>();
        let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        debug!("Count marker text: {:?}", text);

        digits
            .parse::<u64>()
            .map_err(|_| ExtractError::MalformedNumber {
                text: text.trim().to_string(),
            })
    }

    /// Summaries of the first listing cards, in document order.
    ///
    /// A card missing any of its fields is skipped; the rest still count.
    pub fn extract_top_listings(&self, body: &str) -> Vec<ListingSummary> {
        let document = Html::parse_document(body);

        let cards: Vec<_> = document
            .select(&self.card)
            .take(TOP_LISTINGS_LIMIT)
            .collect();
        info!("Found {} listing cards in HTML", cards.len());

        let mut listings = Vec::with_capacity(cards.len());
        for (idx, card) in cards.into_iter().enumerate() {
            match self.summarize(card) {
                Ok(summary) => listings.push(summary),
                Err(field) => warn!(card = idx, field, "Skipped listing card with missing field"),
            }
        }

        listings
    }

    /// Err carries the name of the first missing field
    fn summarize(&self, card: ElementRef<'_>) -> Result<ListingSummary, &'static str> {
        Ok(ListingSummary {
            title: field_text(card, &self.title).ok_or("title")?,
            description: field_text(card, &self.description).ok_or("description")?,
            price: field_text(card, &self.price).ok_or("price")?,
            place: field_text(card, &self.place).ok_or("place")?,
            posted_at: field_text(card, &self.posted_at).ok_or("posted_at")?,
        })
    }
}
