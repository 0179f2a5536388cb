use std::collections::BTreeMap;

/// Phase of an in-flight single search, surfaced as status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Resolving the name/location pair to a source URL.
    Resolving,
    /// Pulling ratings, promos and offers from the resolved page.
    Extracting,
    /// First extraction came back empty; running the one-shot retry.
    Retrying,
}

/// Scraped payload for one resolved restaurant page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    pub rating: Option<String>,
    pub total_ratings: Option<u32>,
    pub promo_codes: Vec<String>,
    /// Legacy flat offer list (the "₹99 store" items).
    pub items_99: Vec<String>,
    /// Structured offers, category label to item labels. Supersedes
    /// `items_99` when non-empty.
    pub offer_items: BTreeMap<String, Vec<String>>,
}

/// One completed single search: the input pair, where it resolved, and
/// whatever extraction produced. Never mutated after creation; held in
/// memory only, most recently completed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRecord {
    pub name: String,
    pub location: String,
    pub source_url: Option<String>,
    /// Venue exists only behind the dine-in booking channel; extraction
    /// was intentionally skipped.
    pub dineout_only: bool,
    pub extraction: Option<ExtractionResult>,
}
