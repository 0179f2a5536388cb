use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// `POST /search` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveRequest<'a> {
    pub name: &'a str,
    pub location: &'a str,
}

/// `POST /search` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub not_found: bool,
    #[serde(default)]
    pub dineout_only: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /extract` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest<'a> {
    pub url: &'a str,
}

/// `POST /extract` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub total_ratings: Option<u32>,
    #[serde(default)]
    pub promo_codes: Vec<String>,
    #[serde(default)]
    pub items_99: Vec<String>,
    #[serde(default)]
    pub offer_items: BTreeMap<String, Vec<String>>,
}

impl ExtractResponse {
    /// The emptiness condition behind the one-shot retry: no rating, no
    /// promo codes, no flat items. Structured offers alone do not count.
    pub fn is_empty(&self) -> bool {
        self.rating.as_deref().is_none_or(str::is_empty)
            && self.promo_codes.is_empty()
            && self.items_99.is_empty()
    }
}

/// `POST /bulk/upload` success response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub items: Vec<RosterRow>,
}

/// One initial roster row as returned by the submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RosterRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body the gateway sends on non-success (`{"detail": "..."}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// One inbound frame on the live status channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelFrame {
    Update { data: StatusUpdate },
    Complete,
}

/// Partial per-item fields carried by an `update` frame. `id` is the merge
/// key; every other field is optional and overlays the roster item when
/// present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub total_ratings: Option<u32>,
    #[serde(default)]
    pub promo_codes: Option<Vec<String>>,
    #[serde(default)]
    pub offer_items: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub dineout_only: Option<bool>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend emits counts both as numbers and as strings ("1240", "").
fn de_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_ignores_structured_offers() {
        let mut response = ExtractResponse::default();
        response
            .offer_items
            .insert("Items at 129".to_string(), vec!["Thali".to_string()]);
        assert!(response.is_empty());

        response.promo_codes.push("WELCOME50".to_string());
        assert!(!response.is_empty());
    }

    #[test]
    fn blank_rating_counts_as_absent() {
        let response = ExtractResponse {
            rating: Some(String::new()),
            ..ExtractResponse::default()
        };
        assert!(response.is_empty());
    }

    #[test]
    fn total_ratings_accepts_number_or_string() {
        let json = r#"{"promo_codes":[],"items_99":[],"total_ratings":1240}"#;
        let parsed: ExtractResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total_ratings, Some(1240));

        let json = r#"{"promo_codes":[],"items_99":[],"total_ratings":"987"}"#;
        let parsed: ExtractResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total_ratings, Some(987));

        let json = r#"{"promo_codes":[],"items_99":[],"total_ratings":""}"#;
        let parsed: ExtractResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.total_ratings, None);
    }
}
