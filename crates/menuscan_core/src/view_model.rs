use std::collections::BTreeMap;

use crate::{BulkPhase, JobItem, RestaurantRecord, SearchPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub searching: bool,
    pub search_phase: Option<SearchPhase>,
    pub search_error: Option<String>,
    pub records: Vec<RecordRowView>,
    pub bulk_phase: BulkPhase,
    pub bulk_error: Option<String>,
    pub job: Option<JobView>,
    pub export_path: Option<String>,
    pub export_error: Option<String>,
    pub dirty: bool,
}

/// Display row for one completed single search. Missing extraction fields
/// render as "N/A" here so the data model can stay honest about absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub name: String,
    pub location: String,
    pub source_url: Option<String>,
    pub dineout_only: bool,
    pub rating: String,
    pub total_ratings: String,
    pub promo_codes: Vec<String>,
    pub items_99: Vec<String>,
    pub offer_items: BTreeMap<String, Vec<String>>,
}

impl RecordRowView {
    pub fn from_record(record: &RestaurantRecord) -> Self {
        let extraction = record.extraction.as_ref();
        Self {
            name: record.name.clone(),
            location: record.location.clone(),
            source_url: record.source_url.clone(),
            dineout_only: record.dineout_only,
            rating: extraction
                .and_then(|e| e.rating.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            total_ratings: extraction
                .and_then(|e| e.total_ratings)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            promo_codes: extraction.map(|e| e.promo_codes.clone()).unwrap_or_default(),
            items_99: extraction.map(|e| e.items_99.clone()).unwrap_or_default(),
            offer_items: extraction.map(|e| e.offer_items.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub job_id: String,
    pub progress_percent: u8,
    pub completed: bool,
    pub items: Vec<ItemRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status_label: String,
    pub terminal: bool,
    pub rating: Option<String>,
    pub dineout_only: bool,
    pub source_url: Option<String>,
    pub error_message: Option<String>,
}

impl ItemRowView {
    pub fn from_item(item: &JobItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            location: item.location.clone(),
            status_label: item.status.label().to_string(),
            terminal: item.status.is_terminal(),
            rating: item.rating.clone(),
            dineout_only: item.dineout_only,
            source_url: item.source_url.clone(),
            error_message: item.error_message.clone(),
        }
    }
}
