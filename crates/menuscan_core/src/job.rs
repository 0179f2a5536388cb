use std::collections::BTreeMap;

/// Per-item processing status as reported over the status channel.
///
/// The label set is a server contract, not a closed enum: labels we do not
/// recognize are kept verbatim in `Other` and treated as non-terminal so a
/// new server-side status can never break the progress calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemStatus {
    #[default]
    Queued,
    Searching,
    Extracting,
    Completed,
    Failed,
    Error,
    NotFound,
    Other(String),
}

impl ItemStatus {
    /// Maps a wire label to a status. The server uses "Pending" for items
    /// it has not started and spells not-found with a space.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Queued" | "Pending" => Self::Queued,
            "Searching" => Self::Searching,
            "Extracting" => Self::Extracting,
            "Completed" => Self::Completed,
            "Failed" => Self::Failed,
            "Error" => Self::Error,
            "Not Found" => Self::NotFound,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::Searching => "Searching",
            Self::Extracting => "Extracting",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Error => "Error",
            Self::NotFound => "Not Found",
            Self::Other(label) => label,
        }
    }

    /// Only terminal statuses count toward progress.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Error | Self::NotFound
        )
    }
}

/// One row of a bulk job. `id` is assigned by the submission gateway and
/// is the merge key for all later updates; it is never regenerated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobItem {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: ItemStatus,
    pub rating: Option<String>,
    pub total_ratings: Option<u32>,
    pub promo_codes: Vec<String>,
    pub offer_items: BTreeMap<String, Vec<String>>,
    pub dineout_only: bool,
    pub source_url: Option<String>,
    pub error_message: Option<String>,
}

impl JobItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            status: ItemStatus::Queued,
            rating: None,
            total_ratings: None,
            promo_codes: Vec::new(),
            offer_items: BTreeMap::new(),
            dineout_only: false,
            source_url: None,
            error_message: None,
        }
    }
}

/// Partial field overlay for one roster item, as carried by a channel
/// `update` event. Fields absent from the update leave the item untouched,
/// so enrichment is monotonic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemUpdate {
    pub id: String,
    pub status: Option<ItemStatus>,
    pub rating: Option<String>,
    pub total_ratings: Option<u32>,
    pub promo_codes: Option<Vec<String>>,
    pub offer_items: Option<BTreeMap<String, Vec<String>>>,
    pub dineout_only: Option<bool>,
    pub source_url: Option<String>,
    pub error_message: Option<String>,
}

impl ItemUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// One bulk job: a fixed, ordered roster plus derived progress and the
/// authoritative completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    items: Vec<JobItem>,
    progress_percent: u8,
    completed: bool,
}

impl Job {
    pub fn new(id: impl Into<String>, items: Vec<JobItem>) -> Self {
        let progress_percent = compute_progress(&items);
        Self {
            id: id.into(),
            items,
            progress_percent,
            completed: false,
        }
    }

    pub fn items(&self) -> &[JobItem] {
        &self.items
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// True once the channel's terminal event arrived. Decoupled from
    /// per-item statuses: an item the server never finalizes does not keep
    /// the job open.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Merges `update` into the item with the matching id. Unknown ids are
    /// a silent no-op, so late or duplicate events after a roster reset
    /// cannot touch the new roster.
    pub fn apply_update(&mut self, update: &ItemUpdate) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == update.id) else {
            return;
        };
        if let Some(status) = &update.status {
            item.status = status.clone();
        }
        if let Some(rating) = &update.rating {
            item.rating = Some(rating.clone());
        }
        if let Some(total) = update.total_ratings {
            item.total_ratings = Some(total);
        }
        if let Some(codes) = &update.promo_codes {
            item.promo_codes = codes.clone();
        }
        if let Some(offers) = &update.offer_items {
            item.offer_items = offers.clone();
        }
        if let Some(dineout) = update.dineout_only {
            item.dineout_only = dineout;
        }
        if let Some(url) = &update.source_url {
            item.source_url = Some(url.clone());
        }
        if let Some(message) = &update.error_message {
            item.error_message = Some(message.clone());
        }
        self.progress_percent = compute_progress(&self.items);
    }

    /// Marks the job complete. Unconditional: the `complete` channel event
    /// is authoritative regardless of what the roster says.
    pub fn apply_completion(&mut self) {
        self.completed = true;
    }
}

/// Share of roster items in a terminal status, rounded to whole percent.
/// An empty roster reports 0 rather than dividing by zero.
pub fn compute_progress(items: &[JobItem]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let terminal = items.iter().filter(|item| item.status.is_terminal()).count();
    ((terminal as f64 / items.len() as f64) * 100.0).round() as u8
}
