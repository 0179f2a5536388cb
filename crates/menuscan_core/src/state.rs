use crate::view_model::{AppViewModel, ItemRowView, JobView, RecordRowView};
use crate::{ItemUpdate, Job, JobItem, RestaurantRecord, SearchPhase};

/// Lifecycle of the bulk upload surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkPhase {
    #[default]
    Idle,
    Uploading,
    Processing,
    Completed,
    /// Upload was rejected; no job exists.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    /// Completed single-search records, most recently completed first.
    records: Vec<RestaurantRecord>,
    searches_in_flight: usize,
    search_phase: Option<SearchPhase>,
    search_error: Option<String>,
    bulk_phase: BulkPhase,
    bulk_error: Option<String>,
    job: Option<Job>,
    export_path: Option<String>,
    export_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            searching: self.searches_in_flight > 0,
            search_phase: self.search_phase,
            search_error: self.search_error.clone(),
            records: self.records.iter().map(RecordRowView::from_record).collect(),
            bulk_phase: self.bulk_phase,
            bulk_error: self.bulk_error.clone(),
            job: self.job.as_ref().map(|job| JobView {
                job_id: job.id.clone(),
                progress_percent: job.progress_percent(),
                completed: job.completed(),
                items: job.items().iter().map(ItemRowView::from_item).collect(),
            }),
            export_path: self.export_path.clone(),
            export_error: self.export_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the render flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn bulk_phase(&self) -> BulkPhase {
        self.bulk_phase
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub(crate) fn begin_search(&mut self) {
        self.searches_in_flight += 1;
        self.search_error = None;
        self.search_phase = Some(SearchPhase::Resolving);
        self.dirty = true;
    }

    pub(crate) fn set_search_phase(&mut self, phase: SearchPhase) {
        if self.searches_in_flight > 0 {
            self.search_phase = Some(phase);
            self.dirty = true;
        }
    }

    pub(crate) fn push_record(&mut self, record: RestaurantRecord) {
        // Most recently completed first; concurrent searches settle in
        // whatever order they finish.
        self.records.insert(0, record);
        self.finish_search();
    }

    pub(crate) fn fail_search(&mut self, message: String) {
        self.search_error = Some(message);
        self.finish_search();
    }

    fn finish_search(&mut self) {
        self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
        if self.searches_in_flight == 0 {
            self.search_phase = None;
        }
        self.dirty = true;
    }

    pub(crate) fn begin_upload(&mut self) {
        self.bulk_phase = BulkPhase::Uploading;
        self.bulk_error = None;
        self.export_path = None;
        self.export_error = None;
        self.dirty = true;
    }

    /// Installs the new roster. Any previous job is discarded entirely;
    /// there is no merge across jobs.
    pub(crate) fn accept_batch(&mut self, job_id: String, items: Vec<JobItem>) {
        self.job = Some(Job::new(job_id, items));
        self.bulk_phase = BulkPhase::Processing;
        self.dirty = true;
    }

    pub(crate) fn reject_upload(&mut self, message: String) {
        self.bulk_phase = BulkPhase::Failed;
        self.bulk_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn apply_item_update(&mut self, update: &ItemUpdate) {
        if let Some(job) = &mut self.job {
            job.apply_update(update);
            self.dirty = true;
        }
    }

    pub(crate) fn complete_job(&mut self) {
        if let Some(job) = &mut self.job {
            job.apply_completion();
            self.bulk_phase = BulkPhase::Completed;
            self.dirty = true;
        }
    }

    pub(crate) fn reset_bulk(&mut self) {
        self.job = None;
        self.bulk_phase = BulkPhase::Idle;
        self.bulk_error = None;
        self.export_path = None;
        self.export_error = None;
        self.dirty = true;
    }

    pub(crate) fn set_export_saved(&mut self, path: String) {
        self.export_path = Some(path);
        self.export_error = None;
        self.dirty = true;
    }

    pub(crate) fn set_export_failed(&mut self, message: String) {
        self.export_error = Some(message);
        self.dirty = true;
    }
}
