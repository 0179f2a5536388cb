//! Menuscan core: pure state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{compute_progress, ItemStatus, ItemUpdate, Job, JobItem};
pub use msg::Msg;
pub use record::{ExtractionResult, RestaurantRecord, SearchPhase};
pub use state::{AppState, BulkPhase};
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView, JobView, RecordRowView};
