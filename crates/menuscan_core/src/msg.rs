#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a single name/location search.
    SearchSubmitted { name: String, location: String },
    /// Extraction client phase change for an in-flight search.
    SearchProgress { phase: crate::SearchPhase },
    /// A single search finished with a record.
    SearchCompleted { record: crate::RestaurantRecord },
    /// A single search failed; the message is user-facing.
    SearchFailed { message: String },
    /// User submitted a CSV batch for bulk processing.
    BatchSubmitted { path: String },
    /// The gateway accepted the batch and returned the initial roster.
    BatchAccepted {
        job_id: String,
        items: Vec<crate::JobItem>,
    },
    /// The gateway rejected the upload; no job was created.
    BatchRejected { message: String },
    /// Channel `update` event for one roster item.
    ItemUpdated { update: crate::ItemUpdate },
    /// Channel `complete` event: the job is done, whatever the items say.
    JobCompleted,
    /// The channel closed without a completion event.
    ChannelClosed,
    /// User asked for the result CSV of the completed job.
    ExportRequested,
    /// The exporter saved the artifact locally.
    ExportSaved { path: String },
    /// The export request failed.
    ExportFailed { message: String },
    /// User discarded the current bulk job to start over.
    BulkReset,
}
