#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run resolve-and-extract for one restaurant.
    Search { name: String, location: String },
    /// Upload the CSV at `path` to the submission gateway.
    SubmitBatch { path: String },
    /// Open the live status channel for `job_id`.
    OpenChannel { job_id: String },
    /// Tear down the live status channel, if one is open.
    CloseChannel,
    /// Fetch the result CSV for the completed job.
    RequestExport { job_id: String },
}
