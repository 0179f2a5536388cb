use std::path::PathBuf;
use std::time::Duration;

use crate::wire::{ExtractResponse, RosterRow, StatusUpdate};

/// Connection parameters for the extraction backend.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// HTTP API base, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay before the one-shot retry of an empty extraction.
    pub retry_delay: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Phase of an in-flight single search, reported for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Resolving,
    Extracting,
    Retrying,
}

/// Outcome of one single search: the input pair, where it resolved, and
/// the extraction payload (absent for dineout-only venues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantRecord {
    pub name: String,
    pub location: String,
    pub source_url: Option<String>,
    pub dineout_only: bool,
    pub extraction: Option<ExtractResponse>,
}

/// Transport-level failure talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    /// The gateway rejected the request and said why (`detail` body field).
    #[error("{0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Failure of a whole single search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The resolver had no match; the message is surfaced verbatim.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Failure on the live status channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed frame: {0}")]
    Decode(String),
}

/// Export failure: either the download or the local write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("persist error: {0}")]
    Persist(String),
}

/// The batch the gateway accepted: job id plus the initial roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBatch {
    pub job_id: String,
    pub items: Vec<RosterRow>,
}

/// Everything the engine reports back to its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SearchProgress {
        phase: SearchPhase,
    },
    SearchFinished {
        result: Result<RestaurantRecord, SearchError>,
    },
    BatchSubmitted {
        result: Result<AcceptedBatch, RequestError>,
    },
    /// One `update` frame from the status channel, in arrival order.
    ItemUpdate(StatusUpdate),
    /// The channel's terminal frame.
    JobComplete,
    /// The channel went away without a terminal frame.
    ChannelClosed,
    ExportFinished {
        result: Result<PathBuf, ExportError>,
    },
}
