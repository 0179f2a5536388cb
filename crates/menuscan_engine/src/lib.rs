//! Menuscan engine: backend IO and effect execution.
mod channel;
mod client;
mod engine;
mod export;
mod persist;
mod types;
mod upload;
mod wire;

pub use channel::{channel_url, decode_frame, run_status_channel};
pub use client::{
    build_http_client, EventSink, ExtractionApi, ExtractionClient, HttpExtractionApi,
    MpscEventSink,
};
pub use engine::EngineHandle;
pub use export::download_export;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    AcceptedBatch, ChannelError, ClientSettings, EngineEvent, ExportError, RequestError,
    RestaurantRecord, SearchError, SearchPhase,
};
pub use upload::submit_batch;
pub use wire::{
    ChannelFrame, ExtractResponse, ResolveResponse, RosterRow, StatusUpdate, SubmitResponse,
};
