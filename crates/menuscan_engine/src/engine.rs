use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::engine_warn;

use crate::channel::{channel_url, run_status_channel};
use crate::client::{build_http_client, ExtractionClient, HttpExtractionApi, MpscEventSink};
use crate::export::download_export;
use crate::upload::submit_batch;
use crate::{ClientSettings, EngineEvent, RequestError};

enum EngineCommand {
    Search {
        name: String,
        location: String,
    },
    SubmitBatch {
        path: PathBuf,
    },
    OpenChannel {
        job_id: String,
    },
    CloseChannel,
    RequestExport {
        job_id: String,
        dest_dir: PathBuf,
        filename: String,
    },
}

/// Handle to the IO engine: commands in, events out. All IO runs on a
/// dedicated thread owning a tokio runtime; the caller polls the returned
/// receiver for `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ClientSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), RequestError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let client = build_http_client(&settings)?;
        let api = Arc::new(HttpExtractionApi::new(client.clone(), &settings.base_url));
        let extraction = Arc::new(ExtractionClient::new(api, settings.retry_delay));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // At most one status channel at a time. The running task's
            // handle stays here so a new job (or a reset) tears the old
            // channel down before anything else happens.
            let mut channel_task: Option<tokio::task::JoinHandle<()>> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Search { name, location } => {
                        let extraction = extraction.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let sink = MpscEventSink::new(event_tx.clone());
                            let result =
                                extraction.resolve_and_extract(&name, &location, &sink).await;
                            let _ = event_tx.send(EngineEvent::SearchFinished { result });
                        });
                    }
                    EngineCommand::SubmitBatch { path } => {
                        let client = client.clone();
                        let base_url = settings.base_url.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = submit_batch(&client, &base_url, &path).await;
                            let _ = event_tx.send(EngineEvent::BatchSubmitted { result });
                        });
                    }
                    EngineCommand::OpenChannel { job_id } => {
                        // Release before acquire: the previous job's channel
                        // must be gone before the new one connects.
                        if let Some(task) = channel_task.take() {
                            task.abort();
                        }
                        let url = channel_url(&settings.base_url, &job_id);
                        let event_tx = event_tx.clone();
                        channel_task = Some(runtime.spawn(async move {
                            let sink = MpscEventSink::new(event_tx);
                            if let Err(err) = run_status_channel(&url, &sink).await {
                                engine_warn!("status channel ended with error: {err}");
                            }
                        }));
                    }
                    EngineCommand::CloseChannel => {
                        if let Some(task) = channel_task.take() {
                            task.abort();
                        }
                    }
                    EngineCommand::RequestExport {
                        job_id,
                        dest_dir,
                        filename,
                    } => {
                        let client = client.clone();
                        let base_url = settings.base_url.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result =
                                download_export(&client, &base_url, &job_id, &dest_dir, &filename)
                                    .await;
                            let _ = event_tx.send(EngineEvent::ExportFinished { result });
                        });
                    }
                }
            }
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn search(&self, name: impl Into<String>, location: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Search {
            name: name.into(),
            location: location.into(),
        });
    }

    pub fn submit_batch(&self, path: PathBuf) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitBatch { path });
    }

    pub fn open_channel(&self, job_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::OpenChannel {
            job_id: job_id.into(),
        });
    }

    pub fn close_channel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CloseChannel);
    }

    pub fn request_export(
        &self,
        job_id: impl Into<String>,
        dest_dir: PathBuf,
        filename: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::RequestExport {
            job_id: job_id.into(),
            dest_dir,
            filename: filename.into(),
        });
    }
}
