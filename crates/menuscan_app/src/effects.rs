use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use engine_logging::{engine_info, engine_warn};
use menuscan_core::{
    Effect, ExtractionResult, ItemStatus, ItemUpdate, JobItem, Msg, RestaurantRecord, SearchPhase,
};
use menuscan_engine::{
    AcceptedBatch, ClientSettings, EngineEvent, EngineHandle, ExtractResponse, RequestError,
    RosterRow, StatusUpdate,
};

/// Runs the coordinator's effects against the IO engine and pumps engine
/// events back into the message loop as `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        output_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, RequestError> {
        let (engine, event_rx) = EngineHandle::new(settings)?;
        spawn_event_loop(event_rx, msg_tx);
        Ok(Self { engine, output_dir })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Search { name, location } => {
                    engine_info!("search name={name} location={location}");
                    self.engine.search(name, location);
                }
                Effect::SubmitBatch { path } => {
                    engine_info!("submit batch path={path}");
                    self.engine.submit_batch(PathBuf::from(path));
                }
                Effect::OpenChannel { job_id } => self.engine.open_channel(job_id),
                Effect::CloseChannel => self.engine.close_channel(),
                Effect::RequestExport { job_id } => {
                    let filename = format!(
                        "menuscan_results_{}.csv",
                        Utc::now().format("%Y%m%d_%H%M%S")
                    );
                    self.engine
                        .request_export(job_id, self.output_dir.clone(), filename);
                }
            }
        }
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::SearchProgress { phase } => Msg::SearchProgress {
                    phase: map_phase(phase),
                },
                EngineEvent::SearchFinished { result } => match result {
                    Ok(record) => Msg::SearchCompleted {
                        record: map_record(record),
                    },
                    Err(err) => {
                        engine_warn!("search failed: {err}");
                        Msg::SearchFailed {
                            message: err.to_string(),
                        }
                    }
                },
                EngineEvent::BatchSubmitted { result } => match result {
                    Ok(batch) => map_batch(batch),
                    Err(err) => {
                        engine_warn!("upload rejected: {err}");
                        Msg::BatchRejected {
                            message: err.to_string(),
                        }
                    }
                },
                EngineEvent::ItemUpdate(update) => Msg::ItemUpdated {
                    update: map_update(update),
                },
                EngineEvent::JobComplete => Msg::JobCompleted,
                EngineEvent::ChannelClosed => Msg::ChannelClosed,
                EngineEvent::ExportFinished { result } => match result {
                    Ok(path) => Msg::ExportSaved {
                        path: path.display().to_string(),
                    },
                    Err(err) => Msg::ExportFailed {
                        message: err.to_string(),
                    },
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_phase(phase: menuscan_engine::SearchPhase) -> SearchPhase {
    match phase {
        menuscan_engine::SearchPhase::Resolving => SearchPhase::Resolving,
        menuscan_engine::SearchPhase::Extracting => SearchPhase::Extracting,
        menuscan_engine::SearchPhase::Retrying => SearchPhase::Retrying,
    }
}

fn map_record(record: menuscan_engine::RestaurantRecord) -> RestaurantRecord {
    RestaurantRecord {
        name: record.name,
        location: record.location,
        source_url: record.source_url,
        dineout_only: record.dineout_only,
        extraction: record.extraction.map(map_extraction),
    }
}

fn map_extraction(extraction: ExtractResponse) -> ExtractionResult {
    ExtractionResult {
        // A blank rating on the wire means "none".
        rating: extraction.rating.filter(|rating| !rating.is_empty()),
        total_ratings: extraction.total_ratings,
        promo_codes: extraction.promo_codes,
        items_99: extraction.items_99,
        offer_items: extraction.offer_items,
    }
}

fn map_batch(batch: AcceptedBatch) -> Msg {
    Msg::BatchAccepted {
        job_id: batch.job_id,
        items: batch.items.into_iter().map(roster_item).collect(),
    }
}

fn roster_item(row: RosterRow) -> JobItem {
    let mut item = JobItem::new(row.id, row.name, row.location);
    if let Some(label) = row.status.as_deref() {
        item.status = ItemStatus::from_label(label);
    }
    item
}

fn map_update(update: StatusUpdate) -> ItemUpdate {
    ItemUpdate {
        id: update.id,
        status: update.status.as_deref().map(ItemStatus::from_label),
        rating: update.rating.filter(|rating| !rating.is_empty()),
        total_ratings: update.total_ratings,
        promo_codes: update.promo_codes,
        offer_items: update.offer_items,
        dineout_only: update.dineout_only,
        source_url: update.source_url,
        error_message: update.error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_rows_default_to_queued_and_map_pending() {
        let row = RosterRow {
            id: "0".to_string(),
            name: "Roll House".to_string(),
            location: "Indiranagar".to_string(),
            status: Some("Pending".to_string()),
        };
        assert_eq!(roster_item(row).status, ItemStatus::Queued);

        let row = RosterRow {
            id: "1".to_string(),
            name: "Roll House".to_string(),
            location: "Indiranagar".to_string(),
            status: None,
        };
        assert_eq!(roster_item(row).status, ItemStatus::Queued);
    }

    #[test]
    fn blank_wire_rating_maps_to_absent() {
        let update = StatusUpdate {
            id: "3".to_string(),
            rating: Some(String::new()),
            ..StatusUpdate::default()
        };
        assert_eq!(map_update(update).rating, None);
    }

    #[test]
    fn unrecognized_status_label_survives_the_mapping() {
        let update = StatusUpdate {
            id: "3".to_string(),
            status: Some("Partial Error".to_string()),
            ..StatusUpdate::default()
        };
        assert_eq!(
            map_update(update).status,
            Some(ItemStatus::Other("Partial Error".to_string()))
        );
    }
}
