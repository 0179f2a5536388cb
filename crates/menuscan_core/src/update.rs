use crate::{AppState, BulkPhase, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every roster mutation here is driven by an inbound message; the
/// coordinator never infers a transition locally.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted { name, location } => {
            let name = name.trim().to_string();
            let location = location.trim().to_string();
            if name.is_empty() {
                return (state, Vec::new());
            }
            state.begin_search();
            vec![Effect::Search { name, location }]
        }
        Msg::SearchProgress { phase } => {
            state.set_search_phase(phase);
            Vec::new()
        }
        Msg::SearchCompleted { record } => {
            state.push_record(record);
            Vec::new()
        }
        Msg::SearchFailed { message } => {
            state.fail_search(message);
            Vec::new()
        }
        Msg::BatchSubmitted { path } => {
            // One roster at a time: the upload surface stays closed while a
            // job is in flight.
            match state.bulk_phase() {
                BulkPhase::Uploading | BulkPhase::Processing => {
                    return (state, Vec::new());
                }
                BulkPhase::Idle | BulkPhase::Completed | BulkPhase::Failed => {}
            }
            state.begin_upload();
            vec![Effect::SubmitBatch { path }]
        }
        Msg::BatchAccepted { job_id, items } => {
            state.accept_batch(job_id.clone(), items);
            // Release before acquire: any previous job's channel goes down
            // before the new one comes up, so events cannot leak across jobs.
            vec![Effect::CloseChannel, Effect::OpenChannel { job_id }]
        }
        Msg::BatchRejected { message } => {
            state.reject_upload(message);
            Vec::new()
        }
        Msg::ItemUpdated { update } => {
            state.apply_item_update(&update);
            Vec::new()
        }
        Msg::JobCompleted => {
            state.complete_job();
            vec![Effect::CloseChannel]
        }
        Msg::ChannelClosed => {
            // No reconnect. A drop before completion leaves the job stalled;
            // the server is not re-queried.
            Vec::new()
        }
        Msg::ExportRequested => match state.job() {
            Some(job) if job.completed() => vec![Effect::RequestExport {
                job_id: job.id.clone(),
            }],
            _ => Vec::new(),
        },
        Msg::ExportSaved { path } => {
            state.set_export_saved(path);
            Vec::new()
        }
        Msg::ExportFailed { message } => {
            state.set_export_failed(message);
            Vec::new()
        }
        Msg::BulkReset => {
            state.reset_bulk();
            vec![Effect::CloseChannel]
        }
    };

    (state, effects)
}
