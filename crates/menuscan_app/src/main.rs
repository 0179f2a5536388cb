mod effects;
mod logging;
mod render;

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use menuscan_core::{update, AppState, BulkPhase, Msg};
use menuscan_engine::ClientSettings;

use effects::EffectRunner;
use logging::LogDestination;

#[derive(Parser)]
#[command(name = "menuscan", version, about = "Restaurant listing extraction client")]
struct Cli {
    /// HTTP API base of the extraction backend.
    #[arg(
        long,
        env = "MENUSCAN_API_BASE",
        default_value = "http://localhost:8000/api/v1"
    )]
    api_base: String,
    /// Mirror engine logs to the terminal as well as ./engine.log.
    #[arg(long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one restaurant by name and location and extract its listing.
    Search { name: String, location: String },
    /// Upload a restaurant CSV and follow the job to its exported results.
    Bulk {
        /// CSV with `Restaurant Name` and `Location` columns.
        input: PathBuf,
        /// Directory the result CSV is written into.
        #[arg(long, default_value = "output")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(if cli.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let settings = ClientSettings {
        base_url: cli.api_base.clone(),
        ..ClientSettings::default()
    };

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    match cli.command {
        Command::Search { name, location } => {
            let runner = EffectRunner::new(settings, PathBuf::from("."), msg_tx.clone())
                .context("engine startup failed")?;
            let _ = msg_tx.send(Msg::SearchSubmitted { name, location });
            run_search(msg_rx, runner)
        }
        Command::Bulk { input, output } => {
            let runner = EffectRunner::new(settings, output, msg_tx.clone())
                .context("engine startup failed")?;
            let _ = msg_tx.send(Msg::BatchSubmitted {
                path: input.display().to_string(),
            });
            run_bulk(msg_rx, msg_tx, runner)
        }
    }
}

/// Message loop for one single search: drives the coordinator until the
/// search settles, rendering each dirty snapshot.
fn run_search(msg_rx: mpsc::Receiver<Msg>, runner: EffectRunner) -> anyhow::Result<()> {
    let mut state = AppState::new();
    loop {
        let msg = msg_rx.recv().context("engine hung up")?;
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            let view = state.view();
            if view.searching {
                render::render_search_progress(&view);
                continue;
            }
            if let Some(message) = view.search_error {
                bail!("{message}");
            }
            if let Some(record) = view.records.first() {
                render::render_record(record);
                return Ok(());
            }
        }
    }
}

/// Message loop for one bulk job: upload, follow the status channel to
/// completion, then fetch the exported CSV.
fn run_bulk(
    msg_rx: mpsc::Receiver<Msg>,
    msg_tx: mpsc::Sender<Msg>,
    runner: EffectRunner,
) -> anyhow::Result<()> {
    let mut state = AppState::new();
    let mut export_requested = false;
    loop {
        let msg = msg_rx.recv().context("engine hung up")?;
        // The coordinator deliberately ignores a channel drop; a one-shot
        // CLI run has nothing left to wait for, so it exits instead.
        let channel_lost = matches!(msg, Msg::ChannelClosed)
            && state.job().is_some_and(|job| !job.completed());
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        if channel_lost {
            bail!("status channel closed before the job completed");
        }

        if state.consume_dirty() {
            let view = state.view();
            render::render_bulk_progress(&view);
            match view.bulk_phase {
                BulkPhase::Failed => {
                    bail!(view
                        .bulk_error
                        .unwrap_or_else(|| "upload rejected".to_string()));
                }
                BulkPhase::Completed => {
                    if let Some(message) = &view.export_error {
                        bail!("export failed: {message}");
                    }
                    if view.export_path.is_some() {
                        render::render_bulk_outcome(&view);
                        return Ok(());
                    }
                    if !export_requested {
                        export_requested = true;
                        let _ = msg_tx.send(Msg::ExportRequested);
                    }
                }
                BulkPhase::Idle | BulkPhase::Uploading | BulkPhase::Processing => {}
            }
        }
    }
}
