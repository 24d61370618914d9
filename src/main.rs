//! Pactum - contract drafting assistant
//!
//! Main entry point: wires the store, the session, and the intake worker
//! together, then hands the UI to eframe.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pactum::api::InputSource;
use pactum::config::AppConfig;
use pactum::intake::IntakePipeline;
use pactum::messages::MessageLog;
use pactum::session::Session;
use pactum::storage::Store;
use pactum::ui::app::LaunchQuery;
use pactum::ui::{AppState, PactumApp};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pactum", about = "Contract drafting assistant")]
struct Args {
    /// Submit this query on startup, as if navigated in from a search
    #[arg(long)]
    query: Option<String>,

    /// Source tag for the startup query: button, search, or voice
    #[arg(long, default_value = "search")]
    source: String,

    /// Disable microphone capture
    #[arg(long)]
    no_audio: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pactum=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::default();
    if args.no_audio {
        config = config.without_audio_input();
    }
    config.validate().map_err(|e| anyhow!(e))?;

    info!("Starting Pactum (backend: {})", config.backend.base_url);

    let store = Store::open_default().context("Failed to open local store")?;
    let prefs = store.load_prefs();
    let session = Session::new().with_language(prefs.language.unwrap_or_default());

    let log = MessageLog::new();
    let pipeline = IntakePipeline::new(config.backend.clone(), log.clone());
    let handle = pipeline.handle();
    pipeline
        .start_worker(session, store)
        .context("Failed to start intake worker")?;

    let state = AppState::new(handle, log, config.enable_audio_input);

    let launch_query = args.query.map(|query| LaunchQuery {
        query,
        source: InputSource::parse(&args.source),
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Pactum"),
        ..Default::default()
    };

    eframe::run_native(
        "Pactum",
        options,
        Box::new(|cc| Ok(Box::new(PactumApp::new(cc, state, launch_query)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
