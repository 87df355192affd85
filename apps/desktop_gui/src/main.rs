use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::BookId;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{BookPageApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "storycircle-gui", about = "StoryCircle book page window")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    session_path: Option<PathBuf>,
    /// Book to open on startup.
    #[arg(long, default_value_t = 1)]
    book: i64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }
    tracing::info!(server_url = %settings.server_url, book = args.book, "starting book page window");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let startup = StartupConfig {
        book_id: BookId(args.book),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("StoryCircle")
            .with_inner_size([860.0, 720.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "StoryCircle",
        options,
        Box::new(|_cc| Ok(Box::new(BookPageApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start window: {err}"))
}
