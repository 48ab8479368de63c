//! Desktop shell for the AI Pediatrician answer service.

mod backend_bridge;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::spawn_backend_thread;
use crate::controller::events::UiEvent;
use crate::ui::app::AssistantApp;

#[derive(Parser, Debug)]
#[command(name = "assistant-gui", about = "Desktop client for the AI Pediatrician answer service")]
struct Cli {
    /// Base URL of the answer service, overriding assistant.toml and APP__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let mut settings = config::load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    match config::normalize_server_url(&settings.server_url) {
        Ok(normalized) => settings.server_url = normalized,
        Err(err) => {
            tracing::warn!("{err:#}; falling back to {}", config::DEFAULT_SERVER_URL);
            settings.server_url = config::DEFAULT_SERVER_URL.to_string();
        }
    }
    tracing::info!(server_url = %settings.server_url, "starting desktop shell");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AI Pediatrician")
            .with_inner_size([760.0, 820.0])
            .with_min_inner_size([560.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "AI Pediatrician",
        options,
        Box::new(|_cc| Ok(Box::new(AssistantApp::new(cmd_tx, ui_rx)))),
    )
}
