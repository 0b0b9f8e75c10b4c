use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{load_settings, prepare_api_url, HttpReportFetcher};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{DiagnosisFormApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Collect patient symptoms and show the diagnosis report")]
struct Args {
    /// Diagnosis service endpoint; overrides diagnose.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let api_url = prepare_api_url(&settings.api_url).context("invalid api url")?;
    tracing::info!(%api_url, "using diagnosis service");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        Arc::new(HttpReportFetcher::new(api_url.clone())),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Medical Diagnosis Form")
            .with_inner_size([640.0, 780.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Medical Diagnosis Form",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DiagnosisFormApp::bootstrap(
                cmd_tx,
                ui_rx,
                StartupConfig { api_url },
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop form exited with an error: {err}"))
}
