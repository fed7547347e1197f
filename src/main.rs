//! Color Sensor Dashboard - Main Entry Point
//!
//! Wires the configured snapshot source to the pipeline thread and runs the
//! egui dashboard until the window is closed.

use colorvis_rs::{
    config::{self, AppConfig},
    frontend::ColorVisApp,
    pipeline::{snapshot_channel, PipelineBridge, PipelineBuilder, WindowStore},
    source::{self, forward_to},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Config first: it decides the log filter and file logging
    let loaded = AppConfig::load();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default(),
    };
    // Never overwrite a config file that exists but failed to load
    let persist_config =
        loaded.is_ok() || config::config_path().is_some_and(|path| !path.exists());

    // Initialize logging
    let (file_layer, _log_guard) = match AppConfig::log_dir().filter(|_| config.log.file_logging) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "colorvis.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting Color Sensor Dashboard");
    if let Err(e) = &loaded {
        tracing::info!("Using default config: {}", e);
    }

    let store = WindowStore::new();
    let (bridge, cmd_rx, msg_tx) = PipelineBridge::new();
    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let evict_rx = snapshot_rx.clone();
    let running = Arc::new(AtomicBool::new(true));

    let mut snapshot_source = source::from_config(&config.source)?;
    let source_name = snapshot_source.name().to_string();

    let mut pipeline = PipelineBuilder::new(config.clone()).build(
        store.clone(),
        snapshot_rx,
        cmd_rx,
        msg_tx,
        running.clone(),
    )?;
    let pipeline_handle = std::thread::Builder::new()
        .name("pipeline".to_string())
        .spawn(move || pipeline.run())?;

    tracing::info!("Subscribing to {} source at {}", source_name, config.source.path);
    let subscription = snapshot_source.subscribe(forward_to(snapshot_tx, evict_rx))?;

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Color Sensor Dashboard"),
        ..Default::default()
    };

    let dark_mode = config.display.dark_mode;
    let result = eframe::run_native(
        "Color Sensor Dashboard",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(
                ColorVisApp::new(bridge, store, config, source_name)
                    .with_config_persistence(persist_config),
            ))
        }),
    );

    // Stop the source first so no snapshot arrives mid-shutdown
    tracing::info!("Shutting down...");
    subscription.unsubscribe();
    running.store(false, Ordering::Relaxed);
    if pipeline_handle.join().is_err() {
        tracing::error!("Pipeline thread panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
