//! Frontend module for egui UI
//!
//! The dashboard reads the latest [`SampleWindow`] from the [`WindowStore`]
//! whenever the pipeline announces an update, and renders it:
//!
//! - a toolbar with the display-count dropdown and the CSV export button
//! - the color value chart ([`ChartView`])
//! - the current-color card ([`ColorCard`])
//! - a status bar
//!
//! All data logic lives in the pipeline; this module only calls into it.

mod chart;
mod status_bar;
pub mod widgets;

pub use chart::{ChartView, CHART_TITLE};
pub use status_bar::{Notice, NoticeLevel};
pub use widgets::{ColorCard, ColorDetails, ColorSwatch};

use crate::config::AppConfig;
use crate::pipeline::{
    ChartFeed, ExportOutcome, PipelineBridge, ReportExporter, SampleWindow, SeriesProjector,
    SinkMessage, WindowStore,
};
use crate::timefmt::TimeFormatter;
use crate::types::DisplayCount;
use chrono::Utc;
use status_bar::{render_status_bar, StatusBarContext};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Fallback repaint so the UI notices messages even without input events
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state implementing [`eframe::App`]
pub struct ColorVisApp {
    bridge: PipelineBridge,
    store: WindowStore,
    window: Arc<SampleWindow>,
    display_count: DisplayCount,
    projector: SeriesProjector,
    exporter: ReportExporter,
    chart: ChartView,
    config: AppConfig,
    persist_config: bool,
    source_name: String,
    pipeline_running: bool,
    notice: Option<Notice>,
}

impl ColorVisApp {
    pub fn new(
        bridge: PipelineBridge,
        store: WindowStore,
        config: AppConfig,
        source_name: impl Into<String>,
    ) -> Self {
        let formatter = TimeFormatter::bangkok();
        let window = store.current();
        // Catch up on a window published before the UI existed
        bridge.republish();

        Self {
            bridge,
            store,
            window,
            display_count: config.display.default_display_count,
            projector: SeriesProjector::new(formatter),
            exporter: ReportExporter::new(formatter),
            chart: ChartView::default(),
            config,
            persist_config: false,
            source_name: source_name.into(),
            pipeline_running: true,
            notice: None,
        }
    }

    /// Allow `on_exit` to write the display count back to the config file.
    ///
    /// Leave this off when the config in hand is a fallback for a file that
    /// failed to load, so the user's file is not overwritten with defaults.
    pub fn with_config_persistence(mut self, persist: bool) -> Self {
        self.persist_config = persist;
        self
    }

    /// The config to write on exit, if persistence is on and something changed
    pub fn config_to_save(&mut self) -> Option<&AppConfig> {
        if !self.persist_config
            || self.config.display.default_display_count == self.display_count
        {
            return None;
        }
        self.config.display.default_display_count = self.display_count;
        Some(&self.config)
    }

    /// Apply all pending pipeline messages. Returns true if any arrived.
    pub fn process_pipeline_messages(&mut self) -> bool {
        let messages = self.bridge.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            match msg {
                SinkMessage::WindowUpdated {
                    version,
                    sample_count,
                    current_color,
                } => {
                    self.window = self.store.current();
                    tracing::trace!(
                        "Window #{} ({} samples, current {:?})",
                        version,
                        sample_count,
                        current_color
                    );
                }
                SinkMessage::SnapshotIgnored => {}
                SinkMessage::SourceError(err) => {
                    self.notice = Some(Notice::error(err));
                }
                SinkMessage::Shutdown => {
                    self.pipeline_running = false;
                }
            }
        }

        had_messages
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn display_count(&self) -> DisplayCount {
        self.display_count
    }

    pub fn set_display_count(&mut self, display_count: DisplayCount) {
        self.display_count = display_count;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_pipeline_running(&self) -> bool {
        self.pipeline_running
    }

    /// Chart data for the current window and display count
    pub fn chart_feed(&self) -> ChartFeed {
        self.projector.chart_feed(&self.window, self.display_count)
    }

    /// Export the current window to `path`, recording the result as a notice.
    pub fn export_to(&mut self, path: &Path) -> Option<ExportOutcome> {
        match self
            .exporter
            .export_to_path(&self.window, Utc::now(), path)
        {
            Ok(ExportOutcome::Written { path, rows }) => {
                self.notice = Some(Notice::info(format!(
                    "Exported {} samples to {}",
                    rows,
                    path.display()
                )));
                Some(ExportOutcome::Written { path, rows })
            }
            Ok(ExportOutcome::Skipped) => {
                self.notice = Some(Notice::info("No data available to export"));
                Some(ExportOutcome::Skipped)
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                self.notice = Some(Notice::error(format!("Export failed: {}", e)));
                None
            }
        }
    }

    fn export_csv(&mut self) {
        self.window = self.store.current();
        if self.window.is_empty() {
            tracing::info!("No data available to export");
            self.notice = Some(Notice::info("No data available to export"));
            return;
        }

        let mut dialog = rfd::FileDialog::new()
            .set_title("Export to CSV")
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&self.config.export.file_name);
        if let Some(dir) = &self.config.export.directory {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.save_file() {
            self.export_to(&path);
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Display:");
            egui::ComboBox::from_id_salt("display_count")
                .selected_text(self.display_count.display_name())
                .show_ui(ui, |ui| {
                    for count in DisplayCount::all() {
                        ui.selectable_value(&mut self.display_count, *count, count.display_name());
                    }
                });

            ui.separator();

            if ui.button("Export to CSV").clicked() {
                self.export_csv();
            }
        });
    }
}

impl eframe::App for ColorVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.process_pipeline_messages() {
            ctx.request_repaint();
        }
        ctx.request_repaint_after(REPAINT_INTERVAL);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = StatusBarContext {
                source_name: &self.source_name,
                pipeline_running: self.pipeline_running,
                window_version: self.window.version,
                sample_count: self.window.len(),
                notice: self.notice.as_ref(),
            };
            render_status_bar(ui, &status);
        });

        egui::SidePanel::right("current_color")
            .resizable(false)
            .min_width(180.0)
            .show(ctx, |ui| {
                ui.add(ColorCard::new(self.window.current_color()));
            });

        let feed = self.chart_feed();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart.render(ui, &feed);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.bridge.shutdown();

        if let Some(config) = self.config_to_save() {
            if let Err(e) = config.save() {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
    }
}
