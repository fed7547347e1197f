//! Status bar panel - bottom bar showing source, window and export info.

use egui::{Color32, RichText, Ui};

/// Severity of the last notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A one-line message shown at the right of the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub source_name: &'a str,
    pub pipeline_running: bool,
    pub window_version: u64,
    pub sample_count: usize,
    pub notice: Option<&'a Notice>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let (status_color, status_text) = if ctx.pipeline_running {
            (Color32::GREEN, "Live")
        } else {
            (Color32::GRAY, "Stopped")
        };
        ui.colored_label(status_color, "●");
        ui.label(RichText::new(format!("{}: {}", status_text, ctx.source_name)).small());

        ui.separator();
        ui.label(RichText::new(format!("Samples: {}", ctx.sample_count)).small());

        ui.separator();
        ui.label(RichText::new(format!("Window #{}", ctx.window_version)).small());

        if let Some(notice) = ctx.notice {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = match notice.level {
                    NoticeLevel::Info => Color32::GRAY,
                    NoticeLevel::Error => Color32::RED,
                };
                ui.colored_label(color, RichText::new(&notice.text).small());
            });
        }
    });
}
