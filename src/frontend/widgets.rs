//! Custom widgets for the ColorVis-RS UI
//!
//! - [`ColorSwatch`] - Colored square previewing a sensor reading
//! - [`ColorCard`] - Current color with its Hex, RGB and HSL breakdown

use crate::color::{hex_to_hsl, hex_to_rgb, Rgb};
use egui::{Color32, Response, RichText, Ui, Widget};

/// Convert a parsed reading into an egui color
pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// A colored square
pub struct ColorSwatch {
    color: Color32,
    size: egui::Vec2,
}

impl ColorSwatch {
    pub fn new(color: Color32) -> Self {
        Self {
            color,
            size: egui::vec2(16.0, 16.0),
        }
    }

    /// Swatch for a `#RRGGBB` string (black when malformed)
    pub fn from_hex(hex: &str) -> Self {
        Self::new(to_color32(hex_to_rgb(hex)))
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = egui::vec2(width, height);
        self
    }
}

impl Widget for ColorSwatch {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(self.size, egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            ui.painter().rect_filled(rect, 4.0, self.color);
            ui.painter().rect_stroke(
                rect,
                4.0,
                egui::Stroke::new(1.0, Color32::GRAY),
                egui::StrokeKind::Outside,
            );
        }

        response
    }
}

/// Text rows shown under the swatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDetails {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
}

impl ColorDetails {
    pub fn from_hex(hex: &str) -> Self {
        let rgb = hex_to_rgb(hex);
        let (h, s, l) = hex_to_hsl(hex).rounded();
        Self {
            hex: hex.to_string(),
            rgb: format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
            hsl: format!("hsl({}, {}%, {}%)", h, s, l),
        }
    }
}

/// Current-color card: swatch plus details, or a placeholder without data
pub struct ColorCard<'a> {
    hex: Option<&'a str>,
}

impl<'a> ColorCard<'a> {
    pub fn new(hex: Option<&'a str>) -> Self {
        Self { hex }
    }
}

impl Widget for ColorCard<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| {
            ui.heading("Current Color");
            ui.add_space(4.0);

            let Some(hex) = self.hex else {
                ui.add(ColorSwatch::new(Color32::from_gray(60)).with_size(160.0, 100.0));
                ui.label(RichText::new("Waiting for data...").weak());
                return;
            };

            ui.add(ColorSwatch::from_hex(hex).with_size(160.0, 100.0));
            ui.add_space(4.0);

            let details = ColorDetails::from_hex(hex);
            egui::Grid::new("current_color_details")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Hex:");
                    ui.monospace(&details.hex);
                    ui.end_row();
                    ui.label("RGB:");
                    ui.monospace(&details.rgb);
                    ui.end_row();
                    ui.label("HSL:");
                    ui.monospace(&details.hsl);
                    ui.end_row();
                });
        })
        .response
    }
}
