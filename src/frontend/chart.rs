//! Color value chart using egui_plot
//!
//! Renders a [`ChartFeed`] as a single line of decimal color values over
//! time. X values are epoch seconds and are labelled in civil `HH:mm:ss`;
//! Y values are labelled as plain integers.

use crate::pipeline::ChartFeed;
use egui::{Color32, Ui};
use egui_plot::{GridMark, Line, Plot, PlotPoints, Points};

/// Chart title shown above the plot
pub const CHART_TITLE: &str = "Color Change Graph";

/// Series name in the legend/hover
pub const SERIES_NAME: &str = "Color Value";

/// Chart appearance
#[derive(Debug, Clone)]
pub struct ChartView {
    pub line_width: f32,
    pub line_color: Color32,
    pub show_markers: bool,
    pub marker_radius: f32,
}

impl Default for ChartView {
    fn default() -> Self {
        Self {
            line_width: 1.5,
            line_color: Color32::from_rgb(75, 192, 192),
            show_markers: true,
            marker_radius: 2.5,
        }
    }
}

impl ChartView {
    pub fn render(&self, ui: &mut Ui, feed: &ChartFeed) {
        ui.heading(CHART_TITLE);

        let plot = Plot::new("color_value_plot")
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_axes(true)
            .show_grid(true)
            .x_axis_label("Time")
            .y_axis_label("Value")
            .x_grid_spacer(|input| time_grid_marks(input.bounds))
            .x_axis_formatter(|mark, _range| feed.axis_x_label(mark.value))
            .y_axis_formatter(|mark, _range| feed.axis_y_label(mark.value));

        plot.show(ui, |plot_ui| {
            if feed.is_empty() {
                return;
            }
            let points = feed.plot_points();

            plot_ui.line(
                Line::new(SERIES_NAME, PlotPoints::from(points.clone()))
                    .color(self.line_color)
                    .width(self.line_width),
            );
            if self.show_markers {
                plot_ui.points(
                    Points::new(SERIES_NAME, PlotPoints::from(points))
                        .color(self.line_color)
                        .radius(self.marker_radius),
                );
            }
        });
    }
}

/// Grid marks for an epoch-seconds axis, snapped to whole seconds
fn time_grid_marks(bounds: (f64, f64)) -> Vec<GridMark> {
    let (min, max) = bounds;
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return Vec::new();
    }

    let step = if range <= 30.0 {
        5.0
    } else if range <= 60.0 {
        10.0
    } else if range <= 180.0 {
        30.0
    } else if range <= 600.0 {
        60.0
    } else {
        300.0
    };

    let mut marks = Vec::new();
    let mut current = (min / step).ceil() * step;
    while current <= max {
        marks.push(GridMark {
            value: current,
            step_size: step,
        });
        current += step;
    }
    marks
}
