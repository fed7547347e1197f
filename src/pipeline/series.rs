//! Projection of the sample window onto a chartable series.

use crate::color::hex_to_decimal;
use crate::pipeline::window::SampleWindow;
use crate::timefmt::TimeFormatter;
use crate::types::{ColorSample, DisplayCount, SeriesPoint};
use chrono::DateTime;

/// Maps samples to chart points and applies the display-count truncation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesProjector {
    formatter: TimeFormatter,
}

impl SeriesProjector {
    pub fn new(formatter: TimeFormatter) -> Self {
        Self { formatter }
    }

    /// One point per sample, in the window's newest-first order.
    pub fn points(&self, samples: &[ColorSample]) -> Vec<SeriesPoint> {
        samples
            .iter()
            .map(|sample| SeriesPoint {
                x: sample.timestamp,
                y: hex_to_decimal(&sample.hex),
                label: self.formatter.format_export(sample.timestamp),
            })
            .collect()
    }

    /// The newest `display_count` points, oldest first (chart order).
    pub fn project(&self, samples: &[ColorSample], display_count: usize) -> Vec<SeriesPoint> {
        let shown = display_count.min(samples.len());
        let mut points = self.points(&samples[..shown]);
        points.reverse();
        points
    }

    /// Everything the chart widget needs for one render.
    pub fn chart_feed(&self, window: &SampleWindow, display_count: DisplayCount) -> ChartFeed {
        ChartFeed {
            points: self.project(&window.samples, display_count.count()),
            formatter: self.formatter,
        }
    }
}

/// Data points plus the axis formatters handed to the chart widget
#[derive(Debug, Clone)]
pub struct ChartFeed {
    pub points: Vec<SeriesPoint>,
    formatter: TimeFormatter,
}

impl ChartFeed {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(SeriesPoint::as_plot_point).collect()
    }

    /// X axis label for a value in epoch seconds (`HH:mm:ss`)
    pub fn axis_x_label(&self, x_secs: f64) -> String {
        format_axis_secs(&self.formatter, x_secs)
    }

    /// Y axis label: the integer color value without decimals
    pub fn axis_y_label(&self, y: f64) -> String {
        format_axis_y(y)
    }
}

/// Format an epoch-seconds axis value in the formatter's civil time.
pub fn format_axis_secs(formatter: &TimeFormatter, x_secs: f64) -> String {
    match DateTime::from_timestamp_millis((x_secs * 1000.0).round() as i64) {
        Some(instant) => formatter.format_axis(instant),
        None => String::new(),
    }
}

pub fn format_axis_y(y: f64) -> String {
    format!("{:.0}", y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::window::SampleWindowBuilder;
    use crate::types::Snapshot;
    use chrono::{TimeZone, Utc};

    fn window_of(n: u64) -> Vec<ColorSample> {
        let mut snapshot = Snapshot::new();
        for i in 0..n {
            snapshot = snapshot.with_color(i + 1, format!("#{:06X}", i + 1));
        }
        SampleWindowBuilder::new()
            .build(&snapshot, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .unwrap_or_default()
    }

    #[test]
    fn test_truncates_and_orders_chronologically() {
        let samples = window_of(50);
        let points = SeriesProjector::default().project(&samples, 10);

        assert_eq!(points.len(), 10);
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
        // newest sample (key 50) is the last point
        assert_eq!(points.last().map(|p| p.y), Some(50));
        assert_eq!(points.first().map(|p| p.y), Some(41));
    }

    #[test]
    fn test_display_count_larger_than_window() {
        let samples = window_of(5);
        let points = SeriesProjector::default().project(&samples, 30);
        assert_eq!(points.len(), 5);
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_empty_window_projects_nothing() {
        assert!(SeriesProjector::default().project(&[], 10).is_empty());
    }

    #[test]
    fn test_point_values_and_labels() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let samples = vec![ColorSample::new("#112233", t), ColorSample::new("bogus", t)];
        let points = SeriesProjector::default().points(&samples);
        assert_eq!(points[0].y, 0x112233);
        assert_eq!(points[0].label, "2024-01-01 07:00:00");
        assert_eq!(points[1].y, 0);
    }

    #[test]
    fn test_chart_feed_axis_formatters() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = SampleWindow {
            version: 1,
            built_at: t,
            samples: vec![ColorSample::new("#000010", t)],
        };
        let feed = SeriesProjector::default().chart_feed(&window, DisplayCount::Ten);
        assert_eq!(feed.plot_points(), vec![[t.timestamp() as f64, 16.0]]);
        assert_eq!(feed.axis_x_label(t.timestamp() as f64), "07:00:00");
        assert_eq!(feed.axis_y_label(1234.4), "1234");
    }
}
