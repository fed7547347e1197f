//! CSV report export of the sample window.
//!
//! Layout:
//!
//! ```text
//! Color Sensor Data Export
//! Generated on: 2024-01-01 07:00:00
//! Data shows color readings over time
//!
//! Time,Hex,Decimal,R,G,B,H,S,L
//! 2024-01-01 07:00:00,#FF0000,16711680,255,0,0,0,100,50
//! ```
//!
//! Rows follow the window order (newest first). H, S and L are rounded half
//! away from zero. Every line ends in `\n`.

use crate::color::{hex_to_decimal, hex_to_hsl, hex_to_rgb};
use crate::error::{Result, ResultExt};
use crate::pipeline::window::SampleWindow;
use crate::timefmt::TimeFormatter;
use crate::types::ColorSample;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default name of the exported file
pub const EXPORT_FILE_NAME: &str = "color_data.csv";

/// MIME type of the exported document
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Report title (first metadata line)
pub const REPORT_TITLE: &str = "Color Sensor Data Export";

/// Report description (third metadata line)
pub const REPORT_DESCRIPTION: &str = "Data shows color readings over time";

/// Column header row
pub const HEADER: [&str; 9] = ["Time", "Hex", "Decimal", "R", "G", "B", "H", "S", "L"];

/// Result of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Report written to `path` with `rows` data rows.
    Written { path: PathBuf, rows: usize },
    /// Window was empty; nothing written.
    Skipped,
}

/// Renders the sample window as a CSV report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportExporter {
    formatter: TimeFormatter,
}

impl ReportExporter {
    pub fn new(formatter: TimeFormatter) -> Self {
        Self { formatter }
    }

    /// Full report text, or `None` when the window is empty.
    pub fn render(&self, window: &SampleWindow, generated_at: DateTime<Utc>) -> Option<String> {
        if window.is_empty() {
            tracing::info!("No data available to export");
            return None;
        }
        let mut out = Vec::new();
        self.write_report(&window.samples, generated_at, &mut out).ok()?;
        String::from_utf8(out).ok()
    }

    /// Stream the report to `writer`. Returns the number of data rows,
    /// `0` (and writes nothing) for an empty window.
    pub fn write_to<W: Write>(
        &self,
        window: &SampleWindow,
        generated_at: DateTime<Utc>,
        writer: &mut W,
    ) -> Result<usize> {
        if window.is_empty() {
            tracing::info!("No data available to export");
            return Ok(0);
        }
        self.write_report(&window.samples, generated_at, writer)
            .context("Writing color report")?;
        Ok(window.len())
    }

    /// Write the report to a file. No file is created for an empty window.
    pub fn export_to_path(
        &self,
        window: &SampleWindow,
        generated_at: DateTime<Utc>,
        path: impl AsRef<Path>,
    ) -> Result<ExportOutcome> {
        let path = path.as_ref();
        if window.is_empty() {
            tracing::info!("No data available to export");
            return Ok(ExportOutcome::Skipped);
        }

        let file = File::create(path).with_context(|| format!("Creating {:?}", path))?;
        let mut writer = BufWriter::new(file);
        let rows = self.write_to(window, generated_at, &mut writer)?;
        writer
            .flush()
            .with_context(|| format!("Flushing {:?}", path))?;

        tracing::info!("Exported {} samples to {:?}", rows, path);
        Ok(ExportOutcome::Written {
            path: path.to_path_buf(),
            rows,
        })
    }

    fn write_report<W: Write>(
        &self,
        samples: &[ColorSample],
        generated_at: DateTime<Utc>,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "{}", REPORT_TITLE)?;
        writeln!(
            writer,
            "Generated on: {}",
            self.formatter.format_export(generated_at)
        )?;
        writeln!(writer, "{}", REPORT_DESCRIPTION)?;
        writeln!(writer)?;
        writeln!(writer, "{}", HEADER.join(","))?;

        for sample in samples {
            writeln!(writer, "{}", self.row(sample))?;
        }
        Ok(())
    }

    fn row(&self, sample: &ColorSample) -> String {
        let rgb = hex_to_rgb(&sample.hex);
        let (h, s, l) = hex_to_hsl(&sample.hex).rounded();
        format!(
            "{},{},{},{},{},{},{},{},{}",
            self.formatter.format_export(sample.timestamp),
            csv_field(&sample.hex),
            hex_to_decimal(&sample.hex),
            rgb.r,
            rgb.g,
            rgb.b,
            h,
            s,
            l
        )
    }
}

/// Quote a field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
