//! # ColorVis-RS: Color Sensor Dashboard
//!
//! Subscribes to a stream of color-sensor snapshots, keeps the newest 100
//! readings as an ordered sample window, and presents them as a decimal
//! value chart, a current-color card and a CSV report.
//!
//! ## Architecture
//!
//! - **Source**: pushes full snapshots of the sensor path ([`source`])
//! - **Pipeline**: a dedicated thread that rebuilds and publishes the sample
//!   window for every snapshot ([`pipeline`])
//! - **Frontend**: eframe/egui dashboard with an egui_plot chart ([`frontend`])
//! - **Communication**: crossbeam channels between threads, an atomically
//!   swapped window shared through [`pipeline::WindowStore`]
//!
//! All civil times (chart axis, report) are rendered at a fixed UTC+7 offset
//! regardless of the host time zone ([`timefmt`]).
//!
//! ## Configuration
//!
//! `config.toml` is read from the platform data directory under
//! `dev.colorvis.colorvis-rs`:
//!
//! - **Linux**: `~/.local/share/dev.colorvis.colorvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.colorvis.colorvis-rs/`
//! - **Windows**: `%APPDATA%\dev.colorvis.colorvis-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use colorvis_rs::pipeline::{SampleWindowBuilder, SeriesProjector, WindowStore};
//! use colorvis_rs::types::{DisplayCount, Snapshot};
//!
//! let snapshot = Snapshot::new()
//!     .with_color("100", "#AABBCC")
//!     .with_color("200", "#112233");
//!
//! let store = WindowStore::new();
//! if let Some(samples) = SampleWindowBuilder::new().build(&snapshot, chrono::Utc::now()) {
//!     store.publish(samples, chrono::Utc::now());
//! }
//!
//! let window = store.current();
//! assert_eq!(window.current_color(), Some("#112233"));
//! let feed = SeriesProjector::default().chart_feed(&window, DisplayCount::Ten);
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod frontend;
pub mod pipeline;
pub mod source;
pub mod timefmt;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ColorVisError, Result};
pub use frontend::ColorVisApp;
pub use pipeline::{PipelineBridge, PipelineBuilder, SampleWindow, WindowStore};
pub use source::{SnapshotSource, Subscription};
pub use types::{ColorSample, DisplayCount, SeriesPoint, Snapshot};
