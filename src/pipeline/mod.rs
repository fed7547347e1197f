//! Color sample pipeline.
//!
//! Data flows from a raw snapshot to an immutable window, and from there to
//! the chart and the CSV report:
//!
//! ```text
//! Snapshot ──► [SampleWindowBuilder] ──► WindowStore ──┬──► [SeriesProjector] ──► chart
//!                                                       └──► [ReportExporter]  ──► color_data.csv
//! ```
//!
//! The pipeline runs on a dedicated thread and talks to the UI through
//! crossbeam channels ([`PipelineBridge`]). The window itself is shared
//! through the [`WindowStore`], which swaps whole windows atomically.

pub mod bridge;
pub mod error;
pub mod executor;
pub mod export;
pub mod series;
pub mod store;
pub mod window;

pub use bridge::{snapshot_channel, PipelineBridge, PipelineCommand, SinkMessage};
pub use error::{PipelineError, PipelineResult};
pub use executor::{Pipeline, PipelineBuilder, PipelineStats};
pub use export::{ExportOutcome, ReportExporter, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
pub use series::{ChartFeed, SeriesProjector};
pub use store::WindowStore;
pub use window::{SampleWindow, SampleWindowBuilder};
