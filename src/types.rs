//! Core data types for ColorVis-RS
//!
//! # Main Types
//!
//! - [`Snapshot`] - One full push from the data source: record key → [`RawRecord`]
//! - [`RecordKey`] - Arrival key with an explicit numeric interpretation
//! - [`ColorSample`] - A typed, timestamped reading inside the sample window
//! - [`SeriesPoint`] - A chart point derived from a sample
//! - [`DisplayCount`] - How many of the newest samples the chart shows
//!
//! # Snapshot Shape
//!
//! The source delivers JSON shaped like
//!
//! ```text
//! { "<key>": { "hex": { "<push id>": "#RRGGBB" } }, ... }
//! ```
//!
//! Keys are epoch-millisecond timestamps encoded as strings. Only the first
//! value of each nested `hex` map is used.

use crate::color::DEFAULT_HEX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Maximum number of samples retained in the window
pub const WINDOW_CAPACITY: usize = 100;

/// Spacing between synthesized sample timestamps, in milliseconds
pub const SAMPLE_STEP_MS: i64 = 5000;

/// Plausible epoch-millisecond keys: 2000-01-01 up to 2100-01-01 (UTC)
pub const EPOCH_MILLIS_KEY_RANGE: std::ops::Range<i64> = 946_684_800_000..4_102_444_800_000;

/// Largest accepted timestamp step (one day), in milliseconds
pub const MAX_SAMPLE_STEP_MS: u64 = 86_400_000;

/// Logical path of the color readings in the realtime database
pub const DEFAULT_SOURCE_PATH: &str = "/sensor/color";

// ==================== Record Key ====================

/// Arrival key of a raw record
///
/// Keys are compared by their numeric value when they parse as a finite
/// number. Keys that do not parse sort after every numeric key.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordKey {
    raw: String,
    numeric: Option<f64>,
}

impl RecordKey {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let numeric = raw.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        Self { raw, numeric }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn numeric(&self) -> Option<f64> {
        self.numeric
    }

    /// Interpret the key as an epoch-millisecond instant
    ///
    /// Only integral keys inside [`EPOCH_MILLIS_KEY_RANGE`] qualify, so small
    /// sequence numbers such as `"100"` are not read as 1970 instants.
    pub fn as_epoch_millis(&self) -> Option<DateTime<Utc>> {
        let value = self.numeric?;
        if value.fract() != 0.0 {
            return None;
        }
        let millis = value as i64;
        if !EPOCH_MILLIS_KEY_RANGE.contains(&millis) {
            return None;
        }
        DateTime::from_timestamp_millis(millis)
    }

    /// Ordering that puts the newest record first
    ///
    /// Numeric keys descend by value (ties broken by the raw string,
    /// descending), then non-numeric keys descend lexicographically.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.numeric, other.numeric) {
            (Some(a), Some(b)) => b.total_cmp(&a).then_with(|| other.raw.cmp(&self.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => other.raw.cmp(&self.raw),
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for RecordKey {
    fn from(raw: &str) -> Self {
        RecordKey::new(raw)
    }
}

impl From<u64> for RecordKey {
    fn from(value: u64) -> Self {
        RecordKey::new(value.to_string())
    }
}

// ==================== Raw Record ====================

/// One record as delivered by the source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Nested color map (`hex` member); `None` if absent or not an object
    pub hex: Option<Map<String, Value>>,
}

impl RawRecord {
    /// Record with a single color entry
    pub fn with_hex(hex: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("value".to_string(), Value::String(hex.into()));
        Self { hex: Some(map) }
    }

    /// Build from a JSON record value. Anything that is not an object with an
    /// object-valued `hex` member becomes a record without colors.
    pub fn from_value(value: &Value) -> Self {
        let hex = value
            .get("hex")
            .and_then(Value::as_object)
            .cloned();
        Self { hex }
    }

    /// Color carried by this record
    ///
    /// `None` when the nested map is missing or empty (the record contributes
    /// no sample). A first value that is not a string yields [`DEFAULT_HEX`].
    pub fn color(&self) -> Option<String> {
        let first = self.hex.as_ref()?.values().next()?;
        match first.as_str() {
            Some(hex) => Some(hex.to_string()),
            None => {
                tracing::debug!("Record color is not a string ({}), using default", first);
                Some(DEFAULT_HEX.to_string())
            }
        }
    }
}

// ==================== Snapshot ====================

/// Full state of the source path at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(RecordKey, RawRecord)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed JSON document. A non-object root is an empty snapshot.
    pub fn from_value(value: &Value) -> Self {
        let entries = value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (RecordKey::new(k.as_str()), RawRecord::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    /// Parse a JSON document
    pub fn from_json_str(s: &str) -> crate::error::Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(&value))
    }

    pub fn insert(&mut self, key: impl Into<RecordKey>, record: RawRecord) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key.as_str()) {
            slot.1 = record;
        } else {
            self.entries.push((key, record));
        }
    }

    /// Builder-style insert of a single-color record
    pub fn with_color(mut self, key: impl Into<RecordKey>, hex: impl Into<String>) -> Self {
        self.insert(key, RawRecord::with_hex(hex));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(RecordKey, RawRecord)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(RecordKey, RawRecord)> {
        self.entries
    }

    /// Drop all but the `keep` newest entries
    pub fn retain_newest(&mut self, keep: usize) {
        if self.entries.len() <= keep {
            return;
        }
        self.entries.sort_by(|a, b| a.0.cmp_newest_first(&b.0));
        self.entries.truncate(keep);
    }

    /// Serialize back into the source's JSON shape
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for (key, record) in &self.entries {
            let mut obj = Map::new();
            if let Some(hex) = &record.hex {
                obj.insert("hex".to_string(), Value::Object(hex.clone()));
            }
            root.insert(key.as_str().to_string(), Value::Object(obj));
        }
        Value::Object(root)
    }
}

// ==================== Samples and Points ====================

/// A single reading in the sample window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    /// Epoch milliseconds of `timestamp`
    pub id: i64,
    /// Color as delivered (`#RRGGBB` unless the reading was malformed)
    pub hex: String,
    pub timestamp: DateTime<Utc>,
}

impl ColorSample {
    pub fn new(hex: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: timestamp.timestamp_millis(),
            hex: hex.into(),
            timestamp,
        }
    }
}

/// A chart point: time against the decimal color value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub x: DateTime<Utc>,
    /// Base-16 value of the hex digits, `0..=0xFFFFFF`
    pub y: u32,
    /// Formatted civil time (`yyyy-MM-dd HH:mm:ss`)
    pub label: String,
}

impl SeriesPoint {
    /// X as fractional epoch seconds, for plotting
    pub fn x_secs(&self) -> f64 {
        self.x.timestamp_millis() as f64 / 1000.0
    }

    pub fn as_plot_point(&self) -> [f64; 2] {
        [self.x_secs(), self.y as f64]
    }
}

// ==================== Display Count ====================

/// Number of newest samples shown on the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DisplayCount {
    #[default]
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "30")]
    Thirty,
}

impl DisplayCount {
    pub fn all() -> &'static [DisplayCount] {
        &[DisplayCount::Ten, DisplayCount::Twenty, DisplayCount::Thirty]
    }

    pub fn count(&self) -> usize {
        match self {
            DisplayCount::Ten => 10,
            DisplayCount::Twenty => 20,
            DisplayCount::Thirty => 30,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        Self::all().iter().copied().find(|d| d.count() == count)
    }

    pub fn display_name(&self) -> String {
        format!("Show latest {} data points", self.count())
    }
}

impl std::fmt::Display for DisplayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

// ==================== Timestamp Mode ====================

/// How sample timestamps are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampMode {
    /// Fetch instant minus `rank × step`
    #[default]
    Synthetic,
    /// Numeric keys are epoch milliseconds; other keys fall back to synthetic
    SourceKey,
}
