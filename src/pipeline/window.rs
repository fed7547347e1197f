//! Sample window construction.
//!
//! Turns one unordered [`Snapshot`] into the ordered, capacity-bounded list
//! of [`ColorSample`]s the rest of the pipeline works from:
//!
//! 1. Records without a color are skipped.
//! 2. The rest are sorted newest-first by key (numeric comparison).
//! 3. The first `capacity` are kept.
//! 4. Rank `i` gets timestamp `fetched_at − i × step`.

use crate::config::WindowConfig;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::types::{
    ColorSample, Snapshot, TimestampMode, MAX_SAMPLE_STEP_MS, SAMPLE_STEP_MS, WINDOW_CAPACITY,
};
use chrono::{DateTime, TimeDelta, Utc};

/// Immutable, versioned window of samples, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    pub version: u64,
    pub built_at: DateTime<Utc>,
    pub samples: Vec<ColorSample>,
}

impl SampleWindow {
    /// The window before any snapshot has arrived.
    pub fn empty() -> Self {
        Self {
            version: 0,
            built_at: DateTime::<Utc>::UNIX_EPOCH,
            samples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Hex of the rank-0 sample.
    pub fn current_color(&self) -> Option<&str> {
        self.samples.first().map(|s| s.hex.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorSample> {
        self.samples.iter()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds ordered sample lists from raw snapshots.
#[derive(Debug, Clone)]
pub struct SampleWindowBuilder {
    capacity: usize,
    step: TimeDelta,
    mode: TimestampMode,
}

impl Default for SampleWindowBuilder {
    fn default() -> Self {
        Self {
            capacity: WINDOW_CAPACITY,
            step: TimeDelta::milliseconds(SAMPLE_STEP_MS),
            mode: TimestampMode::Synthetic,
        }
    }
}

impl SampleWindowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from config, rejecting a zero capacity and a step outside
    /// `1..=MAX_SAMPLE_STEP_MS`.
    pub fn try_from_config(config: &WindowConfig) -> PipelineResult<Self> {
        if config.capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if config.step_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "step_ms must be at least 1".to_string(),
            ));
        }
        if config.step_ms > MAX_SAMPLE_STEP_MS {
            return Err(PipelineError::InvalidConfig(format!(
                "step_ms must be at most {}",
                MAX_SAMPLE_STEP_MS
            )));
        }
        Ok(Self {
            capacity: config.capacity,
            step: TimeDelta::milliseconds(config.step_ms as i64),
            mode: config.timestamp_mode,
        })
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_step_ms(mut self, step_ms: i64) -> Self {
        self.step = TimeDelta::milliseconds(step_ms.clamp(1, MAX_SAMPLE_STEP_MS as i64));
        self
    }

    pub fn with_timestamp_mode(mut self, mode: TimestampMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build the ordered sample list for one snapshot.
    ///
    /// Returns `None` for an empty snapshot, or one where no record carries
    /// a color; the caller keeps its previous window in that case. Samples
    /// whose timestamp would fall outside chrono's range are dropped along
    /// with every older rank.
    pub fn build(&self, snapshot: &Snapshot, fetched_at: DateTime<Utc>) -> Option<Vec<ColorSample>> {
        if snapshot.is_empty() {
            return None;
        }

        let mut colored: Vec<_> = snapshot
            .entries()
            .iter()
            .filter_map(|(key, record)| record.color().map(|hex| (key, hex)))
            .collect();

        let skipped = snapshot.len() - colored.len();
        if skipped > 0 {
            tracing::debug!("Skipped {} records without a color value", skipped);
        }
        if colored.is_empty() {
            return None;
        }

        colored.sort_by(|a, b| a.0.cmp_newest_first(b.0));
        colored.truncate(self.capacity);

        let ranked = colored.len();
        let samples: Vec<ColorSample> = colored
            .into_iter()
            .enumerate()
            .map_while(|(rank, (key, hex))| {
                let timestamp = match self.mode {
                    TimestampMode::Synthetic => self.synthetic_timestamp(fetched_at, rank)?,
                    TimestampMode::SourceKey => match key.as_epoch_millis() {
                        Some(instant) => instant,
                        None => self.synthetic_timestamp(fetched_at, rank)?,
                    },
                };
                Some(ColorSample::new(hex, timestamp))
            })
            .collect();

        if samples.len() < ranked {
            tracing::warn!(
                "Dropped {} samples whose timestamps are out of range",
                ranked - samples.len()
            );
        }
        if samples.is_empty() {
            return None;
        }
        Some(samples)
    }

    /// `fetched_at − rank × step`, or `None` when out of range
    fn synthetic_timestamp(&self, fetched_at: DateTime<Utc>, rank: usize) -> Option<DateTime<Utc>> {
        let rank = i32::try_from(rank).ok()?;
        let offset = self.step.checked_mul(rank)?;
        fetched_at.checked_sub_signed(offset)
    }
}
