//! Mock snapshot source for running without a sensor.
//!
//! Every interval the worker appends one reading keyed by the current epoch
//! milliseconds, with a random `#RRGGBB` color, and emits the whole
//! accumulated snapshot (the same shape a realtime database delivers).

use super::{SnapshotCallback, SnapshotSource, Subscription};
use crate::error::Result;
use crate::pipeline::error::PipelineError;
use crate::types::{RawRecord, Snapshot};
use chrono::Utc;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::time::Duration;

/// Generates random color readings
pub struct MockSource {
    interval: Duration,
    history: usize,
    seed: u64,
}

impl MockSource {
    pub fn new(interval: Duration, history: usize) -> Self {
        let seed = Utc::now().timestamp_nanos_opt().unwrap_or(12345) as u64 | 1;
        Self {
            interval,
            history: history.max(1),
            seed,
        }
    }

    /// Fix the random seed (reproducible colors)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed | 1;
        self
    }
}

/// Xorshift generator producing 24-bit colors
#[derive(Debug, Clone)]
struct ColorRng {
    state: u64,
}

impl ColorRng {
    fn new(seed: u64) -> Self {
        Self { state: seed | 1 }
    }

    fn next_hex(&mut self) -> String {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        format!("#{:06X}", (s >> 40) & 0xFF_FFFF)
    }
}

/// Accumulated readings, capped at `history` entries
struct MockFeed {
    snapshot: Snapshot,
    rng: ColorRng,
    history: usize,
    last_key: i64,
}

impl MockFeed {
    fn new(seed: u64, history: usize) -> Self {
        Self {
            snapshot: Snapshot::new(),
            rng: ColorRng::new(seed),
            history,
            last_key: 0,
        }
    }

    /// Add a reading at `now_ms` and return the full snapshot
    fn tick(&mut self, now_ms: i64) -> Snapshot {
        // Keys must stay unique even if two ticks share a millisecond
        let key = now_ms.max(self.last_key + 1);
        self.last_key = key;

        let hex = self.rng.next_hex();
        self.snapshot
            .insert(key.to_string().as_str(), RawRecord::with_hex(hex));
        self.snapshot.retain_newest(self.history);
        self.snapshot.clone()
    }
}

impl SnapshotSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn subscribe(&mut self, on_snapshot: SnapshotCallback) -> Result<Subscription> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = self.interval;
        let mut feed = MockFeed::new(self.seed, self.history);

        let handle = std::thread::Builder::new()
            .name("mock-source".to_string())
            .spawn(move || {
                tracing::info!("Mock source generating a reading every {:?}", interval);
                loop {
                    on_snapshot(feed.tick(Utc::now().timestamp_millis()));
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
                tracing::debug!("Mock source stopped");
            })
            .map_err(|e| PipelineError::source_error("mock", format!("spawn failed: {}", e)))?;

        Ok(Subscription::new(move || {
            let _ = stop_tx.send(());
            let _ = handle.join();
        }))
    }
}
