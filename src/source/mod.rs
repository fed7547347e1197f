//! Snapshot sources
//!
//! A source pushes full [`Snapshot`]s of the sensor path to whoever
//! subscribed. Delivery is push-based: the pipeline never blocks waiting on
//! a source, it only drains the channel the callback forwards into.
//!
//! # Implementations
//!
//! - [`ManualSource`] - In-process source; snapshots are pushed by the caller
//! - [`JsonFileSource`] - Polls a JSON document (e.g. a database export)
//! - [`MockSource`] - Generates random readings on an interval
//!
//! # Example
//!
//! ```ignore
//! use colorvis_rs::pipeline::snapshot_channel;
//! use colorvis_rs::source::{forward_to, MockSource, SnapshotSource};
//!
//! let (tx, rx) = snapshot_channel();
//! let mut source = MockSource::new(Duration::from_secs(5), 200);
//! let subscription = source.subscribe(forward_to(tx, rx.clone()))?;
//! // ... later
//! subscription.unsubscribe();
//! ```

pub mod json_file;
pub mod manual;
pub mod mock;

pub use json_file::JsonFileSource;
pub use manual::ManualSource;
pub use mock::MockSource;

use crate::config::{SourceConfig, SourceKind};
use crate::error::{ColorVisError, Result};
use crate::types::Snapshot;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::time::Duration;

/// Callback invoked with each full snapshot
pub type SnapshotCallback = Box<dyn Fn(Snapshot) + Send + Sync + 'static>;

/// A push source of snapshots
pub trait SnapshotSource: Send {
    /// Human-readable name for logs and the status line
    fn name(&self) -> &str;

    /// Start delivering snapshots to `on_snapshot`
    fn subscribe(&mut self, on_snapshot: SnapshotCallback) -> Result<Subscription>;
}

/// Handle returned by [`SnapshotSource::subscribe`]
///
/// Dropping the handle unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery. For threaded sources this joins the worker, so no
    /// callback runs after it returns.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Callback that forwards snapshots into a channel without blocking
///
/// `rx` is a handle on the same channel. When the channel is full the oldest
/// queued snapshot is evicted so the newest one is always delivered.
pub fn forward_to(tx: Sender<Snapshot>, rx: Receiver<Snapshot>) -> SnapshotCallback {
    Box::new(move |snapshot| {
        let mut pending = snapshot;
        loop {
            match tx.try_send(pending) {
                Ok(()) => return,
                Err(TrySendError::Full(snapshot)) => {
                    if rx.try_recv().is_ok() {
                        tracing::debug!("Snapshot channel full, evicted oldest snapshot");
                    }
                    pending = snapshot;
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!("Snapshot channel closed");
                    return;
                }
            }
        }
    })
}

/// Build the source selected in the config
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn SnapshotSource>> {
    match config.kind {
        SourceKind::Mock => Ok(Box::new(MockSource::new(
            Duration::from_millis(config.mock_interval_ms.max(1)),
            config.mock_history,
        ))),
        SourceKind::JsonFile => {
            let file = config.file.clone().ok_or_else(|| {
                ColorVisError::Config("source.file is required for json-file sources".to_string())
            })?;
            Ok(Box::new(JsonFileSource::new(
                file,
                config.path.clone(),
                Duration::from_millis(config.poll_interval_ms.max(1)),
            )))
        }
    }
}
