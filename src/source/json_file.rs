//! Snapshot source backed by a JSON document on disk.
//!
//! The worker thread re-reads the file every poll interval and emits the
//! snapshot at the configured path whenever the file content changes. Read
//! or parse failures are logged and polling continues.

use super::{SnapshotCallback, SnapshotSource, Subscription};
use crate::error::Result;
use crate::pipeline::error::PipelineError;
use crate::types::Snapshot;
use crossbeam_channel::{bounded, RecvTimeoutError};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Polls a JSON document for snapshots
pub struct JsonFileSource {
    file: PathBuf,
    path: String,
    interval: Duration,
}

impl JsonFileSource {
    pub fn new(file: impl Into<PathBuf>, path: impl Into<String>, interval: Duration) -> Self {
        Self {
            file: file.into(),
            path: path.into(),
            interval,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Find the snapshot for `path` inside `doc`.
///
/// `path` is a JSON pointer such as `/sensor/color`; an empty path or `/`
/// means the root. When the pointer does not resolve but the root already
/// looks like a snapshot (records with a `hex` member), the root is used.
pub fn resolve_snapshot(doc: &Value, path: &str) -> Option<Snapshot> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some(Snapshot::from_value(doc));
    }
    let pointer = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    if let Some(value) = doc.pointer(&pointer) {
        return Some(Snapshot::from_value(value));
    }

    let root_is_snapshot = doc
        .as_object()
        .map(|obj| !obj.is_empty() && obj.values().all(|v| v.get("hex").is_some()))
        .unwrap_or(false);
    root_is_snapshot.then(|| Snapshot::from_value(doc))
}

struct Poller {
    file: PathBuf,
    path: String,
    last_content: Option<String>,
}

impl Poller {
    /// Returns a snapshot when the file changed and resolves to one.
    fn poll(&mut self) -> Option<Snapshot> {
        let content = match std::fs::read_to_string(&self.file) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read snapshot file {:?}: {}", self.file, e);
                return None;
            }
        };
        if self.last_content.as_deref() == Some(content.as_str()) {
            return None;
        }

        // Remembered before parsing so a malformed file is reported once
        let parsed = serde_json::from_str::<Value>(&content);
        self.last_content = Some(content);
        let doc = match parsed {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Failed to parse snapshot file {:?}: {}", self.file, e);
                return None;
            }
        };

        let snapshot = resolve_snapshot(&doc, &self.path);
        if snapshot.is_none() {
            tracing::warn!("Path {} not found in {:?}", self.path, self.file);
        }
        snapshot
    }
}

impl SnapshotSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn subscribe(&mut self, on_snapshot: SnapshotCallback) -> Result<Subscription> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = self.interval;
        let mut poller = Poller {
            file: self.file.clone(),
            path: self.path.clone(),
            last_content: None,
        };

        let handle = std::thread::Builder::new()
            .name("json-file-source".to_string())
            .spawn(move || {
                tracing::info!("Polling {:?} every {:?}", poller.file, interval);
                loop {
                    if let Some(snapshot) = poller.poll() {
                        tracing::debug!("Snapshot file changed ({} records)", snapshot.len());
                        on_snapshot(snapshot);
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
                tracing::debug!("JSON file source stopped");
            })
            .map_err(|e| PipelineError::source_error("json-file", format!("spawn failed: {}", e)))?;

        Ok(Subscription::new(move || {
            let _ = stop_tx.send(());
            let _ = handle.join();
        }))
    }
}
