//! In-process snapshot source.
//!
//! Snapshots pushed with [`ManualSource::push`] are delivered synchronously
//! on the caller's thread to every live subscriber.

use super::{SnapshotCallback, SnapshotSource, Subscription};
use crate::error::Result;
use crate::types::Snapshot;
use std::sync::{Arc, Mutex};

type Subscribers = Arc<Mutex<Vec<(u64, Arc<SnapshotCallback>)>>>;

/// A source fed by the embedding code
#[derive(Clone, Default)]
pub struct ManualSource {
    subscribers: Subscribers,
    next_id: Arc<Mutex<u64>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a snapshot to every subscriber. Returns how many received it.
    pub fn push(&self, snapshot: Snapshot) -> usize {
        // Callbacks run outside the lock so they may unsubscribe
        let callbacks: Vec<Arc<SnapshotCallback>> = match self.subscribers.lock() {
            Ok(subs) => subs.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            Err(_) => return 0,
        };
        for cb in &callbacks {
            cb(snapshot.clone());
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl SnapshotSource for ManualSource {
    fn name(&self) -> &str {
        "manual"
    }

    fn subscribe(&mut self, on_snapshot: SnapshotCallback) -> Result<Subscription> {
        let id = match self.next_id.lock() {
            Ok(mut next) => {
                *next += 1;
                *next
            }
            Err(_) => 0,
        };
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push((id, Arc::new(on_snapshot)));
        }

        let subscribers = Arc::clone(&self.subscribers);
        Ok(Subscription::new(move || {
            if let Ok(mut subs) = subscribers.lock() {
                subs.retain(|(sub_id, _)| *sub_id != id);
            }
        }))
    }
}
