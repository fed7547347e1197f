//! Observable holder of the current sample window.
//!
//! The window is replaced wholesale: `publish` builds a new
//! [`SampleWindow`] and swaps the `Arc` under the write lock, so a reader
//! either sees the previous window or the new one, never a mix. Readers
//! clone the `Arc` and drop the lock immediately.

use crate::pipeline::window::SampleWindow;
use crate::types::ColorSample;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Default)]
struct StoreInner {
    current: RwLock<Arc<SampleWindow>>,
    subscribers: Mutex<Vec<Sender<Arc<SampleWindow>>>>,
}

/// Cloneable handle to the shared window.
#[derive(Clone, Default)]
pub struct WindowStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for WindowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current();
        f.debug_struct("WindowStore")
            .field("version", &current.version)
            .field("samples", &current.len())
            .finish()
    }
}

impl WindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current window.
    pub fn current(&self) -> Arc<SampleWindow> {
        match self.inner.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn version(&self) -> u64 {
        self.current().version
    }

    /// Replace the window with `samples` and notify subscribers.
    pub fn publish(&self, samples: Vec<ColorSample>, built_at: DateTime<Utc>) -> Arc<SampleWindow> {
        let window = {
            let mut guard = match self.inner.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let window = Arc::new(SampleWindow {
                version: guard.version + 1,
                built_at,
                samples,
            });
            *guard = Arc::clone(&window);
            window
        };

        tracing::trace!(
            "Published window v{} ({} samples)",
            window.version,
            window.len()
        );
        self.notify(&window);
        window
    }

    /// Receive every window published from now on.
    pub fn subscribe(&self) -> Receiver<Arc<SampleWindow>> {
        let (tx, rx) = unbounded();
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn notify(&self, window: &Arc<SampleWindow>) {
        if let Ok(mut subs) = self.inner.subscribers.lock() {
            subs.retain(|tx| tx.send(Arc::clone(window)).is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let store = WindowStore::new();
        assert!(store.current().is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_publish_bumps_version_and_replaces() {
        let store = WindowStore::new();
        store.publish(vec![ColorSample::new("#000001", at())], at());
        store.publish(vec![ColorSample::new("#000002", at())], at());

        let current = store.current();
        assert_eq!(current.version, 2);
        assert_eq!(current.current_color(), Some("#000002"));
    }

    #[test]
    fn test_held_snapshot_is_unaffected_by_publish() {
        let store = WindowStore::new();
        store.publish(vec![ColorSample::new("#000001", at())], at());
        let held = store.current();
        store.publish(vec![], at());
        assert_eq!(held.current_color(), Some("#000001"));
    }

    #[test]
    fn test_subscribers_notified_and_pruned() {
        let store = WindowStore::new();
        let rx = store.subscribe();
        let dropped = store.subscribe();
        drop(dropped);

        store.publish(vec![ColorSample::new("#ABCDEF", at())], at());
        let window = rx.try_recv().unwrap();
        assert_eq!(window.version, 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let store = WindowStore::new();
        let other = store.clone();
        other.publish(vec![ColorSample::new("#ABCDEF", at())], at());
        assert_eq!(store.version(), 1);
    }
}
