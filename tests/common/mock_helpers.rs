//! Pipeline harness for end-to-end tests

use super::test_timeout;
use colorvis_rs::config::AppConfig;
use colorvis_rs::pipeline::{
    snapshot_channel, PipelineBridge, PipelineBuilder, SampleWindow, SinkMessage, WindowStore,
};
use colorvis_rs::source::{forward_to, ManualSource, SnapshotSource, Subscription};
use colorvis_rs::types::Snapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// A running pipeline thread fed by a [`ManualSource`]
pub struct PipelineHarness {
    pub source: ManualSource,
    pub store: WindowStore,
    pub bridge: PipelineBridge,
    running: Arc<AtomicBool>,
    subscription: Option<Subscription>,
    handle: Option<JoinHandle<()>>,
}

impl PipelineHarness {
    pub fn start(config: AppConfig) -> Self {
        let store = WindowStore::new();
        let (bridge, cmd_rx, msg_tx) = PipelineBridge::new();
        let (snapshot_tx, snapshot_rx) = snapshot_channel();
        let evict_rx = snapshot_rx.clone();
        let running = Arc::new(AtomicBool::new(true));

        let mut pipeline = PipelineBuilder::new(config)
            .build(store.clone(), snapshot_rx, cmd_rx, msg_tx, running.clone())
            .expect("valid pipeline config");
        let handle = std::thread::spawn(move || pipeline.run());

        let mut source = ManualSource::new();
        let subscription = source
            .subscribe(forward_to(snapshot_tx, evict_rx))
            .expect("manual subscribe");

        Self {
            source,
            store,
            bridge,
            running,
            subscription: Some(subscription),
            handle: Some(handle),
        }
    }

    pub fn push(&self, snapshot: Snapshot) {
        self.source.push(snapshot);
    }

    /// Wait until the store reaches `version`
    pub fn wait_for_version(&self, version: u64) -> Option<Arc<SampleWindow>> {
        let deadline = Instant::now() + test_timeout();
        while Instant::now() < deadline {
            if self.store.version() >= version {
                return Some(self.store.current());
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        None
    }

    /// Wait for the first message matching `pred`
    pub fn wait_for_message(&self, pred: impl Fn(&SinkMessage) -> bool) -> Option<SinkMessage> {
        let deadline = Instant::now() + test_timeout();
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.bridge.msg_rx.recv_timeout(remaining) {
                Ok(msg) if pred(&msg) => return Some(msg),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Stop the source and the pipeline thread
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.bridge.shutdown();
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.join().expect("pipeline thread panicked");
        }
    }
}

impl Drop for PipelineHarness {
    fn drop(&mut self) {
        self.stop();
    }
}
