//! Pipeline executor: the update-cycle loop.
//!
//! The pipeline runs on a dedicated thread. Each iteration waits for either:
//! 1. A snapshot from the source → build the window, publish it, notify the UI.
//! 2. A command from the UI.
//!
//! Snapshots are processed one at a time, to completion, in arrival order, so
//! window rebuilds never interleave and the most recent snapshot wins.

use crate::config::AppConfig;
use crate::pipeline::bridge::{PipelineCommand, SinkMessage};
use crate::pipeline::error::PipelineResult;
use crate::pipeline::store::WindowStore;
use crate::pipeline::window::{SampleWindow, SampleWindowBuilder};
use crate::types::Snapshot;
use chrono::{DateTime, Utc};
use crossbeam_channel::{never, select, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long the loop blocks before re-checking the running flag.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Counters kept by the pipeline thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub snapshots_received: u64,
    pub snapshots_ignored: u64,
    pub windows_published: u64,
    pub messages_dropped: u64,
}

/// The update-cycle executor.
pub struct Pipeline {
    builder: SampleWindowBuilder,
    store: WindowStore,
    snapshot_rx: Receiver<Snapshot>,
    cmd_rx: Receiver<PipelineCommand>,
    msg_tx: Sender<SinkMessage>,
    running: Arc<AtomicBool>,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(
        builder: SampleWindowBuilder,
        store: WindowStore,
        snapshot_rx: Receiver<Snapshot>,
        cmd_rx: Receiver<PipelineCommand>,
        msg_tx: Sender<SinkMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            builder,
            store,
            snapshot_rx,
            cmd_rx,
            msg_tx,
            running,
            stats: PipelineStats::default(),
        }
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    // ── Main run loop ──

    /// Run the pipeline until `running` is cleared or Shutdown is received.
    pub fn run(&mut self) {
        tracing::info!("Pipeline thread started");

        while self.running.load(Ordering::Relaxed) {
            let snapshot_rx = self.snapshot_rx.clone();
            let cmd_rx = self.cmd_rx.clone();
            select! {
                recv(snapshot_rx) -> msg => match msg {
                    Ok(snapshot) => {
                        self.handle_snapshot(snapshot, Utc::now());
                    }
                    Err(_) => {
                        tracing::warn!("Snapshot source disconnected; keeping last window");
                        self.send(SinkMessage::SourceError("source disconnected".to_string()));
                        self.snapshot_rx = never();
                    }
                },
                recv(cmd_rx) -> cmd => match cmd {
                    Ok(cmd) => self.handle_command(cmd),
                    Err(_) => {
                        tracing::debug!("Command channel closed, stopping pipeline");
                        self.running.store(false, Ordering::Relaxed);
                    }
                },
                default(IDLE_POLL) => {}
            }
        }

        let _ = self.msg_tx.try_send(SinkMessage::Shutdown);
        tracing::info!(
            "Pipeline thread exiting ({} snapshots, {} windows published)",
            self.stats.snapshots_received,
            self.stats.windows_published
        );
    }

    fn handle_command(&mut self, cmd: PipelineCommand) {
        match cmd {
            PipelineCommand::Republish => {
                let window = self.store.current();
                self.announce(&window);
            }
            PipelineCommand::Shutdown => {
                self.running.store(false, Ordering::Relaxed);
            }
        }
    }

    /// Process one snapshot fetched at `fetched_at`.
    ///
    /// Returns the published window, or `None` if the snapshot carried no
    /// usable records and the previous window was kept.
    pub fn handle_snapshot(
        &mut self,
        snapshot: Snapshot,
        fetched_at: DateTime<Utc>,
    ) -> Option<Arc<SampleWindow>> {
        self.stats.snapshots_received += 1;

        let Some(samples) = self.builder.build(&snapshot, fetched_at) else {
            self.stats.snapshots_ignored += 1;
            tracing::debug!("Ignoring empty snapshot ({} records)", snapshot.len());
            self.send(SinkMessage::SnapshotIgnored);
            return None;
        };

        let window = self.store.publish(samples, fetched_at);
        self.stats.windows_published += 1;
        self.announce(&window);
        Some(window)
    }

    fn announce(&mut self, window: &SampleWindow) {
        self.send(SinkMessage::WindowUpdated {
            version: window.version,
            sample_count: window.len(),
            current_color: window.current_color().map(str::to_string),
        });
    }

    fn send(&mut self, msg: SinkMessage) {
        if self.msg_tx.try_send(msg).is_err() {
            self.stats.messages_dropped += 1;
            if self.stats.messages_dropped % 100 == 1 {
                tracing::warn!(
                    "UI message queue full, dropped {} messages",
                    self.stats.messages_dropped
                );
            }
        }
    }
}

/// Builds a [`Pipeline`] from the application config.
pub struct PipelineBuilder {
    config: AppConfig,
}

impl PipelineBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn build(
        self,
        store: WindowStore,
        snapshot_rx: Receiver<Snapshot>,
        cmd_rx: Receiver<PipelineCommand>,
        msg_tx: Sender<SinkMessage>,
        running: Arc<AtomicBool>,
    ) -> PipelineResult<Pipeline> {
        let builder = SampleWindowBuilder::try_from_config(&self.config.window)?;
        tracing::debug!(
            "Pipeline window capacity {}, step {} ms, {:?} timestamps",
            self.config.window.capacity,
            self.config.window.step_ms,
            self.config.window.timestamp_mode
        );
        Ok(Pipeline::new(
            builder,
            store,
            snapshot_rx,
            cmd_rx,
            msg_tx,
            running,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::bridge::{snapshot_channel, PipelineBridge};
    use chrono::TimeZone;

    fn make_pipeline() -> (Pipeline, PipelineBridge, Sender<Snapshot>) {
        let (bridge, cmd_rx, msg_tx) = PipelineBridge::new();
        let (snap_tx, snap_rx) = snapshot_channel();
        let pipeline = PipelineBuilder::new(AppConfig::default())
            .build(
                WindowStore::new(),
                snap_rx,
                cmd_rx,
                msg_tx,
                Arc::new(AtomicBool::new(true)),
            )
            .unwrap();
        (pipeline, bridge, snap_tx)
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_handle_snapshot_publishes_and_announces() {
        let (mut pipeline, bridge, _tx) = make_pipeline();
        let snapshot = Snapshot::new()
            .with_color("100", "#AABBCC")
            .with_color("200", "#112233");

        let window = pipeline.handle_snapshot(snapshot, at()).unwrap();
        assert_eq!(window.version, 1);
        assert_eq!(pipeline.store().current().current_color(), Some("#112233"));
        assert_eq!(
            bridge.drain(),
            vec![SinkMessage::WindowUpdated {
                version: 1,
                sample_count: 2,
                current_color: Some("#112233".to_string()),
            }]
        );
    }

    #[test]
    fn test_empty_snapshot_keeps_previous_window() {
        let (mut pipeline, bridge, _tx) = make_pipeline();
        pipeline.handle_snapshot(Snapshot::new().with_color("1", "#000001"), at());
        assert!(pipeline.handle_snapshot(Snapshot::new(), at()).is_none());

        let current = pipeline.store().current();
        assert_eq!(current.version, 1);
        assert_eq!(current.current_color(), Some("#000001"));
        assert_eq!(bridge.drain().last(), Some(&SinkMessage::SnapshotIgnored));
        assert_eq!(pipeline.stats().snapshots_ignored, 1);
    }

    #[test]
    fn test_run_processes_in_order_and_stops_on_shutdown() {
        let (mut pipeline, bridge, tx) = make_pipeline();
        let store = pipeline.store().clone();

        tx.send(Snapshot::new().with_color("1", "#000001")).unwrap();
        tx.send(Snapshot::new().with_color("2", "#000002")).unwrap();

        let handle = std::thread::spawn(move || {
            pipeline.run();
            pipeline.stats()
        });

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while store.version() < 2 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        bridge.shutdown();
        let stats = handle.join().unwrap();

        assert_eq!(stats.windows_published, 2);
        assert_eq!(store.current().current_color(), Some("#000002"));
        assert_eq!(bridge.drain().last(), Some(&SinkMessage::Shutdown));
    }

    #[test]
    fn test_republish_announces_current_window() {
        let (mut pipeline, bridge, _tx) = make_pipeline();
        pipeline.handle_snapshot(Snapshot::new().with_color("1", "#000001"), at());
        bridge.drain();

        pipeline.handle_command(PipelineCommand::Republish);
        assert!(matches!(
            bridge.drain().as_slice(),
            [SinkMessage::WindowUpdated { version: 1, .. }]
        ));
    }

    #[test]
    fn test_build_rejects_zero_capacity() {
        let (_bridge, cmd_rx, msg_tx) = PipelineBridge::new();
        let (_snap_tx, snap_rx) = snapshot_channel();
        let mut config = AppConfig::default();
        config.window.capacity = 0;
        let result = PipelineBuilder::new(config).build(
            WindowStore::new(),
            snap_rx,
            cmd_rx,
            msg_tx,
            Arc::new(AtomicBool::new(true)),
        );
        assert!(matches!(result, Err(crate::pipeline::PipelineError::InvalidConfig(_))));
    }
}
