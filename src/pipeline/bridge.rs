//! Thread boundary between the pipeline (backend) and the UI (frontend).
//!
//! The UI sends [`PipelineCommand`]s and drains [`SinkMessage`]s. Window
//! contents themselves travel through the shared
//! [`WindowStore`](crate::pipeline::store::WindowStore); messages only
//! announce that a new version is available.

use crate::types::Snapshot;
use crossbeam_channel::{bounded, Receiver, Sender};

/// Messages sent from the pipeline thread to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    /// A new window was published.
    WindowUpdated {
        version: u64,
        sample_count: usize,
        current_color: Option<String>,
    },

    /// A snapshot arrived without any usable record; the window was kept.
    SnapshotIgnored,

    /// The snapshot source reported a problem.
    SourceError(String),

    /// Pipeline is shutting down.
    Shutdown,
}

/// Commands sent from the UI thread to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineCommand {
    /// Re-announce the current window (e.g. after the UI reconnects).
    Republish,
    /// Shut down the pipeline thread.
    Shutdown,
}

/// Channel capacity for commands (UI → pipeline).
const CMD_CHANNEL_CAPACITY: usize = 64;
/// Channel capacity for messages (pipeline → UI).
const MSG_CHANNEL_CAPACITY: usize = 1_024;
/// Channel capacity for snapshots (source → pipeline).
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// UI-side handle for communicating with the pipeline thread.
pub struct PipelineBridge {
    pub cmd_tx: Sender<PipelineCommand>,
    pub msg_rx: Receiver<SinkMessage>,
}

impl PipelineBridge {
    /// Create a new bridge pair: `(bridge_for_ui, cmd_rx, msg_tx)`.
    ///
    /// The pipeline thread owns `cmd_rx` and `msg_tx`.
    pub fn new() -> (Self, Receiver<PipelineCommand>, Sender<SinkMessage>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (Self { cmd_tx, msg_rx }, cmd_rx, msg_tx)
    }

    /// Drain all pending messages.
    pub fn drain(&self) -> Vec<SinkMessage> {
        let mut msgs = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            msgs.push(msg);
        }
        msgs
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<SinkMessage> {
        self.msg_rx.try_recv().ok()
    }

    pub fn send_command(&self, cmd: PipelineCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn republish(&self) {
        let _ = self.cmd_tx.send(PipelineCommand::Republish);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(PipelineCommand::Shutdown);
    }
}

/// Channel carrying snapshots from a source callback to the pipeline thread.
pub fn snapshot_channel() -> (Sender<Snapshot>, Receiver<Snapshot>) {
    bounded(SNAPSHOT_CHANNEL_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_collects_pending_messages() {
        let (bridge, _cmd_rx, msg_tx) = PipelineBridge::new();
        msg_tx.send(SinkMessage::SnapshotIgnored).unwrap();
        msg_tx.send(SinkMessage::Shutdown).unwrap();
        assert_eq!(
            bridge.drain(),
            vec![SinkMessage::SnapshotIgnored, SinkMessage::Shutdown]
        );
        assert!(bridge.try_recv().is_none());
    }

    #[test]
    fn test_commands_reach_pipeline_side() {
        let (bridge, cmd_rx, _msg_tx) = PipelineBridge::new();
        bridge.republish();
        bridge.shutdown();
        assert_eq!(cmd_rx.try_recv(), Ok(PipelineCommand::Republish));
        assert_eq!(cmd_rx.try_recv(), Ok(PipelineCommand::Shutdown));
    }
}
