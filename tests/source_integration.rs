//! Integration tests for snapshot sources feeding the pipeline
//!
//! - JSON file source polling a database export
//! - mock source generating readings
//! - source construction from config

mod common;

use colorvis_rs::config::{AppConfig, SourceConfig, SourceKind};
use colorvis_rs::pipeline::{snapshot_channel, PipelineBridge, PipelineBuilder, WindowStore};
use colorvis_rs::source::{self, forward_to, JsonFileSource, MockSource, SnapshotSource};
use common::builders::SnapshotBuilder;
use common::test_timeout;
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn wait_for_version(store: &WindowStore, version: u64) -> bool {
    let deadline = Instant::now() + test_timeout();
    while Instant::now() < deadline {
        if store.version() >= version {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_json_file_source_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("database.json");
    let colors = SnapshotBuilder::new()
        .color(100, "#AABBCC")
        .color(200, "#112233")
        .build_value();
    std::fs::write(&file, json!({ "sensor": { "color": colors } }).to_string()).unwrap();

    let store = WindowStore::new();
    let (_bridge, cmd_rx, msg_tx) = PipelineBridge::new();
    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let evict_rx = snapshot_rx.clone();
    let running = Arc::new(AtomicBool::new(true));
    let mut pipeline = PipelineBuilder::new(AppConfig::default())
        .build(store.clone(), snapshot_rx, cmd_rx, msg_tx, running.clone())
        .unwrap();
    let handle = std::thread::spawn(move || pipeline.run());

    let mut source = JsonFileSource::new(&file, "/sensor/color", Duration::from_millis(10));
    let subscription = source.subscribe(forward_to(snapshot_tx, evict_rx)).unwrap();

    assert!(wait_for_version(&store, 1));
    assert_eq!(store.current().current_color(), Some("#112233"));

    // A new reading appended to the document produces a new window
    let colors = SnapshotBuilder::new()
        .color(100, "#AABBCC")
        .color(200, "#112233")
        .color(300, "#445566")
        .build_value();
    std::fs::write(&file, json!({ "sensor": { "color": colors } }).to_string()).unwrap();

    assert!(wait_for_version(&store, 2));
    let window = store.current();
    assert_eq!(window.len(), 3);
    assert_eq!(window.current_color(), Some("#445566"));

    subscription.unsubscribe();
    running.store(false, std::sync::atomic::Ordering::Relaxed);
    handle.join().unwrap();
}

#[test]
fn test_mock_source_accumulates_readings() {
    let (tx, rx) = snapshot_channel();
    let mut source = MockSource::new(Duration::from_millis(5), 3).with_seed(1);
    let subscription = source.subscribe(forward_to(tx, rx.clone())).unwrap();

    let mut sizes = Vec::new();
    for _ in 0..5 {
        sizes.push(rx.recv_timeout(test_timeout()).unwrap().len());
    }
    subscription.unsubscribe();

    assert_eq!(&sizes[..3], &[1, 2, 3]);
    assert!(sizes[3..].iter().all(|&n| n == 3));
}

#[test]
fn test_source_from_config() {
    let mock = source::from_config(&SourceConfig::default()).unwrap();
    assert_eq!(mock.name(), "mock");

    let config = SourceConfig {
        kind: SourceKind::JsonFile,
        file: Some("database.json".into()),
        ..SourceConfig::default()
    };
    let json_source = source::from_config(&config).unwrap();
    assert_eq!(json_source.name(), "json-file");
}
