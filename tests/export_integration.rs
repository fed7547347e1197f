//! Integration tests for the CSV report
//!
//! Covers the exact document layout, empty-window handling and writing the
//! report to disk.

mod common;

use colorvis_rs::pipeline::{
    ExportOutcome, ReportExporter, SampleWindowBuilder, WindowStore, EXPORT_FILE_NAME,
};
use colorvis_rs::types::Snapshot;
use common::builders::SnapshotBuilder;
use common::fixed_instant;
use std::sync::Arc;

fn publish(snapshot: &Snapshot) -> Arc<colorvis_rs::SampleWindow> {
    let store = WindowStore::new();
    let at = fixed_instant();
    let samples = SampleWindowBuilder::new()
        .build(snapshot, at)
        .expect("snapshot has samples");
    store.publish(samples, at)
}

#[test]
fn test_three_sample_report_structure() {
    let window = publish(
        &SnapshotBuilder::new()
            .color(1, "#FF0000")
            .color(2, "#00FF00")
            .color(3, "#0000FF")
            .build(),
    );

    let report = ReportExporter::default()
        .render(&window, fixed_instant())
        .expect("report");
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines.len(), 4 + 1 + 3);
    assert_eq!(lines[0], "Color Sensor Data Export");
    assert_eq!(lines[1], "Generated on: 2024-01-01 07:00:00");
    assert_eq!(lines[2], "Data shows color readings over time");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "Time,Hex,Decimal,R,G,B,H,S,L");
    for row in &lines[5..] {
        assert_eq!(row.split(',').count(), 9, "row: {}", row);
    }
    assert!(report.ends_with('\n'));
}

#[test]
fn test_report_rows_keep_window_order() {
    let window = publish(
        &SnapshotBuilder::new()
            .color(1, "#FF0000")
            .color(2, "#00FF00")
            .color(3, "#0000FF")
            .build(),
    );

    let report = ReportExporter::default()
        .render(&window, fixed_instant())
        .expect("report");
    let rows: Vec<&str> = report.lines().skip(5).collect();

    assert_eq!(rows[0], "2024-01-01 07:00:00,#0000FF,255,0,0,255,240,100,50");
    assert_eq!(rows[1], "2024-01-01 06:59:55,#00FF00,65280,0,255,0,120,100,50");
    assert_eq!(rows[2], "2024-01-01 06:59:50,#FF0000,16711680,255,0,0,0,100,50");
}

#[test]
fn test_malformed_and_missing_colors_in_report() {
    let window = publish(
        &SnapshotBuilder::new()
            .color(1, "not-a-color")
            .non_string_color(2)
            .build(),
    );

    let report = ReportExporter::default()
        .render(&window, fixed_instant())
        .expect("report");
    let rows: Vec<&str> = report.lines().skip(5).collect();

    assert_eq!(rows[0], "2024-01-01 07:00:00,#000000,0,0,0,0,0,0,0");
    assert_eq!(rows[1], "2024-01-01 06:59:55,not-a-color,0,0,0,0,0,0,0");
}

#[test]
fn test_empty_window_produces_no_file() {
    let store = WindowStore::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);

    let exporter = ReportExporter::default();
    assert!(exporter.render(&store.current(), fixed_instant()).is_none());

    let outcome = exporter
        .export_to_path(&store.current(), fixed_instant(), &path)
        .unwrap();
    assert_eq!(outcome, ExportOutcome::Skipped);
    assert!(!path.exists());
}

#[test]
fn test_export_to_path_matches_render() {
    let window = publish(&SnapshotBuilder::new().sequential(12).build());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);

    let exporter = ReportExporter::default();
    let outcome = exporter
        .export_to_path(&window, fixed_instant(), &path)
        .unwrap();
    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: path.clone(),
            rows: 12
        }
    );

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(Some(written), exporter.render(&window, fixed_instant()));
}

#[test]
fn test_export_into_missing_directory_fails() {
    let window = publish(&SnapshotBuilder::new().sequential(1).build());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join(EXPORT_FILE_NAME);

    let result = ReportExporter::default().export_to_path(&window, fixed_instant(), &path);
    assert!(result.is_err());
}
