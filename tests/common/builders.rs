//! Test data builders for creating test objects

use colorvis_rs::types::{RawRecord, Snapshot};
use serde_json::{json, Map, Value};

/// Builder for source snapshots
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record with a single color under `key`
    pub fn color(mut self, key: impl ToString, hex: &str) -> Self {
        self.snapshot = self.snapshot.with_color(key.to_string().as_str(), hex);
        self
    }

    /// `count` readings keyed `1..=count` with distinct colors
    pub fn sequential(mut self, count: u64) -> Self {
        for i in 1..=count {
            self = self.color(i, &format!("#{:06X}", i));
        }
        self
    }

    /// Record whose `hex` map is empty (contributes no sample)
    pub fn empty_record(mut self, key: impl ToString) -> Self {
        self.snapshot.insert(
            key.to_string().as_str(),
            RawRecord {
                hex: Some(Map::new()),
            },
        );
        self
    }

    /// Record whose first color value is not a string
    pub fn non_string_color(mut self, key: impl ToString) -> Self {
        let mut map = Map::new();
        map.insert("value".to_string(), json!(42));
        self.snapshot.insert(key.to_string().as_str(), RawRecord { hex: Some(map) });
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }

    /// The snapshot as the JSON document a source would deliver
    pub fn build_value(self) -> Value {
        self.snapshot.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = SnapshotBuilder::new()
            .sequential(3)
            .empty_record(10)
            .build();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.entries()[0].0.as_str(), "1");
    }
}
