//! Missing/Warning Tracker.

use std::collections::BTreeMap;

use anthro_model::{StandardKey, WarningEntry, WarningReason, WarningSink};

/// Accumulates every warning of one run, in emission order.
#[derive(Debug, Clone, Default)]
pub struct WarningTracker {
    entries: Vec<WarningEntry>,
}

impl WarningTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WarningEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<WarningEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append the entries of a tracker filled elsewhere (e.g. a worker).
    pub fn merge(&mut self, other: WarningTracker) {
        self.entries.extend(other.entries);
    }

    /// Counts grouped by `(standard_key, reason)`.
    pub fn group_counts(&self) -> BTreeMap<(Option<StandardKey>, WarningReason), usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.group_key()).or_insert(0) += 1;
        }
        counts
    }

    pub fn reason_counts(&self) -> BTreeMap<WarningReason, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.reason).or_insert(0) += 1;
        }
        counts
    }
}

impl WarningSink for WarningTracker {
    fn record(&mut self, entry: WarningEntry) {
        self.entries.push(entry);
    }
}
