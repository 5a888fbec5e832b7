//! Aggregation model: accumulate count and latency per query shape.

pub mod report;

pub use report::{ReportRow, build_report};

use crate::signature::OperationKind;
use std::collections::BTreeMap;

/// Identity of one slow query shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignatureKey {
    pub namespace: String,
    pub kind: OperationKind,
    pub signature: String,
}

/// Running totals for one [`SignatureKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateRecord {
    pub count: u64,
    pub total_duration_ms: u64,
}

impl AggregateRecord {
    pub fn average_duration_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / self.count as f64
    }

    fn absorb(&mut self, other: AggregateRecord) {
        self.count += other.count;
        self.total_duration_ms = self.total_duration_ms.saturating_add(other.total_duration_ms);
    }
}

/// Per-shape totals for one analysis pass.
///
/// Merging is commutative and associative: any permutation or sharding of
/// the same records ends in the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    entries: BTreeMap<SignatureKey, AggregateRecord>,
}

impl Aggregator {
    /// Count one occurrence of `key` taking `duration_ms`.
    pub fn merge(&mut self, key: SignatureKey, duration_ms: u64) {
        self.entries.entry(key).or_default().absorb(AggregateRecord {
            count: 1,
            total_duration_ms: duration_ms,
        });
    }

    /// Fold a partial aggregate (e.g. from another log file) into this one.
    pub fn absorb(&mut self, other: Aggregator) {
        for (key, record) in other.entries {
            self.entries.entry(key).or_default().absorb(record);
        }
    }

    pub fn get(&self, key: &SignatureKey) -> Option<&AggregateRecord> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SignatureKey, &AggregateRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
