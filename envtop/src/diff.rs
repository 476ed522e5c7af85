//! Cross-namespace comparison of two resolved environments.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::structs::EnvVarRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffStatus {
    Same,
    ValueDiff,
    OnlyInA,
    OnlyInB,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Same => "SAME",
            DiffStatus::ValueDiff => "VALUE_DIFF",
            DiffStatus::OnlyInA => "ONLY_IN_A",
            DiffStatus::OnlyInB => "ONLY_IN_B",
        }
    }

    fn swapped(self) -> Self {
        match self {
            DiffStatus::OnlyInA => DiffStatus::OnlyInB,
            DiffStatus::OnlyInB => DiffStatus::OnlyInA,
            other => other,
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    pub name: String,
    pub record_a: Option<EnvVarRecord>,
    pub record_b: Option<EnvVarRecord>,
    pub status: DiffStatus,
}

impl DiffResult {
    /// Same comparison seen from the other side.
    pub fn swapped(self) -> Self {
        Self {
            name: self.name,
            record_a: self.record_b,
            record_b: self.record_a,
            status: self.status.swapped(),
        }
    }
}

/// Per-status counts shown above the diff table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub same: usize,
    pub changed: usize,
    pub only_a: usize,
    pub only_b: usize,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.same + self.changed + self.only_a + self.only_b
    }
}

/// Payload of a completed diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub workload_name: String,
    pub namespace_a: String,
    pub namespace_b: String,
    pub results: Vec<DiffResult>,
    pub summary: DiffSummary,
}

impl DiffReport {
    pub fn new(
        workload_name: impl Into<String>,
        namespace_a: impl Into<String>,
        namespace_b: impl Into<String>,
        a: &[EnvVarRecord],
        b: &[EnvVarRecord],
    ) -> Self {
        let results = compare(a, b);
        let summary = summarize(&results);
        Self {
            workload_name: workload_name.into(),
            namespace_a: namespace_a.into(),
            namespace_b: namespace_b.into(),
            results,
            summary,
        }
    }
}

fn values_equal(a: &EnvVarRecord, b: &EnvVarRecord) -> bool {
    if a.is_secret() || b.is_secret() {
        a.hash_prefix == b.hash_prefix
    } else {
        a.display_value == b.display_value
    }
}

/// Compares two resolved lists over the union of names, alphabetically.
pub fn compare(a: &[EnvVarRecord], b: &[EnvVarRecord]) -> Vec<DiffResult> {
    let by_name_a: HashMap<&str, &EnvVarRecord> =
        a.iter().map(|r| (r.name.as_str(), r)).collect();
    let by_name_b: HashMap<&str, &EnvVarRecord> =
        b.iter().map(|r| (r.name.as_str(), r)).collect();

    let names: BTreeSet<&str> = by_name_a.keys().chain(by_name_b.keys()).copied().collect();

    names
        .into_iter()
        .map(|name| {
            let left = by_name_a.get(name).copied();
            let right = by_name_b.get(name).copied();
            let status = match (left, right) {
                (Some(l), Some(r)) if values_equal(l, r) => DiffStatus::Same,
                (Some(_), Some(_)) => DiffStatus::ValueDiff,
                (Some(_), None) => DiffStatus::OnlyInA,
                (None, _) => DiffStatus::OnlyInB,
            };
            DiffResult {
                name: name.to_string(),
                record_a: left.cloned(),
                record_b: right.cloned(),
                status,
            }
        })
        .collect()
}

pub fn summarize(results: &[DiffResult]) -> DiffSummary {
    results
        .iter()
        .fold(DiffSummary::default(), |mut summary, result| {
            match result.status {
                DiffStatus::Same => summary.same += 1,
                DiffStatus::ValueDiff => summary.changed += 1,
                DiffStatus::OnlyInA => summary.only_a += 1,
                DiffStatus::OnlyInB => summary.only_b += 1,
            }
            summary
        })
}
