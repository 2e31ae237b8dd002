// Dweve Trialbench - Iterated Query Benchmark Harness
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Trial aggregation and statistics computation.
//!
//! Groups [`TrialRow`]s by (variant, case) across every iteration of a run
//! and summarizes each group's latency and buffer counters.

use crate::core::record::{GroupKey, TrialRow};
use crate::core::stats::{summarize, SummaryStats};
use std::collections::HashMap;

/// Metrics tracked per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Execution latency (`exec_ms`).
    ExecMs,
    /// Shared buffer reads (`shared_read`).
    SharedRead,
    /// Shared buffer hits (`shared_hit`).
    SharedHit,
}

impl Metric {
    /// All tracked metrics in report order.
    pub const ALL: [Metric; 3] = [Metric::ExecMs, Metric::SharedRead, Metric::SharedHit];

    /// Column prefix used in the flat summary.
    pub fn prefix(&self) -> &'static str {
        match self {
            Metric::ExecMs => "exec",
            Metric::SharedRead => "read",
            Metric::SharedHit => "hit",
        }
    }

    fn value(&self, row: &TrialRow) -> Option<f64> {
        match self {
            Metric::ExecMs => row.exec_ms,
            Metric::SharedRead => row.shared_read.map(|v| v as f64),
            Metric::SharedHit => row.shared_hit.map(|v| v as f64),
        }
    }
}

/// First-seen categorical data of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMetadata {
    /// Case category.
    pub category: String,
    /// Parties in the case.
    pub party_count: Option<u64>,
    /// Services in the case.
    pub service_count: Option<u64>,
}

#[derive(Debug, Clone)]
struct Bucket {
    key: GroupKey,
    metadata: GroupMetadata,
    samples: [Vec<f64>; 3],
}

/// Summarized statistics of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Group identity.
    pub key: GroupKey,
    /// First-seen metadata.
    pub metadata: GroupMetadata,
    /// Latency statistics.
    pub exec: SummaryStats,
    /// Shared read statistics.
    pub read: SummaryStats,
    /// Shared hit statistics.
    pub hit: SummaryStats,
    /// Largest sample size over the three metrics.
    pub count: usize,
}

impl GroupSummary {
    /// Statistics for `metric`.
    pub fn stats(&self, metric: Metric) -> &SummaryStats {
        match metric {
            Metric::ExecMs => &self.exec,
            Metric::SharedRead => &self.read,
            Metric::SharedHit => &self.hit,
        }
    }
}

/// Accumulates trial rows for one run.
///
/// Groups are reported in the order their key was first folded.
///
/// # Example
///
/// ```
/// use trialbench::core::TrialRow;
/// use trialbench::harness::Aggregator;
///
/// let mut agg = Aggregator::new();
/// for ms in [10.0, 30.0] {
///     agg.fold(&TrialRow {
///         variant: "v1".into(),
///         case: "c1".into(),
///         exec_ms: Some(ms),
///         ..Default::default()
///     });
/// }
/// let groups = agg.finalize();
/// assert_eq!(groups[0].exec.avg, 20.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    buckets: Vec<Bucket>,
    index: HashMap<GroupKey, usize>,
    folded: usize,
    dropped: usize,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one row into its group.
    ///
    /// Rows without a variant or case are dropped. Metadata is taken from the
    /// first row of each group; later rows only contribute samples.
    pub fn fold(&mut self, row: &TrialRow) {
        let Some(key) = row.key() else {
            self.dropped += 1;
            return;
        };

        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                self.buckets.push(Bucket {
                    key: key.clone(),
                    metadata: GroupMetadata {
                        category: row.category.clone(),
                        party_count: row.party_count,
                        service_count: row.service_count,
                    },
                    samples: Default::default(),
                });
                self.index.insert(key, self.buckets.len() - 1);
                self.buckets.len() - 1
            }
        };

        let bucket = &mut self.buckets[pos];
        for (sample, metric) in bucket.samples.iter_mut().zip(Metric::ALL) {
            if let Some(value) = metric.value(row) {
                sample.push(value);
            }
        }
        self.folded += 1;
    }

    /// Folds every row of `rows`.
    pub fn fold_all<'a>(&mut self, rows: impl IntoIterator<Item = &'a TrialRow>) {
        for row in rows {
            self.fold(row);
        }
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no row has been grouped.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Rows accepted into a group.
    pub fn folded_rows(&self) -> usize {
        self.folded
    }

    /// Rows dropped for lack of a variant or case.
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    /// Raw sample of `metric` for `key`.
    pub fn sample(&self, key: &GroupKey, metric: Metric) -> Option<&[f64]> {
        let pos = *self.index.get(key)?;
        let slot = Metric::ALL.iter().position(|m| *m == metric)?;
        Some(self.buckets[pos].samples[slot].as_slice())
    }

    /// Summarizes every group, in first-seen order.
    pub fn finalize(&self) -> Vec<GroupSummary> {
        self.buckets
            .iter()
            .map(|bucket| {
                let [exec, read, hit] = &bucket.samples;
                GroupSummary {
                    key: bucket.key.clone(),
                    metadata: bucket.metadata.clone(),
                    exec: summarize(exec),
                    read: summarize(read),
                    hit: summarize(hit),
                    count: exec.len().max(read.len()).max(hit.len()),
                }
            })
            .collect()
    }
}
