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

//! Flat summary table (`summary.csv`).
//!
//! One record per group with metadata plus avg/min/max/p50/p95/p99 of the
//! three tracked metrics. Latency uses four decimals, counter averages two
//! and the remaining counter statistics none. Empty samples render blank.

use crate::error::{BenchError, Result};
use crate::harness::aggregator::{GroupSummary, Metric};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column order of the flat summary.
pub const SUMMARY_COLUMNS: [&str; 23] = [
    "variant",
    "case",
    "category",
    "party_count",
    "service_count",
    "exec_avg",
    "exec_min",
    "exec_max",
    "exec_p50",
    "exec_p95",
    "exec_p99",
    "read_avg",
    "read_min",
    "read_max",
    "read_p50",
    "read_p95",
    "read_p99",
    "hit_avg",
    "hit_min",
    "hit_max",
    "hit_p50",
    "hit_p95",
    "hit_p99",
];

/// One formatted summary record. Field order matches [`SUMMARY_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub variant: String,
    pub case: String,
    pub category: String,
    pub party_count: String,
    pub service_count: String,
    pub exec_avg: String,
    pub exec_min: String,
    pub exec_max: String,
    pub exec_p50: String,
    pub exec_p95: String,
    pub exec_p99: String,
    pub read_avg: String,
    pub read_min: String,
    pub read_max: String,
    pub read_p50: String,
    pub read_p95: String,
    pub read_p99: String,
    pub hit_avg: String,
    pub hit_min: String,
    pub hit_max: String,
    pub hit_p50: String,
    pub hit_p95: String,
    pub hit_p99: String,
}

/// Formats `value` with fixed decimals; `NaN` becomes an empty string.
pub fn format_stat(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Formatted avg/min/max/p50/p95/p99 of one metric.
fn metric_cells(group: &GroupSummary, metric: Metric) -> [String; 6] {
    let stats = group.stats(metric);
    let (avg_decimals, other_decimals) = match metric {
        Metric::ExecMs => (4, 4),
        Metric::SharedRead | Metric::SharedHit => (2, 0),
    };
    let mut cells = stats.fields().map(|v| format_stat(v, other_decimals));
    cells[0] = format_stat(stats.avg, avg_decimals);
    cells
}

impl SummaryRecord {
    /// Formats one group.
    pub fn from_group(group: &GroupSummary) -> Self {
        let [exec_avg, exec_min, exec_max, exec_p50, exec_p95, exec_p99] =
            metric_cells(group, Metric::ExecMs);
        let [read_avg, read_min, read_max, read_p50, read_p95, read_p99] =
            metric_cells(group, Metric::SharedRead);
        let [hit_avg, hit_min, hit_max, hit_p50, hit_p95, hit_p99] =
            metric_cells(group, Metric::SharedHit);
        let size = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_default();

        Self {
            variant: group.key.variant.clone(),
            case: group.key.case.clone(),
            category: group.metadata.category.clone(),
            party_count: size(group.metadata.party_count),
            service_count: size(group.metadata.service_count),
            exec_avg,
            exec_min,
            exec_max,
            exec_p50,
            exec_p95,
            exec_p99,
            read_avg,
            read_min,
            read_max,
            read_p50,
            read_p95,
            read_p99,
            hit_avg,
            hit_min,
            hit_max,
            hit_p50,
            hit_p95,
            hit_p99,
        }
    }
}

/// Writes the summary of `groups`, in the given order, to `writer`.
///
/// The header is written even when there are no groups.
pub fn write_summary<W: Write>(writer: W, groups: &[GroupSummary]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(SUMMARY_COLUMNS)?;
    for group in groups {
        csv.serialize(SummaryRecord::from_group(group))?;
    }
    csv.flush().map_err(|e| BenchError::Csv(e.to_string()))?;
    Ok(())
}

/// Renders the summary to a string.
pub fn render_summary(groups: &[GroupSummary]) -> Result<String> {
    let mut buf = Vec::new();
    write_summary(&mut buf, groups)?;
    String::from_utf8(buf).map_err(|e| BenchError::Csv(e.to_string()))
}

/// Writes the summary to `path`.
pub fn write_summary_csv(path: &Path, groups: &[GroupSummary]) -> Result<()> {
    let file = File::create(path).map_err(|e| BenchError::io(path, e))?;
    write_summary(file, groups)
}
