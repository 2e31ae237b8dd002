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

//! Property-based tests for the percentile engine and the aggregator.
//!
//! - Percentiles are bounded by min/max and monotonic in the percentile
//! - Summaries are invariant under input order
//! - Every summary group has folded rows, and a statistic is blank iff its
//!   sample is empty

use proptest::prelude::*;
use trialbench::core::{percentile, summarize, GroupKey, TrialRow};
use trialbench::harness::{Aggregator, Metric};
use trialbench::reporters::{render_summary, SUMMARY_COLUMNS};

// Interpolation may be off by a few ulps at these magnitudes.
const EPSILON: f64 = 1e-6;

// ===== Generators =====

fn finite_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6f64, 1..64)
}

fn trial_row() -> impl Strategy<Value = TrialRow> {
    (
        prop::sample::select(vec!["", "v1", "v2", "v3"]),
        prop::sample::select(vec!["", "c1", "c2"]),
        prop::option::of(0.0..500.0f64),
        prop::option::of(0..10_000i64),
        prop::option::of(0..10_000i64),
    )
        .prop_map(|(variant, case, exec_ms, shared_read, shared_hit)| TrialRow {
            variant: variant.to_string(),
            case: case.to_string(),
            category: "small".to_string(),
            party_count: Some(2),
            service_count: Some(2),
            exec_ms,
            shared_read,
            shared_hit,
        })
}

// ===== Percentile engine =====

proptest! {
    #[test]
    fn prop_percentile_bounded(values in finite_values(), pct in 0.0..=100.0f64) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let p = percentile(&values, pct);
        prop_assert!(p >= min - EPSILON && p <= max + EPSILON, "p={} outside [{}, {}]", p, min, max);
    }

    #[test]
    fn prop_percentile_monotonic(values in finite_values(), a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(percentile(&values, lo) <= percentile(&values, hi) + EPSILON);
    }

    #[test]
    fn prop_percentile_extremes(values in finite_values()) {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(percentile(&values, 0.0), min);
        prop_assert_eq!(percentile(&values, 100.0), max);
    }

    #[test]
    fn prop_summary_order_independent(values in finite_values()) {
        let mut reversed = values.clone();
        reversed.reverse();
        let a = summarize(&values);
        let b = summarize(&reversed);
        prop_assert_eq!(a.min, b.min);
        prop_assert_eq!(a.max, b.max);
        prop_assert_eq!(a.p50, b.p50);
        prop_assert_eq!(a.p95, b.p95);
        prop_assert_eq!(a.p99, b.p99);
    }
}

// ===== Aggregator =====

proptest! {
    #[test]
    fn prop_groups_have_rows(rows in prop::collection::vec(trial_row(), 0..40)) {
        let mut agg = Aggregator::new();
        agg.fold_all(&rows);

        let keyed = rows.iter().filter(|r| r.key().is_some()).count();
        prop_assert_eq!(agg.folded_rows(), keyed);
        prop_assert_eq!(agg.dropped_rows(), rows.len() - keyed);

        for group in agg.finalize() {
            let members = rows
                .iter()
                .filter(|r| r.key().as_ref() == Some(&group.key))
                .count();
            prop_assert!(members > 0);
            prop_assert!(group.count <= members);

            for metric in Metric::ALL {
                let sample = agg.sample(&group.key, metric).unwrap();
                prop_assert_eq!(group.stats(metric).is_empty(), sample.is_empty());
            }
        }
    }

    #[test]
    fn prop_summary_blank_iff_empty(rows in prop::collection::vec(trial_row(), 1..40)) {
        let mut agg = Aggregator::new();
        agg.fold_all(&rows);
        let groups = agg.finalize();
        let text = render_summary(&groups).unwrap();

        let exec_avg = SUMMARY_COLUMNS.iter().position(|c| *c == "exec_avg").unwrap();
        for (line, group) in text.lines().skip(1).zip(&groups) {
            let cells: Vec<&str> = line.split(',').collect();
            prop_assert_eq!(cells.len(), SUMMARY_COLUMNS.len());
            let key = GroupKey::new(cells[0], cells[1]);
            prop_assert_eq!(&key, &group.key);
            let empty = agg.sample(&key, Metric::ExecMs).unwrap().is_empty();
            prop_assert_eq!(cells[exec_avg].is_empty(), empty);
        }
    }
}
