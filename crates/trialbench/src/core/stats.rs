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

//! Order statistics over metric samples.
//!
//! [`percentile`] uses linear interpolation between closest ranks, and
//! [`summarize`] builds the six-field [`SummaryStats`] used by every report.
//! Empty samples produce `NaN` in every field; renderers treat `NaN` as a
//! blank cell.

/// Percentiles reported for every metric.
pub const REPORTED_PERCENTILES: [f64; 3] = [50.0, 95.0, 99.0];

/// Computes an interpolated percentile of `values`.
///
/// * empty input returns `NaN`
/// * `pct <= 0` returns the minimum, `pct >= 100` the maximum
/// * otherwise the fractional rank `pct / 100 * (n - 1)` is interpolated
///   between its floor and ceiling neighbours
///
/// The input slice is not reordered; a sorted copy is used.
///
/// # Example
///
/// ```
/// use trialbench::core::stats::percentile;
///
/// assert_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 50.0), 25.0);
/// assert!(percentile(&[], 50.0).is_nan());
/// ```
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut ordered = values.to_vec();
    ordered.sort_by(f64::total_cmp);

    if pct <= 0.0 {
        return ordered[0];
    }
    if pct >= 100.0 {
        return ordered[ordered.len() - 1];
    }

    let rank = (pct / 100.0) * (ordered.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high {
        return ordered[low];
    }
    let weight = rank - low as f64;
    ordered[low] * (1.0 - weight) + ordered[high] * weight
}

/// Statistical summary of one metric sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Arithmetic mean.
    pub avg: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Median (interpolated).
    pub p50: f64,
    /// 95th percentile (interpolated).
    pub p95: f64,
    /// 99th percentile (interpolated).
    pub p99: f64,
}

impl SummaryStats {
    /// Summary of an empty sample: every field is `NaN`.
    pub const EMPTY: SummaryStats = SummaryStats {
        avg: f64::NAN,
        min: f64::NAN,
        max: f64::NAN,
        p50: f64::NAN,
        p95: f64::NAN,
        p99: f64::NAN,
    };

    /// Returns true when the summary was built from an empty sample.
    pub fn is_empty(&self) -> bool {
        self.avg.is_nan()
    }

    /// Fields in report column order: avg, min, max, p50, p95, p99.
    pub fn fields(&self) -> [f64; 6] {
        [self.avg, self.min, self.max, self.p50, self.p95, self.p99]
    }
}

/// Summarizes a sample into avg/min/max/p50/p95/p99.
pub fn summarize(values: &[f64]) -> SummaryStats {
    if values.is_empty() {
        return SummaryStats::EMPTY;
    }

    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let [p50, p95, p99] = REPORTED_PERCENTILES.map(|pct| percentile(values, pct));

    SummaryStats {
        avg,
        min,
        max,
        p50,
        p95,
        p99,
    }
}

/// Plain arithmetic mean, `NaN` for an empty sample.
///
/// Used when re-summarizing columns that already hold per-group statistics
/// (for example averaging `exec_p95` across groups). This is not a pooled
/// percentile and is kept that way.
pub fn mean(values: &[f64]) -> f64 {
    summarize(values).avg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty_is_nan() {
        assert!(percentile(&[], 0.0).is_nan());
        assert!(percentile(&[], 50.0).is_nan());
        assert!(percentile(&[], 100.0).is_nan());
    }

    #[test]
    fn test_percentile_bounds() {
        let xs = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&xs, 0.0), 1.0);
        assert_eq!(percentile(&xs, -5.0), 1.0);
        assert_eq!(percentile(&xs, 100.0), 3.0);
        assert_eq!(percentile(&xs, 250.0), 3.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let xs = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&xs, 50.0), 25.0);
        // rank = 0.95 * 3 = 2.85 -> 30 * 0.15 + 40 * 0.85
        assert!((percentile(&xs, 95.0) - 38.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_exact_rank() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&xs, 50.0), 3.0);
        assert_eq!(percentile(&xs, 25.0), 2.0);
    }

    #[test]
    fn test_percentile_does_not_reorder_input() {
        let xs = vec![5.0, 1.0, 4.0];
        let _ = percentile(&xs, 50.0);
        assert_eq!(xs, vec![5.0, 1.0, 4.0]);
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&[]);
        assert!(stats.is_empty());
        assert!(stats.fields().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_summarize_single_value() {
        let stats = summarize(&[5.0]);
        assert_eq!(stats.fields(), [5.0; 6]);
    }

    #[test]
    fn test_summarize_values() {
        let stats = summarize(&[30.0, 10.0]);
        assert_eq!(stats.avg, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.p50, 20.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
        assert!(mean(&[]).is_nan());
    }
}
