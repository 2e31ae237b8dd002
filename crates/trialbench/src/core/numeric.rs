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

//! Best-effort numeric parsing for benchmark output.
//!
//! The executor's CSV is noisy: columns can be missing, empty, `None`, or
//! contain arbitrary text when a query failed. These helpers return `None`
//! for anything that is not a finite number so callers can drop the value
//! from a sample instead of counting it as zero.

/// Parses a floating point field.
///
/// Returns `None` for missing, empty, `None`, non-numeric and non-finite
/// values. Surrounding whitespace is ignored.
pub fn parse_float(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "None" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integer counter field.
///
/// Accepts float notation (`"12.0"`, `"1e3"`) and truncates toward zero, so
/// counters printed by the executor as floats still land in the sample.
pub fn parse_count(raw: Option<&str>) -> Option<i64> {
    parse_float(raw).map(|v| v.trunc() as i64)
}

/// Parses a non-negative integer metadata field such as `party_count`.
pub fn parse_size(raw: Option<&str>) -> Option<u64> {
    parse_count(raw).and_then(|v| u64::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_valid() {
        assert_eq!(parse_float(Some("12.5")), Some(12.5));
        assert_eq!(parse_float(Some("  3 ")), Some(3.0));
        assert_eq!(parse_float(Some("1e2")), Some(100.0));
    }

    #[test]
    fn test_parse_float_rejects_noise() {
        assert_eq!(parse_float(None), None);
        assert_eq!(parse_float(Some("")), None);
        assert_eq!(parse_float(Some("None")), None);
        assert_eq!(parse_float(Some("abc")), None);
        assert_eq!(parse_float(Some("NaN")), None);
        assert_eq!(parse_float(Some("inf")), None);
    }

    #[test]
    fn test_parse_count_truncates() {
        assert_eq!(parse_count(Some("42")), Some(42));
        assert_eq!(parse_count(Some("42.9")), Some(42));
        assert_eq!(parse_count(Some("-1.5")), Some(-1));
        assert_eq!(parse_count(Some("x")), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size(Some("5")), Some(5));
        assert_eq!(parse_size(Some("-5")), None);
        assert_eq!(parse_size(Some("")), None);
    }
}
