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

//! Trial records and headered CSV tables.
//!
//! Executor output is read twice over: once as an open-ended [`CsvTable`]
//! that keeps every column for the Details sheet, and once as fixed-schema
//! [`TrialRow`] values that feed the aggregator.

use crate::core::numeric::{parse_count, parse_float, parse_size};
use crate::error::{BenchError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns the executor must provide for aggregation.
pub const TRIAL_COLUMNS: [&str; 8] = [
    "variant",
    "case",
    "category",
    "party_count",
    "service_count",
    "exec_ms",
    "shared_read",
    "shared_hit",
];

/// A headered table of string cells, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Column names from the header record.
    pub headers: Vec<String>,
    /// Data records; a record may be shorter or longer than `headers`.
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Creates an empty table with the given headers.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a table from any CSV source.
    ///
    /// Ragged records are accepted. Records the CSV reader cannot decode are
    /// skipped; a missing header record yields an empty table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = match reader.headers() {
            Ok(record) => record.iter().map(str::to_string).collect(),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                return Err(BenchError::from(e))
            }
            Err(_) => Vec::new(),
        };

        let mut table = Self::with_headers(headers);
        for record in reader.records() {
            match record {
                Ok(record) => table.rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => tracing::debug!(error = %e, "skipping undecodable CSV record"),
            }
        }
        Ok(table)
    }

    /// Reads a table from CSV text.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Reads a table from a CSV file.
    pub fn read_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
        Self::from_reader(file)
    }

    /// Number of data records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell of `row` in column `name`, if both exist.
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Appends the records of `other`, aligning cells by column name.
    ///
    /// Columns unknown to `self` are added at the end of the header in the
    /// order they first appear. Cells without a value stay empty.
    pub fn append(&mut self, other: &CsvTable) {
        let mapping: Vec<usize> = other
            .headers
            .iter()
            .map(|name| match self.column(name) {
                Some(idx) => idx,
                None => {
                    self.headers.push(name.clone());
                    self.headers.len() - 1
                }
            })
            .collect();

        for source in &other.rows {
            let mut row = vec![String::new(); self.headers.len()];
            for (cell, &target) in source.iter().zip(&mapping) {
                row[target] = cell.clone();
            }
            self.rows.push(row);
        }
    }

    /// Converts every record into a typed [`TrialRow`].
    pub fn trial_rows(&self) -> Vec<TrialRow> {
        let cols: Vec<Option<usize>> = TRIAL_COLUMNS.iter().map(|c| self.column(c)).collect();
        self.rows
            .iter()
            .map(|record| {
                let field = |i: usize| cols[i].and_then(|c| record.get(c)).map(String::as_str);
                TrialRow {
                    variant: field(0).unwrap_or_default().to_string(),
                    case: field(1).unwrap_or_default().to_string(),
                    category: field(2).unwrap_or_default().to_string(),
                    party_count: parse_size(field(3)),
                    service_count: parse_size(field(4)),
                    exec_ms: parse_float(field(5)),
                    shared_read: parse_count(field(6)),
                    shared_hit: parse_count(field(7)),
                }
            })
            .collect()
    }
}

/// One benchmark execution result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialRow {
    /// Query/strategy variant.
    pub variant: String,
    /// Scenario identifier.
    pub case: String,
    /// Case category.
    pub category: String,
    /// Number of parties in the case.
    pub party_count: Option<u64>,
    /// Number of services in the case.
    pub service_count: Option<u64>,
    /// Execution latency in milliseconds.
    pub exec_ms: Option<f64>,
    /// Shared buffer reads.
    pub shared_read: Option<i64>,
    /// Shared buffer hits.
    pub shared_hit: Option<i64>,
}

impl TrialRow {
    /// Grouping key, or `None` when the row cannot be grouped.
    pub fn key(&self) -> Option<GroupKey> {
        if self.variant.is_empty() || self.case.is_empty() {
            return None;
        }
        Some(GroupKey {
            variant: self.variant.clone(),
            case: self.case.clone(),
        })
    }
}

/// Aggregation bucket identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Query/strategy variant.
    pub variant: String,
    /// Scenario identifier.
    pub case: String,
}

impl GroupKey {
    /// Creates a key from its parts.
    pub fn new(variant: impl Into<String>, case: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            case: case.into(),
        }
    }
}
