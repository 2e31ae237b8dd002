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

//! Report command - workbook generation from an existing summary

use crate::error::CliError;
use std::path::{Path, PathBuf};
use trialbench::core::CsvTable;
use trialbench::reporters::{write_workbook, ReportGrouping};
use trialbench::BenchError;

/// Options of the `report` command.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Input `summary.csv`.
    pub summary: PathBuf,
    /// Output workbook; defaults to the input with an `.xlsx` extension.
    pub out: Option<PathBuf>,
    /// Raw CSVs for the Details sheet; the summary itself when empty.
    pub details: Vec<PathBuf>,
    /// Summary sheet grouping.
    pub grouping: ReportGrouping,
}

/// Workbook path next to `summary`.
pub fn default_workbook_path(summary: &Path) -> PathBuf {
    summary.with_extension("xlsx")
}

fn read_required(path: &Path) -> Result<CsvTable, CliError> {
    if !path.is_file() {
        return Err(CliError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let table = CsvTable::read_path(path)?;
    if table.is_empty() {
        return Err(BenchError::EmptyInput {
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(table)
}

/// Builds the workbook and prints its path on stdout.
///
/// # Errors
///
/// Returns `Err` if the summary (or a details file) is missing or has no
/// rows, or if the workbook cannot be written.
pub fn report(options: ReportOptions) -> Result<(), CliError> {
    let summary = read_required(&options.summary)?;

    let details = if options.details.is_empty() {
        summary.clone()
    } else {
        let mut merged = CsvTable::default();
        for path in &options.details {
            merged.append(&read_required(path)?);
        }
        merged
    };

    let out = options
        .out
        .clone()
        .unwrap_or_else(|| default_workbook_path(&options.summary));
    let rows = write_workbook(&out, &summary, &details, options.grouping)?;
    tracing::info!(path = %out.display(), rows, "workbook written");

    println!("{}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_workbook_path() {
        assert_eq!(
            default_workbook_path(Path::new("runs/a/summary.csv")),
            PathBuf::from("runs/a/summary.xlsx")
        );
    }

    #[test]
    fn test_missing_summary() {
        let err = report(ReportOptions {
            summary: PathBuf::from("/nonexistent/summary.csv"),
            out: None,
            details: Vec::new(),
            grouping: ReportGrouping::default(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::NotFound { .. }));
    }

    #[test]
    fn test_header_only_summary_is_empty_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        fs::write(&path, "variant,case,exec_avg\n").unwrap();

        let err = read_required(&path).unwrap_err();
        assert!(matches!(err, CliError::Bench(BenchError::EmptyInput { .. })));
    }

    #[test]
    fn test_report_with_details() {
        let dir = TempDir::new().unwrap();
        let summary = dir.path().join("summary.csv");
        let raw = dir.path().join("100.csv");
        let out = dir.path().join("book.xlsx");
        fs::write(&summary, "variant,case,exec_avg,exec_p95\nv1,c1,2.0,3.0\n").unwrap();
        fs::write(&raw, "variant,case,exec_ms\nv1,c1,2.0\n").unwrap();

        report(ReportOptions {
            summary,
            out: Some(out.clone()),
            details: vec![raw],
            grouping: ReportGrouping::Variant,
        })
        .unwrap();
        assert!(out.is_file());
    }
}
