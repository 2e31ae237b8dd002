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

//! Workbook export (`summary.xlsx`).
//!
//! The workbook has two sheets:
//!
//! - **Summary**: one row per report group with the latency statistics of
//!   the flat summary averaged across the group, heat-mapped and charted.
//! - **Details**: every input row with all of its columns. Known numeric
//!   columns are written as numbers so they sort and filter correctly.
//!
//! Summary values are plain means of already summarized columns: the
//! `exec_p95` of a group is the average of the `exec_p95` cells it covers,
//! not a percentile over pooled samples.

use crate::core::numeric::parse_float;
use crate::core::record::CsvTable;
use crate::core::stats::mean;
use crate::error::{BenchError, Result};
use rust_xlsxwriter::{
    Chart, ChartType, Color, ColNum, ConditionalFormat3ColorScale, ConditionalFormatType, Format,
    FormatAlign, RowNum, Workbook, Worksheet,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Latency columns averaged on the Summary sheet.
pub const REPORT_STATS: [&str; 6] = [
    "exec_avg", "exec_min", "exec_max", "exec_p50", "exec_p95", "exec_p99",
];

/// Columns written as numbers on the Details sheet regardless of prefix.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "exec_ms",
    "shared_read",
    "shared_hit",
    "shared_dirtied",
    "party_count",
    "service_count",
];

/// Numeric columns formatted as integers.
pub const INTEGER_COLUMNS: [&str; 2] = ["party_count", "service_count"];

const NUMERIC_PREFIXES: [&str; 3] = ["exec_", "read_", "hit_"];
const MAX_COLUMN_WIDTH: usize = 60;
const HEADER_BACKGROUND: u32 = 0x1F4E78;
const SCALE_LOW: u32 = 0x63BE7B;
const SCALE_MID: u32 = 0xFFEB84;
const SCALE_HIGH: u32 = 0xF8696B;
const CHART_WIDTH: u32 = 680;
const CHART_HEIGHT: u32 = 340;

/// Returns true if cells of `column` should be written as numbers.
pub fn is_numeric_column(column: &str) -> bool {
    NUMERIC_PREFIXES.iter().any(|p| column.starts_with(p)) || NUMERIC_COLUMNS.contains(&column)
}

/// Returns true if `column` holds integer counts.
pub fn is_integer_column(column: &str) -> bool {
    INTEGER_COLUMNS.contains(&column)
}

/// How Summary sheet rows are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportGrouping {
    /// One row per (variant, case).
    #[default]
    VariantCase,
    /// One row per variant, averaging across cases.
    Variant,
}

impl ReportGrouping {
    fn key_columns(&self) -> &'static [&'static str] {
        match self {
            ReportGrouping::VariantCase => &["variant", "case"],
            ReportGrouping::Variant => &["variant"],
        }
    }
}

/// One Summary sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Group key cells (variant, and case when grouping by case).
    pub key: Vec<String>,
    /// Number of summary rows averaged (largest over avg/p50/p95/p99).
    pub count: usize,
    /// Averages of [`REPORT_STATS`]; `NaN` when no cell parsed.
    pub values: [f64; 6],
}

/// Groups the rows of a flat summary and averages their latency columns.
///
/// Rows with an empty key cell are skipped. Output is sorted by key.
pub fn summarize_report_rows(table: &CsvTable, grouping: ReportGrouping) -> Vec<ReportRow> {
    let key_cols: Vec<Option<usize>> = grouping
        .key_columns()
        .iter()
        .map(|c| table.column(c))
        .collect();
    let stat_cols: Vec<Option<usize>> = REPORT_STATS.iter().map(|c| table.column(c)).collect();

    let mut grouped: BTreeMap<Vec<String>, [Vec<f64>; 6]> = BTreeMap::new();
    for row in &table.rows {
        let key: Vec<String> = key_cols
            .iter()
            .map(|c| c.and_then(|i| row.get(i)).cloned().unwrap_or_default())
            .collect();
        if key.iter().any(String::is_empty) {
            continue;
        }
        let samples = grouped.entry(key).or_default();
        for (sample, col) in samples.iter_mut().zip(&stat_cols) {
            if let Some(value) = parse_float(col.and_then(|i| row.get(i)).map(String::as_str)) {
                sample.push(value);
            }
        }
    }

    grouped
        .into_iter()
        .map(|(key, samples)| {
            let count = [0, 3, 4, 5].iter().map(|&i| samples[i].len()).max().unwrap_or(0);
            ReportRow {
                key,
                count,
                values: [0, 1, 2, 3, 4, 5].map(|i| mean(&samples[i])),
            }
        })
        .collect()
}

/// Tracks the widest cell per column.
struct ColumnWidths(Vec<usize>);

impl ColumnWidths {
    fn new(columns: usize) -> Self {
        Self(vec![0; columns])
    }

    fn observe(&mut self, col: usize, text_len: usize) {
        if let Some(width) = self.0.get_mut(col) {
            *width = (*width).max(text_len);
        }
    }

    fn apply(&self, sheet: &mut Worksheet) -> Result<()> {
        for (col, width) in self.0.iter().enumerate() {
            let width = (width + 2).min(MAX_COLUMN_WIDTH);
            sheet.set_column_width(col_num(col)?, width as f64)?;
        }
        Ok(())
    }
}

fn col_num(col: usize) -> Result<ColNum> {
    ColNum::try_from(col).map_err(|_| BenchError::Workbook(format!("column {} out of range", col)))
}

fn row_num(row: usize) -> Result<RowNum> {
    RowNum::try_from(row).map_err(|_| BenchError::Workbook(format!("row {} out of range", row)))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BACKGROUND))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

fn color_scale() -> ConditionalFormat3ColorScale {
    ConditionalFormat3ColorScale::new()
        .set_minimum_color(Color::RGB(SCALE_LOW))
        .set_midpoint(ConditionalFormatType::Percentile, 50)
        .set_midpoint_color(Color::RGB(SCALE_MID))
        .set_maximum_color(Color::RGB(SCALE_HIGH))
}

/// Writes the styled header row, freezes it and adds an auto-filter.
fn write_header(sheet: &mut Worksheet, headers: &[&str], data_rows: usize, widths: &mut ColumnWidths) -> Result<()> {
    if headers.is_empty() {
        return Ok(());
    }
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col_num(col)?, *header, &format)?;
        widths.observe(col, header.chars().count());
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofilter(0, 0, row_num(data_rows)?, col_num(headers.len() - 1)?)?;
    Ok(())
}

/// Adds the three-point colour scale to data rows of one column.
fn add_color_scale(sheet: &mut Worksheet, col: usize, data_rows: usize) -> Result<()> {
    if data_rows == 0 {
        return Ok(());
    }
    let col = col_num(col)?;
    sheet.add_conditional_format(1, col, row_num(data_rows)?, col, &color_scale())?;
    Ok(())
}

fn build_summary_sheet(sheet: &mut Worksheet, rows: &[ReportRow], grouping: ReportGrouping) -> Result<()> {
    sheet.set_name("Summary")?;

    let key_cols = grouping.key_columns();
    let mut headers: Vec<&str> = key_cols.to_vec();
    headers.push("count");
    headers.extend(REPORT_STATS);
    let stats_start = key_cols.len() + 1;

    let mut widths = ColumnWidths::new(headers.len());
    write_header(sheet, &headers, rows.len(), &mut widths)?;

    let number = Format::new().set_num_format("0.00");
    for (i, row) in rows.iter().enumerate() {
        let r = row_num(i + 1)?;
        for (col, cell) in row.key.iter().enumerate() {
            sheet.write_string(r, col_num(col)?, cell.as_str())?;
            widths.observe(col, cell.chars().count());
        }
        sheet.write_number(r, col_num(key_cols.len())?, row.count as f64)?;
        widths.observe(key_cols.len(), row.count.to_string().len());
        for (offset, value) in row.values.iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            let col = stats_start + offset;
            sheet.write_number_with_format(r, col_num(col)?, *value, &number)?;
            widths.observe(col, format!("{:.2}", value).len());
        }
    }
    widths.apply(sheet)?;

    if rows.is_empty() {
        return Ok(());
    }

    for col in stats_start..headers.len() {
        add_color_scale(sheet, col, rows.len())?;
    }

    let last_row = row_num(rows.len())?;
    let category_end = col_num(key_cols.len() - 1)?;
    let mut chart = Chart::new(ChartType::Bar);
    // p50, p95 and p99 are the last three stat columns.
    for col in headers.len() - 3..headers.len() {
        let col = col_num(col)?;
        chart
            .add_series()
            .set_name(("Summary", 0, col))
            .set_categories(("Summary", 1, 0, last_row, category_end))
            .set_values(("Summary", 1, col, last_row, col));
    }
    chart.title().set_name("Exec p50/p95/p99 by Variant");
    chart.x_axis().set_name("ms");
    chart.y_axis().set_name("variant");
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);
    sheet.insert_chart(1, col_num(headers.len() + 2)?, &chart)?;
    Ok(())
}

fn build_details_sheet(sheet: &mut Worksheet, table: &CsvTable) -> Result<()> {
    sheet.set_name("Details")?;

    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    let mut widths = ColumnWidths::new(headers.len());
    write_header(sheet, &headers, table.len(), &mut widths)?;

    let integer = Format::new().set_num_format("0");
    let decimal = Format::new().set_num_format("0.00");
    for (i, record) in table.rows.iter().enumerate() {
        let r = row_num(i + 1)?;
        for (col, (cell, header)) in record.iter().zip(&headers).enumerate() {
            widths.observe(col, cell.chars().count());
            let c = col_num(col)?;
            match parse_float(Some(cell.as_str())).filter(|_| is_numeric_column(header)) {
                Some(value) if is_integer_column(header) => {
                    sheet.write_number_with_format(r, c, value, &integer)?;
                }
                Some(value) => {
                    sheet.write_number_with_format(r, c, value, &decimal)?;
                }
                None if cell.is_empty() => {}
                None => {
                    sheet.write_string(r, c, cell.as_str())?;
                }
            }
        }
    }

    for (col, header) in headers.iter().enumerate() {
        if is_numeric_column(header) && !is_integer_column(header) {
            add_color_scale(sheet, col, table.len())?;
        }
    }
    widths.apply(sheet)
}

/// Builds the workbook from a flat summary and a details table.
///
/// Returns the number of Summary sheet rows. Charts and colour scales are
/// omitted when a sheet has no data rows.
pub fn write_workbook(
    path: &Path,
    summary: &CsvTable,
    details: &CsvTable,
    grouping: ReportGrouping,
) -> Result<usize> {
    let rows = summarize_report_rows(summary, grouping);

    let mut workbook = Workbook::new();
    build_summary_sheet(workbook.add_worksheet(), &rows, grouping)?;
    build_details_sheet(workbook.add_worksheet(), details)?;
    workbook.save(path)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "workbook written");
    Ok(rows.len())
}
