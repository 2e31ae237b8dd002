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

//! CLI command definitions and argument parsing.
//!
//! Two subcommands are exposed:
//!
//! - `run`: the full iterated benchmark
//! - `report`: workbook regeneration from an existing summary

use crate::commands::{self, ReportOptions, RunOptions};
use crate::error::CliError;
use clap::{ArgAction, Subcommand, ValueEnum};
use std::path::PathBuf;
use trialbench::core::config::{
    DEFAULT_CASE_GENERATOR, DEFAULT_EXECUTOR, DEFAULT_PADDING, DEFAULT_SAMPLE_GENERATOR,
};
use trialbench::reporters::ReportGrouping;

/// Row grouping of the workbook's Summary sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// One row per (variant, case)
    VariantCase,
    /// One row per variant
    Variant,
}

impl From<GroupBy> for ReportGrouping {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::VariantCase => ReportGrouping::VariantCase,
            GroupBy::Variant => ReportGrouping::Variant,
        }
    }
}

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use trialbench_cli::cli::Commands;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Run an iterated benchmark
    ///
    /// Generates the party and service pools once, then for each iteration
    /// generates cases with seed + i and runs the executor. Results are
    /// reduced into summary.csv, explains_all.txt and summary.xlsx under the
    /// output directory, whose path is printed on stdout.
    Run {
        /// Party pool size
        #[arg(long, value_name = "N")]
        party_pool: u32,

        /// Service pool size
        #[arg(long, value_name = "N")]
        service_pool: u32,

        /// Semicolon-separated parties,services,groups tuples (e.g. "2,2,1;10,5,3")
        #[arg(long, value_name = "SET")]
        generate_set: String,

        /// Glob of SQL files passed to the executor
        #[arg(long, value_name = "GLOB")]
        sqls: String,

        /// Number of iterations
        #[arg(long, value_name = "N")]
        iterations: u32,

        /// Base seed; iteration i uses seed + i
        #[arg(long, value_name = "N", allow_negative_numbers = true)]
        seed: i64,

        /// Zero-padding width of iteration directory names
        #[arg(long, value_name = "WIDTH", default_value_t = DEFAULT_PADDING)]
        padding: usize,

        /// Output directory (default: benchmark-YYYYMMDD-HHMM)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Iterations to run concurrently
        #[arg(short, long, value_name = "N", default_value_t = 1)]
        jobs: usize,

        /// Sample generator command line
        #[arg(long, value_name = "CMD", default_value = DEFAULT_SAMPLE_GENERATOR)]
        sample_generator: String,

        /// Case generator command line
        #[arg(long, value_name = "CMD", default_value = DEFAULT_CASE_GENERATOR)]
        case_generator: String,

        /// Benchmark executor command line
        #[arg(long, value_name = "CMD", default_value = DEFAULT_EXECUTOR)]
        executor: String,

        /// Skip summary.xlsx
        #[arg(long)]
        no_workbook: bool,
    },

    /// Build summary.xlsx from an existing summary.csv
    ///
    /// Writes the Summary and Details sheets and prints the workbook path.
    Report {
        /// Path to summary.csv
        #[arg(value_name = "SUMMARY_CSV")]
        summary: PathBuf,

        /// Output workbook (default: next to the input, with .xlsx extension)
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Raw per-iteration CSV for the Details sheet, repeatable (default: the summary rows)
        #[arg(short, long, value_name = "CSV", action = ArgAction::Append)]
        details: Vec<PathBuf>,

        /// Summary sheet grouping
        #[arg(long, value_enum, default_value_t = GroupBy::VariantCase)]
        group_by: GroupBy,
    },
}

impl Commands {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns `Err` on any fatal benchmark or report failure.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Run {
                party_pool,
                service_pool,
                generate_set,
                sqls,
                iterations,
                seed,
                padding,
                out_dir,
                jobs,
                sample_generator,
                case_generator,
                executor,
                no_workbook,
            } => commands::run(RunOptions {
                party_pool,
                service_pool,
                generate_set,
                sqls,
                iterations,
                seed,
                padding,
                out_dir,
                jobs,
                sample_generator,
                case_generator,
                executor,
                workbook: !no_workbook,
            }),
            Commands::Report {
                summary,
                out,
                details,
                group_by,
            } => commands::report(ReportOptions {
                summary,
                out,
                details,
                grouping: group_by.into(),
            }),
        }
    }
}
