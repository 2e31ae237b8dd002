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

//! Run command - iterated benchmark execution

use crate::error::CliError;
use chrono::{DateTime, Local};
use colored::Colorize;
use std::path::PathBuf;
use trialbench::core::{GenerationSet, RunConfig, ToolCommand};
use trialbench::harness::{Orchestrator, RunOutcome, SystemRunner};

/// Options of the `run` command, one per flag.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub party_pool: u32,
    pub service_pool: u32,
    pub generate_set: String,
    pub sqls: String,
    pub iterations: u32,
    pub seed: i64,
    pub padding: usize,
    pub out_dir: Option<PathBuf>,
    pub jobs: usize,
    pub sample_generator: String,
    pub case_generator: String,
    pub executor: String,
    pub workbook: bool,
}

impl RunOptions {
    /// Builds the run configuration, resolving the output directory at `now`.
    ///
    /// # Errors
    ///
    /// Returns `Err` for a malformed generation set or an empty command line.
    pub fn to_config(&self, now: DateTime<Local>) -> Result<RunConfig, CliError> {
        let root = self.out_dir.clone().unwrap_or_else(|| default_out_dir(now));
        let generate_set = GenerationSet::parse(&self.generate_set)?;
        let tool = |flag: &str, line: &str| {
            ToolCommand::parse(line).map_err(|e| CliError::invalid_argument(flag, e.to_string()))
        };

        Ok(RunConfig::new(root, generate_set, self.sqls.clone())
            .with_pools(self.party_pool, self.service_pool)
            .with_iterations(self.iterations)
            .with_seed(self.seed)
            .with_padding(self.padding)
            .with_jobs(self.jobs)
            .with_tools(
                tool("sample-generator", &self.sample_generator)?,
                tool("case-generator", &self.case_generator)?,
                tool("executor", &self.executor)?,
            )
            .with_workbook(self.workbook))
    }
}

/// Timestamped output directory `benchmark-YYYYMMDD-HHMM`.
pub fn default_out_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("benchmark-{}", now.format("%Y%m%d-%H%M")))
}

/// Runs the iterated benchmark and prints the run root on stdout.
///
/// Executor and workbook failures are reported on stderr but do not fail
/// the command.
///
/// # Errors
///
/// Returns `Err` on invalid options, pool or case generation failure, or
/// when run artifacts cannot be written.
pub fn run(options: RunOptions) -> Result<(), CliError> {
    let config = options.to_config(Local::now())?;
    let outcome = Orchestrator::new(config, &SystemRunner).run()?;

    print_outcome(&outcome);
    println!("{}", outcome.root().display());
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    for warning in &outcome.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let status = if outcome.cancelled {
        "Cancelled:".yellow().bold()
    } else {
        "Completed:".green().bold()
    };
    eprintln!(
        "{} {} iteration(s), {} group(s), {} explain block(s), {} warning(s)",
        status,
        outcome.iterations_completed,
        outcome.groups.len(),
        outcome.explain_count,
        outcome.warnings.len()
    );
}
