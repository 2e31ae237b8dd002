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

//! Iteration orchestrator.
//!
//! A run moves through `INIT → POOL_GENERATION → (CASE_GEN → EXECUTE →
//! COLLECT)* → REDUCE → REPORT → DONE`. Each iteration produces a
//! self-contained [`IterationOutcome`]; outcomes are folded in iteration
//! order during REDUCE, so sequential and parallel runs produce identical
//! reports.

use crate::core::config::{PoolKind, RunConfig, ToolCommand};
use crate::core::record::CsvTable;
use crate::error::{BenchError, Result};
use crate::explain::{parse_explains, ExplainBlock};
use crate::harness::aggregator::{Aggregator, GroupSummary};
use crate::harness::layout::{ensure_dir, write_text, RunLayout};
use crate::harness::process::{CommandOutput, CommandRunner};
use crate::reporters::summary_csv::write_summary_csv;
use crate::reporters::workbook::{write_workbook, ReportGrouping};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag shared between a run and its caller.
///
/// The orchestrator checks the token before starting each iteration.
/// Iterations already running are allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Phases of a run, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    PoolGeneration,
    CaseGeneration,
    Execute,
    Collect,
    Reduce,
    Report,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::PoolGeneration => "pool-generation",
            RunPhase::CaseGeneration => "case-generation",
            RunPhase::Execute => "execute",
            RunPhase::Collect => "collect",
            RunPhase::Reduce => "reduce",
            RunPhase::Report => "report",
            RunPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// A recoverable problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunWarning {
    /// Iteration name, or `None` for run-level warnings.
    pub iteration: Option<String>,
    /// Description.
    pub message: String,
}

impl RunWarning {
    fn iteration(name: &str, message: impl Into<String>) -> Self {
        Self {
            iteration: Some(name.to_string()),
            message: message.into(),
        }
    }

    fn run(message: impl Into<String>) -> Self {
        Self {
            iteration: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.iteration {
            Some(name) => write!(f, "iteration {}: {}", name, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Everything one iteration produced.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    /// Zero-based iteration index.
    pub index: u32,
    /// Iteration directory name (padded seed).
    pub name: String,
    /// Parsed executor stdout.
    pub table: CsvTable,
    /// Explain blocks from executor stderr, in first-seen order.
    pub explains: Vec<ExplainBlock>,
    /// Recoverable problems.
    pub warnings: Vec<RunWarning>,
}

/// Result of a completed (or cancelled) run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Artifact locations.
    pub layout: RunLayout,
    /// Iterations that ran to completion.
    pub iterations_completed: u32,
    /// True if cancellation stopped the run before every iteration started.
    pub cancelled: bool,
    /// Per-group statistics, in first-seen order.
    pub groups: Vec<GroupSummary>,
    /// Rows folded into a group.
    pub rows_folded: usize,
    /// Rows dropped for lack of a variant or case.
    pub rows_dropped: usize,
    /// Explain blocks written.
    pub explain_count: usize,
    /// Recoverable problems, in iteration order.
    pub warnings: Vec<RunWarning>,
    /// Workbook path, if it was written.
    pub workbook: Option<PathBuf>,
}

impl RunOutcome {
    /// Run root directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }
}

/// Drives one benchmark run.
///
/// # Example
///
/// ```no_run
/// use trialbench::core::{GenerationSet, RunConfig};
/// use trialbench::harness::{Orchestrator, SystemRunner};
///
/// let config = RunConfig::new("bench-out", GenerationSet::parse("2,2,1")?, "sql/*.sql")
///     .with_pools(5, 5)
///     .with_iterations(3)
///     .with_seed(100);
/// let outcome = Orchestrator::new(config, &SystemRunner).run()?;
/// println!("{}", outcome.root().display());
/// # Ok::<(), trialbench::BenchError>(())
/// ```
pub struct Orchestrator<'r, R: CommandRunner> {
    config: RunConfig,
    runner: &'r R,
    layout: RunLayout,
    cancel: CancelToken,
}

impl<'r, R: CommandRunner> Orchestrator<'r, R> {
    /// Creates an orchestrator for `config` using `runner` for every process.
    pub fn new(config: RunConfig, runner: &'r R) -> Self {
        let layout = RunLayout::new(config.root_dir.clone());
        Self {
            config,
            runner,
            layout,
            cancel: CancelToken::new(),
        }
    }

    /// Uses `cancel` to stop scheduling iterations.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Artifact layout of the run.
    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Executes the run.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, pool or case generation failure, and
    /// I/O errors writing artifacts. Executor failures and workbook failures
    /// are recorded as warnings instead.
    pub fn run(&self) -> Result<RunOutcome> {
        self.config.validate()?;
        info!(
            phase = %RunPhase::Init,
            root = %self.layout.root().display(),
            iterations = self.config.iterations,
            jobs = self.config.jobs,
            "starting run"
        );
        self.layout.create()?;

        self.generate_pools()?;

        let outcomes = if self.config.jobs > 1 {
            self.run_parallel()?
        } else {
            self.run_sequential()?
        };

        let outcome = self.reduce_and_report(outcomes)?;
        info!(
            phase = %RunPhase::Done,
            groups = outcome.groups.len(),
            warnings = outcome.warnings.len(),
            "run finished"
        );
        Ok(outcome)
    }

    /// Invokes a collaborator, logging the full command line.
    fn invoke(&self, command: &ToolCommand, args: &[String]) -> Result<CommandOutput> {
        let line = command.render(args);
        debug!("[cmd] {}", line);
        self.runner.run(command, args).map_err(|e| BenchError::Launch {
            command: line,
            message: e.to_string(),
        })
    }

    fn generate_pools(&self) -> Result<()> {
        for (kind, size) in [
            (PoolKind::Party, self.config.party_pool),
            (PoolKind::Service, self.config.service_pool),
        ] {
            info!(phase = %RunPhase::PoolGeneration, pool = %kind, size, "generating samples");
            let args = vec![kind.as_str().to_string(), size.to_string()];
            let output = self.invoke(&self.config.sample_generator, &args)?;

            if !output.success() {
                return Err(BenchError::PoolGeneration {
                    pool: kind.to_string(),
                    reason: failure_reason(&output),
                });
            }
            let samples = output.stdout.trim();
            if samples.is_empty() {
                return Err(BenchError::PoolGeneration {
                    pool: kind.to_string(),
                    reason: "generator produced no samples".to_string(),
                });
            }
            write_text(&self.layout.pool_path(kind), &format!("{}\n", samples))?;
        }
        Ok(())
    }

    fn run_sequential(&self) -> Result<Vec<IterationOutcome>> {
        let mut outcomes = Vec::new();
        for index in 0..self.config.iterations {
            if self.cancel.is_cancelled() {
                warn!(remaining = self.config.iterations - index, "run cancelled");
                break;
            }
            outcomes.push(self.run_iteration(index)?);
        }
        Ok(outcomes)
    }

    fn run_parallel(&self) -> Result<Vec<IterationOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|e| BenchError::invalid_config("jobs", e.to_string()))?;

        // Set by the first fatal iteration; no new iteration starts after it.
        let aborted = AtomicBool::new(false);
        let results: Vec<Option<Result<IterationOutcome>>> = pool.install(|| {
            (0..self.config.iterations)
                .into_par_iter()
                .map(|index| {
                    if self.cancel.is_cancelled() || aborted.load(Ordering::SeqCst) {
                        return None;
                    }
                    let result = self.run_iteration(index);
                    if result.is_err() {
                        aborted.store(true, Ordering::SeqCst);
                    }
                    Some(result)
                })
                .collect()
        });

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results.into_iter().flatten() {
            outcomes.push(result?);
        }
        if outcomes.len() < self.config.iterations as usize {
            warn!(
                remaining = self.config.iterations as usize - outcomes.len(),
                "run cancelled"
            );
        }
        Ok(outcomes)
    }

    /// Case generation, execution and collection for one iteration.
    pub fn run_iteration(&self, index: u32) -> Result<IterationOutcome> {
        let name = self.config.iteration_name(index);
        let seed = self.config.iteration_seed(index);
        let cases_dir = self.layout.iteration_cases(&name);
        ensure_dir(&cases_dir)?;
        info!(
            phase = %RunPhase::CaseGeneration,
            iteration = %name,
            "iteration {}/{}",
            index + 1,
            self.config.iterations
        );

        let case_args = vec![
            "--parties-path".to_string(),
            self.layout.pool_path(PoolKind::Party).display().to_string(),
            "--services-path".to_string(),
            self.layout.pool_path(PoolKind::Service).display().to_string(),
            "--out-dir".to_string(),
            cases_dir.display().to_string(),
            "--seed".to_string(),
            seed.to_string(),
            "--omit-seed-in-filename".to_string(),
            "--generate-set".to_string(),
            self.config.generate_set.to_string(),
        ];
        let output = self.invoke(&self.config.case_generator, &case_args)?;
        if !output.success() {
            return Err(BenchError::CaseGeneration {
                iteration: name,
                reason: failure_reason(&output),
            });
        }

        debug!(phase = %RunPhase::Execute, iteration = %name, "running executor");
        let exec_args = vec![
            "--cases".to_string(),
            cases_dir.join("*.json").display().to_string(),
            "--sqls".to_string(),
            self.config.sqls.clone(),
            "--csv".to_string(),
            "--print-explain".to_string(),
        ];
        let mut warnings = Vec::new();
        let output = match self.invoke(&self.config.executor, &exec_args) {
            Ok(output) => output,
            Err(e) => {
                warn!(iteration = %name, error = %e, "executor could not be started");
                warnings.push(RunWarning::iteration(&name, e.to_string()));
                CommandOutput::default()
            }
        };

        write_text(&self.layout.iteration_csv(&name), &output.stdout)?;

        let explains: Vec<ExplainBlock> = if output.stderr.trim().is_empty() {
            Vec::new()
        } else {
            parse_explains(&output.stderr).into_iter().collect()
        };
        let explain_dir = self.layout.iteration_explains(&name);
        for block in &explains {
            write_text(
                &explain_dir.join(block.key.file_name()),
                &format!("{}\n", block.text()),
            )?;
        }

        if output.code.is_some() && !output.success() {
            warn!(iteration = %name, status = %output.status_text(), "executor failed");
            warnings.push(RunWarning::iteration(
                &name,
                format!("executor returned {}", output.status_text()),
            ));
        } else if output.code.is_none() && warnings.is_empty() {
            warn!(iteration = %name, "executor terminated by signal");
            warnings.push(RunWarning::iteration(&name, "executor terminated by signal"));
        }

        let table = match CsvTable::from_csv_str(&output.stdout) {
            Ok(table) => table,
            Err(e) => {
                warn!(iteration = %name, error = %e, "executor output is not valid CSV");
                warnings.push(RunWarning::iteration(&name, e.to_string()));
                CsvTable::default()
            }
        };
        debug!(
            phase = %RunPhase::Collect,
            iteration = %name,
            rows = table.len(),
            explains = explains.len(),
            "iteration collected"
        );

        Ok(IterationOutcome {
            index,
            name,
            table,
            explains,
            warnings,
        })
    }

    fn reduce_and_report(&self, outcomes: Vec<IterationOutcome>) -> Result<RunOutcome> {
        info!(phase = %RunPhase::Reduce, iterations = outcomes.len(), "aggregating results");
        let mut aggregator = Aggregator::new();
        let mut details = CsvTable::default();
        let mut catalog = String::new();
        let mut explain_count = 0;
        let mut warnings = Vec::new();

        for outcome in &outcomes {
            aggregator.fold_all(&outcome.table.trial_rows());
            details.append(&outcome.table);
            for block in &outcome.explains {
                catalog.push_str(&format!("== {} ==\n{}\n\n", block.key.file_name(), block.text()));
                explain_count += 1;
            }
            warnings.extend(outcome.warnings.iter().cloned());
        }
        if aggregator.dropped_rows() > 0 {
            debug!(rows = aggregator.dropped_rows(), "dropped rows without variant or case");
        }

        info!(phase = %RunPhase::Report, "writing summary and concatenated explains");
        let groups = aggregator.finalize();
        write_text(&self.layout.explains_all(), &catalog)?;
        let summary_path = self.layout.summary_csv();
        write_summary_csv(&summary_path, &groups)?;

        let workbook = if self.config.workbook {
            self.write_report(&summary_path, &details, &mut warnings)
        } else {
            None
        };

        let iterations_completed = outcomes.len() as u32;
        Ok(RunOutcome {
            layout: self.layout.clone(),
            iterations_completed,
            cancelled: iterations_completed < self.config.iterations,
            groups,
            rows_folded: aggregator.folded_rows(),
            rows_dropped: aggregator.dropped_rows(),
            explain_count,
            warnings,
            workbook,
        })
    }

    /// Writes the workbook; failures become run warnings.
    fn write_report(&self, summary_path: &Path, details: &CsvTable, warnings: &mut Vec<RunWarning>) -> Option<PathBuf> {
        let path = self.layout.summary_xlsx();
        let result = CsvTable::read_path(summary_path)
            .and_then(|summary| write_workbook(&path, &summary, details, ReportGrouping::default()));
        match result {
            Ok(rows) => {
                debug!(rows, "workbook summary rows");
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "workbook generation failed");
                warnings.push(RunWarning::run(format!("workbook generation failed: {}", e)));
                None
            }
        }
    }
}

/// Exit status plus the first stderr line of a failed process.
///
/// The full stderr is logged so the error stays on one line.
fn failure_reason(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        return output.status_text();
    }
    warn!(status = %output.status_text(), "collaborator stderr:\n{}", stderr);
    match stderr.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(first) => format!("{}: {}", output.status_text(), first),
        None => output.status_text(),
    }
}
