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

//! Run configuration.
//!
//! Provides [`RunConfig`], the single value that describes one iterated
//! benchmark run: pool sizes, generation set, SQL glob, iteration count,
//! seeding, output layout and the external collaborator commands.

use crate::error::{BenchError, Result};
use std::fmt;
use std::path::PathBuf;

/// Default zero-padding width for iteration directory names.
pub const DEFAULT_PADDING: usize = 3;

/// Largest accepted padding width.
pub const MAX_PADDING: usize = 20;

/// Default sample generator command line.
pub const DEFAULT_SAMPLE_GENERATOR: &str = "python3 generate_samples.py";

/// Default case generator command line.
pub const DEFAULT_CASE_GENERATOR: &str = "python3 generate_cases.py";

/// Default benchmark executor command line.
pub const DEFAULT_EXECUTOR: &str = "python3 run_benchmark.py";

/// Sample pool kinds understood by the sample generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Party identifiers.
    Party,
    /// Service resource identifiers.
    Service,
}

impl PoolKind {
    /// Argument passed to the sample generator.
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolKind::Party => "party",
            PoolKind::Service => "service",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external program plus the arguments that always precede the
/// per-call arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to execute.
    pub program: String,
    /// Leading arguments (for example a script path).
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Creates a command from a program name.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a leading argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Splits a whitespace-separated command line into program and args.
    ///
    /// No shell quoting is interpreted.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::InvalidConfig`] for a blank command line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| BenchError::invalid_config("command", "command line is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Renders the command with extra arguments, for logging.
    pub fn render(&self, extra: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(extra.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One `parties,services,groups` tuple of a generation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTuple {
    /// Parties per case.
    pub parties: u32,
    /// Services per case.
    pub services: u32,
    /// Number of case groups.
    pub groups: u32,
}

/// Semicolon-separated list of generation tuples, e.g. `"2,2,1;10,5,3"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSet {
    tuples: Vec<GenerationTuple>,
}

impl GenerationSet {
    /// Parses and validates a generation-set descriptor.
    ///
    /// Whitespace around numbers and empty segments (a trailing `;`) are
    /// tolerated.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut tuples = Vec::new();
        for segment in spec.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let numbers = segment
                .split(',')
                .map(|n| n.trim().parse::<u32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| {
                    BenchError::invalid_config(
                        "generate-set",
                        format!("'{}' is not a list of non-negative integers", segment),
                    )
                })?;
            match numbers[..] {
                [parties, services, groups] => tuples.push(GenerationTuple {
                    parties,
                    services,
                    groups,
                }),
                _ => {
                    return Err(BenchError::invalid_config(
                        "generate-set",
                        format!("'{}' must be parties,services,groups", segment),
                    ))
                }
            }
        }
        if tuples.is_empty() {
            return Err(BenchError::invalid_config(
                "generate-set",
                "at least one parties,services,groups tuple is required",
            ));
        }
        Ok(Self { tuples })
    }

    /// Parsed tuples in input order.
    pub fn tuples(&self) -> &[GenerationTuple] {
        &self.tuples
    }
}

impl fmt::Display for GenerationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.tuples.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{},{},{}", t.parties, t.services, t.groups)?;
        }
        Ok(())
    }
}

/// Configuration for one iterated benchmark run.
///
/// # Example
///
/// ```no_run
/// use trialbench::core::config::{GenerationSet, RunConfig};
///
/// let config = RunConfig::new(
///     "runs/today",
///     GenerationSet::parse("2,2,1").unwrap(),
///     "sql/*.sql",
/// )
/// .with_pools(50, 20)
/// .with_iterations(10)
/// .with_seed(100)
/// .with_jobs(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Root directory of the run (created if missing).
    pub root_dir: PathBuf,
    /// Party pool size.
    pub party_pool: u32,
    /// Service pool size.
    pub service_pool: u32,
    /// Case generation set.
    pub generate_set: GenerationSet,
    /// Glob of SQL files handed to the executor.
    pub sqls: String,
    /// Number of iterations.
    pub iterations: u32,
    /// Base seed; iteration `i` uses `seed + i`. May be negative.
    pub seed: i64,
    /// Zero-padding width of iteration directory names.
    pub padding: usize,
    /// Worker threads for iterations (1 = sequential).
    pub jobs: usize,
    /// Sample generator command.
    pub sample_generator: ToolCommand,
    /// Case generator command.
    pub case_generator: ToolCommand,
    /// Benchmark executor command.
    pub executor: ToolCommand,
    /// Whether to emit `summary.xlsx`.
    pub workbook: bool,
}

impl RunConfig {
    /// Creates a configuration with default pools, one iteration and seed 0.
    pub fn new(root_dir: impl Into<PathBuf>, generate_set: GenerationSet, sqls: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            party_pool: 1,
            service_pool: 1,
            generate_set,
            sqls: sqls.into(),
            iterations: 1,
            seed: 0,
            padding: DEFAULT_PADDING,
            jobs: 1,
            sample_generator: default_command(DEFAULT_SAMPLE_GENERATOR),
            case_generator: default_command(DEFAULT_CASE_GENERATOR),
            executor: default_command(DEFAULT_EXECUTOR),
            workbook: true,
        }
    }

    /// Sets the party and service pool sizes.
    pub fn with_pools(mut self, party_pool: u32, service_pool: u32) -> Self {
        self.party_pool = party_pool;
        self.service_pool = service_pool;
        self
    }

    /// Sets the iteration count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the iteration directory padding width.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Replaces the collaborator commands.
    pub fn with_tools(mut self, samples: ToolCommand, cases: ToolCommand, executor: ToolCommand) -> Self {
        self.sample_generator = samples;
        self.case_generator = cases;
        self.executor = executor;
        self
    }

    /// Enables or disables workbook output.
    pub fn with_workbook(mut self, enabled: bool) -> Self {
        self.workbook = enabled;
        self
    }

    /// Seed used by iteration `index`.
    pub fn iteration_seed(&self, index: u32) -> i64 {
        self.seed.saturating_add(i64::from(index))
    }

    /// Directory name of iteration `index`: the seed, zero padded.
    pub fn iteration_name(&self, index: u32) -> String {
        format!("{:0width$}", self.iteration_seed(index), width = self.padding)
    }

    /// Checks the configuration before any process is started.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(BenchError::invalid_config("iterations", "must be >= 1"));
        }
        if self.party_pool < 1 || self.service_pool < 1 {
            return Err(BenchError::invalid_config(
                "party-pool/service-pool",
                "must be >= 1",
            ));
        }
        if self.jobs < 1 {
            return Err(BenchError::invalid_config("jobs", "must be >= 1"));
        }
        if self.padding > MAX_PADDING {
            return Err(BenchError::invalid_config(
                "padding",
                format!("must be <= {}", MAX_PADDING),
            ));
        }
        if self.sqls.trim().is_empty() {
            return Err(BenchError::invalid_config("sqls", "glob is empty"));
        }
        if self.seed.checked_add(i64::from(self.iterations)).is_none() {
            return Err(BenchError::invalid_config("seed", "seed + iterations overflows"));
        }
        Ok(())
    }
}

fn default_command(line: &str) -> ToolCommand {
    let mut parts = line.split_whitespace();
    let mut command = ToolCommand::new(parts.next().unwrap_or_default());
    for part in parts {
        command = command.arg(part);
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig::new("out", GenerationSet::parse("2,2,1").unwrap(), "sql/*.sql")
    }

    #[test]
    fn test_generation_set_parse() {
        let set = GenerationSet::parse("2,2,1; 10, 5, 3;").unwrap();
        assert_eq!(set.tuples().len(), 2);
        assert_eq!(set.tuples()[1].services, 5);
        assert_eq!(set.to_string(), "2,2,1;10,5,3");
    }

    #[test]
    fn test_generation_set_rejects_malformed() {
        assert!(GenerationSet::parse("").is_err());
        assert!(GenerationSet::parse("2,2").is_err());
        assert!(GenerationSet::parse("2,x,1").is_err());
        assert!(GenerationSet::parse("2,2,1,4").is_err());
    }

    #[test]
    fn test_tool_command_parse() {
        let cmd = ToolCommand::parse("python3  run_benchmark.py --verbose").unwrap();
        assert_eq!(cmd.program, "python3");
        assert_eq!(cmd.args, vec!["run_benchmark.py", "--verbose"]);
        assert_eq!(
            cmd.render(&["--csv".to_string()]),
            "python3 run_benchmark.py --verbose --csv"
        );
        assert!(ToolCommand::parse("   ").is_err());
    }

    #[test]
    fn test_default_tools() {
        let config = config();
        assert_eq!(config.sample_generator.program, "python3");
        assert_eq!(config.executor.args, vec!["run_benchmark.py"]);
    }

    #[test]
    fn test_iteration_naming() {
        let config = config().with_seed(7);
        assert_eq!(config.iteration_seed(2), 9);
        assert_eq!(config.iteration_name(2), "009");
        assert_eq!(config.with_padding(0).iteration_name(0), "7");
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());
        assert!(config().with_iterations(0).validate().is_err());
        assert!(config().with_pools(0, 5).validate().is_err());
        assert!(config().with_jobs(0).validate().is_err());
        assert!(config().with_padding(64).validate().is_err());
        assert!(config().with_seed(i64::MAX).validate().is_err());
        assert!(config().with_seed(i64::MIN).validate().is_ok());
    }

    #[test]
    fn test_negative_seed_naming() {
        let config = config().with_seed(-2);
        assert!(config.validate().is_ok());
        assert_eq!(config.iteration_seed(0), -2);
        assert_eq!(config.iteration_name(0), "-02");
        assert_eq!(config.iteration_name(2), "000");
        assert_eq!(config.iteration_name(3), "001");
    }
}
