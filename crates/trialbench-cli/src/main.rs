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

//! Trialbench Command Line Interface

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trialbench_cli::cli::Commands;

/// Trialbench - iterated query benchmark harness
///
/// Drives a sample generator, a case generator and a benchmark executor
/// through seeded iterations and reports per-(variant, case) latency and
/// buffer statistics.
///
/// # Examples
///
/// ```bash
/// # Three iterations starting at seed 100
/// trialbench run --party-pool 50 --service-pool 20 --generate-set "2,2,1" \
///     --sqls "sql/*.sql" --iterations 3 --seed 100
///
/// # Rebuild the workbook, one row per variant
/// trialbench report benchmark-20250101-1200/summary.csv --group-by variant
/// ```
#[derive(Parser)]
#[command(name = "trialbench")]
#[command(author, version, about = "Trialbench - iterated query benchmark harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "trialbench=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::Directive::from(tracing::Level::INFO)),
            ),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
