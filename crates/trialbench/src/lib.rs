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

//! Iterated query benchmark harness.
//!
//! Trialbench drives three external collaborators (a sample generator, a case
//! generator and a benchmark executor) through N seeded iterations, then
//! reduces every measured row into per-(variant, case) statistics.
//!
//! # Pipeline
//!
//! 1. Generate the party and service sample pools.
//! 2. For each iteration, generate cases with `seed + i` and run the executor,
//!    capturing its CSV stdout and `EXPLAIN` blocks from stderr.
//! 3. Fold all rows into an [`harness::Aggregator`] and compute avg, min,
//!    max, p50, p95 and p99 of latency and buffer counters.
//! 4. Write `summary.csv`, `explains_all.txt` and `summary.xlsx`.
//!
//! # Modules
//!
//! - [`core`]: Configuration, records, numeric parsing and statistics
//! - [`explain`]: Explain block parser
//! - [`harness`]: Orchestrator, process seam and aggregation
//! - [`reporters`]: Summary CSV and workbook output
//!
//! # Workbook statistics
//!
//! The workbook's Summary sheet averages the percentile columns of
//! `summary.csv` within each group. The result is a mean of percentiles, not
//! a percentile of the pooled samples. It is kept that way to match existing
//! reports; use `summary.csv` for exact per-group figures.

pub mod core;
pub mod error;
pub mod explain;
pub mod harness;
pub mod reporters;

pub use error::{BenchError, Result};
pub use explain::{parse_explains, ExplainBlock, ExplainBlocks, ExplainKey, ExplainParser};
pub use harness::{CancelToken, CommandRunner, Orchestrator, RunOutcome, SystemRunner};
