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

//! Core data model and statistics.
//!
//! # Modules
//!
//! - `config`: Run configuration and collaborator commands
//! - `numeric`: Best-effort numeric parsing
//! - `record`: Trial records, group keys and CSV tables
//! - `stats`: Percentile engine and metric summarizer

pub mod config;
pub mod numeric;
pub mod record;
pub mod stats;

pub use config::{GenerationSet, GenerationTuple, PoolKind, RunConfig, ToolCommand};
pub use numeric::{parse_count, parse_float, parse_size};
pub use record::{CsvTable, GroupKey, TrialRow, TRIAL_COLUMNS};
pub use stats::{mean, percentile, summarize, SummaryStats};
