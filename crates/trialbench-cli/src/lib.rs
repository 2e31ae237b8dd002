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

//! Command-line front end for trialbench.
//!
//! # Commands
//!
//! - **run**: Generate pools, run N seeded iterations and write the
//!   summary CSV, explain log and workbook
//! - **report**: Rebuild the workbook from an existing `summary.csv`
//!
//! Logs go to stderr (filtered by `RUST_LOG`, default `trialbench=info`).
//! Stdout carries only the produced path, so the binary composes in scripts.

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;
