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

//! Error types for trialbench operations.
//!
//! Only fatal conditions are errors. Executor failures and workbook failures
//! during a run are downgraded to warnings by the orchestrator, and malformed
//! benchmark values never surface at all (see [`crate::core::numeric`]).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for trialbench operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while running or reporting a benchmark.
///
/// Implements `Clone` so iteration results produced on worker threads can be
/// collected and re-ordered before the first failure is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Invalid configuration parameter
    #[error("Invalid configuration parameter '{parameter}': {reason}")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Reason for invalidity
        reason: String,
    },

    /// An external collaborator could not be started at all.
    #[error("Failed to launch '{command}': {message}")]
    Launch {
        /// Rendered command line
        command: String,
        /// Error message from the OS
        message: String,
    },

    /// Sample pool generation failed (non-zero exit or no output).
    #[error("Sample generation for {pool} pool failed: {reason}")]
    PoolGeneration {
        /// Pool kind (`party` or `service`)
        pool: String,
        /// Reason for failure
        reason: String,
    },

    /// Case generation failed for an iteration.
    #[error("Case generation failed for iteration {iteration}: {reason}")]
    CaseGeneration {
        /// Iteration directory name (padded seed)
        iteration: String,
        /// Reason for failure
        reason: String,
    },

    /// I/O operation failed.
    #[error("I/O error for '{}': {message}", .path.display())]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A required input file exists but holds no usable rows.
    #[error("Input '{}' has no rows", .path.display())]
    EmptyInput {
        /// The offending path
        path: PathBuf,
    },

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Workbook generation error.
    #[error("Workbook error: {0}")]
    Workbook(String),
}

impl BenchError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for BenchError {
    fn from(source: csv::Error) -> Self {
        Self::Csv(source.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for BenchError {
    fn from(source: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = BenchError::io(
            "out/summary.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/summary.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = BenchError::invalid_config("iterations", "must be >= 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration parameter 'iterations': must be >= 1"
        );
    }

    #[test]
    fn test_pool_generation_display() {
        let err = BenchError::PoolGeneration {
            pool: "party".to_string(),
            reason: "returned no data".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sample generation for party pool failed: returned no data"
        );
    }

    #[test]
    fn test_error_cloning() {
        let err = BenchError::CaseGeneration {
            iteration: "007".to_string(),
            reason: "exit code 2".to_string(),
        };
        assert_eq!(err.clone(), err);
    }
}
