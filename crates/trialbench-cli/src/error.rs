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

//! Error type for the trialbench CLI.
//!
//! Library failures are wrapped unchanged so the one-line diagnostic printed
//! by `main` is the library's own message.

use std::path::PathBuf;
use thiserror::Error;
use trialbench::BenchError;

/// Errors returned by CLI commands.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// A benchmark or report operation failed.
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// A command-line value could not be interpreted.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Flag name
        name: String,
        /// Reason for rejection
        reason: String,
    },

    /// A required input file is missing.
    #[error("File not found: '{}'", .path.display())]
    NotFound {
        /// The missing path
        path: PathBuf,
    },
}

impl CliError {
    /// Create an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_error_is_transparent() {
        let inner = BenchError::invalid_config("iterations", "must be >= 1");
        let err = CliError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::invalid_argument("executor", "command line is empty");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'executor': command line is empty"
        );
    }
}
