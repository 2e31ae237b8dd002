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

//! External process invocation.
//!
//! Collaborators are run to completion with stdout and stderr fully
//! captured in memory. The [`CommandRunner`] trait is the seam tests use to
//! replace real processes.

use crate::core::config::ToolCommand;
use std::io;
use std::process::Command;

/// Captured result of one process invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Returns true if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status.
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external commands.
///
/// Implementations must be `Sync` so iterations can run on a thread pool.
pub trait CommandRunner: Sync {
    /// Runs `command` followed by `args`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns the OS error when the process cannot be started.
    fn run(&self, command: &ToolCommand, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .args(args)
            .output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
