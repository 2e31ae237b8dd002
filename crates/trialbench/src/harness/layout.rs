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

//! On-disk layout of a run.
//!
//! ```text
//! <root>/
//! ├── casesets/<seed>/...              generated cases per iteration
//! ├── output/
//! │   ├── parties.txt, services.txt    sample pools
//! │   ├── csvs/<seed>.csv              raw executor stdout
//! │   └── explains/<seed>/<case>__<sql>.txt
//! ├── explains_all.txt
//! ├── summary.csv
//! └── summary.xlsx
//! ```

use crate::core::config::PoolKind;
use crate::error::{BenchError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of every artifact a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
}

impl RunLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the fixed directories.
    pub fn create(&self) -> Result<()> {
        for dir in [self.casesets_dir(), self.csvs_dir(), self.explains_dir()] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }

    /// Run root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parent of all per-iteration case directories.
    pub fn casesets_dir(&self) -> PathBuf {
        self.root.join("casesets")
    }

    /// Directory for intermediate outputs.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// Parent of the per-iteration CSV captures.
    pub fn csvs_dir(&self) -> PathBuf {
        self.output_dir().join("csvs")
    }

    /// Parent of the per-iteration explain directories.
    pub fn explains_dir(&self) -> PathBuf {
        self.output_dir().join("explains")
    }

    /// Sample file of a pool.
    pub fn pool_path(&self, kind: PoolKind) -> PathBuf {
        match kind {
            PoolKind::Party => self.output_dir().join("parties.txt"),
            PoolKind::Service => self.output_dir().join("services.txt"),
        }
    }

    /// Case directory of one iteration.
    pub fn iteration_cases(&self, name: &str) -> PathBuf {
        self.casesets_dir().join(name)
    }

    /// Captured executor stdout of one iteration.
    pub fn iteration_csv(&self, name: &str) -> PathBuf {
        self.csvs_dir().join(format!("{}.csv", name))
    }

    /// Explain directory of one iteration.
    pub fn iteration_explains(&self, name: &str) -> PathBuf {
        self.explains_dir().join(name)
    }

    /// Concatenated explain log.
    pub fn explains_all(&self) -> PathBuf {
        self.root.join("explains_all.txt")
    }

    /// Flat summary table.
    pub fn summary_csv(&self) -> PathBuf {
        self.root.join("summary.csv")
    }

    /// Workbook report.
    pub fn summary_xlsx(&self) -> PathBuf {
        self.root.join("summary.xlsx")
    }
}

/// Creates `path` and its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| BenchError::io(path, e))
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).map_err(|e| BenchError::io(path, e))
}
