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

//! Explain block extraction from executor diagnostics.
//!
//! The executor interleaves progress logging with query plans on stderr. A
//! plan starts with a header line
//!
//! ```text
//! EXPLAIN <sql-path> <case-path>
//! ```
//!
//! and runs until the next header or the end of the stream. [`ExplainParser`]
//! is a two-state machine (no block open / block open) fed one line at a
//! time; [`parse_explains`] runs it over a whole string.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Literal token that starts a header line.
pub const HEADER_TOKEN: &str = "EXPLAIN";

/// Identity of an explain block: case stem and artifact (SQL) stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExplainKey {
    /// Case file stem.
    pub case: String,
    /// SQL file stem.
    pub artifact: String,
}

impl ExplainKey {
    /// Creates a key from its parts.
    pub fn new(case: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            case: case.into(),
            artifact: artifact.into(),
        }
    }

    /// File name used for the block on disk: `<case>__<artifact>.txt`.
    pub fn file_name(&self) -> String {
        format!("{}__{}.txt", self.case, self.artifact)
    }
}

impl fmt::Display for ExplainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.case, self.artifact)
    }
}

/// A sealed explain block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainBlock {
    /// Block identity.
    pub key: ExplainKey,
    /// Lines after the header, verbatim.
    pub lines: Vec<String>,
}

impl ExplainBlock {
    /// Block text with trailing whitespace removed.
    pub fn text(&self) -> String {
        self.lines.join("\n").trim_end().to_string()
    }
}

/// Explain blocks of one stream, in order of first appearance of each key.
///
/// A key sealed twice keeps its original position; the later block's lines
/// replace the earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainBlocks {
    blocks: Vec<ExplainBlock>,
    index: HashMap<ExplainKey, usize>,
}

impl ExplainBlocks {
    fn seal(&mut self, block: ExplainBlock) {
        match self.index.get(&block.key) {
            Some(&pos) => self.blocks[pos] = block,
            None => {
                self.index.insert(block.key.clone(), self.blocks.len());
                self.blocks.push(block);
            }
        }
    }

    /// Lines of the block for `(case, artifact)`.
    pub fn get(&self, case: &str, artifact: &str) -> Option<&[String]> {
        self.index
            .get(&ExplainKey::new(case, artifact))
            .map(|&pos| self.blocks[pos].lines.as_slice())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if no block was found.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates blocks in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ExplainBlock> {
        self.blocks.iter()
    }
}

impl IntoIterator for ExplainBlocks {
    type Item = ExplainBlock;
    type IntoIter = std::vec::IntoIter<ExplainBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// A block header, with the derived key.
    Header(ExplainKey),
    /// Any other line.
    Text(&'a str),
}

/// Classifies a line as header or text.
///
/// A header is, after trimming, the token `EXPLAIN` followed by at least two
/// whitespace-separated tokens: the SQL path and the case path.
pub fn classify(line: &str) -> Line<'_> {
    let mut tokens = line.split_whitespace();
    if tokens.next() == Some(HEADER_TOKEN) {
        if let (Some(sql), Some(case)) = (tokens.next(), tokens.next()) {
            return Line::Header(ExplainKey::new(stem(case), stem(sql)));
        }
    }
    Line::Text(line)
}

/// File name without directories and without its last extension.
fn stem(token: &str) -> String {
    Path::new(token)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| token.to_string())
}

#[derive(Debug)]
enum State {
    Idle,
    InBlock(ExplainBlock),
}

/// Incremental explain block parser.
///
/// # Example
///
/// ```
/// use trialbench::explain::ExplainParser;
///
/// let mut parser = ExplainParser::new();
/// for line in ["noise", "EXPLAIN sql/q1.sql cases/c1.json", "Seq Scan"] {
///     parser.feed_line(line);
/// }
/// let blocks = parser.finish();
/// assert_eq!(blocks.get("c1", "q1").unwrap(), ["Seq Scan"]);
/// ```
#[derive(Debug)]
pub struct ExplainParser {
    state: State,
    blocks: ExplainBlocks,
}

impl ExplainParser {
    /// Creates a parser with no open block.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            blocks: ExplainBlocks::default(),
        }
    }

    /// Feeds one line (without its terminator).
    pub fn feed_line(&mut self, line: &str) {
        match classify(line) {
            Line::Header(key) => {
                self.flush();
                self.state = State::InBlock(ExplainBlock {
                    key,
                    lines: Vec::new(),
                });
            }
            Line::Text(text) => {
                if let State::InBlock(block) = &mut self.state {
                    block.lines.push(text.to_string());
                }
            }
        }
    }

    fn flush(&mut self) {
        if let State::InBlock(block) = std::mem::replace(&mut self.state, State::Idle) {
            self.blocks.seal(block);
        }
    }

    /// Seals any open block and returns everything collected.
    pub fn finish(mut self) -> ExplainBlocks {
        self.flush();
        self.blocks
    }
}

impl Default for ExplainParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `text` into explain blocks.
pub fn parse_explains(text: &str) -> ExplainBlocks {
    let mut parser = ExplainParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
