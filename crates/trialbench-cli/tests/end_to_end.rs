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

//! End-to-end runs of the `trialbench` binary with shell-script collaborators.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLES_SCRIPT: &str = r#"
kind="$1"; count="$2"
i=0
while [ "$i" -lt "$count" ]; do echo "$kind-$i"; i=$((i + 1)); done
"#;

const CASES_SCRIPT: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    --out-dir) out="$2"; shift ;;
    --seed) seed="$2"; shift ;;
  esac
  shift
done
echo "{\"seed\": $seed}" > "$out/case_a.json"
"#;

// Fails for the iteration whose case directory is named 101.
const EXECUTOR_SCRIPT: &str = r#"
cases="$2"
echo "variant,case,category,party_count,service_count,exec_ms,shared_read,shared_hit"
echo "v1,case_a,small,2,2,1.5,3,40"
echo "v2,case_a,small,2,2,2.5,4,41"
echo "EXPLAIN sql/v1.sql cases/case_a.json" >&2
echo "Seq Scan on parties" >&2
case "$cases" in
  */101/*) exit 1 ;;
esac
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn sh(script: &Path) -> String {
    format!("sh {}", script.display())
}

#[test]
fn test_run_with_failing_executor_iteration() {
    let dir = TempDir::new().unwrap();
    let samples = write_script(dir.path(), "samples.sh", SAMPLES_SCRIPT);
    let cases = write_script(dir.path(), "cases.sh", CASES_SCRIPT);
    let executor = write_script(dir.path(), "executor.sh", EXECUTOR_SCRIPT);
    let root = dir.path().join("run");

    Command::cargo_bin("trialbench")
        .unwrap()
        .args(["run", "--party-pool", "5", "--service-pool", "5"])
        .args(["--generate-set", "2,2,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "3", "--seed", "100"])
        .arg("--out-dir")
        .arg(&root)
        .args(["--sample-generator", &sh(&samples)])
        .args(["--case-generator", &sh(&cases)])
        .args(["--executor", &sh(&executor)])
        .assert()
        .success()
        .stdout(predicate::str::contains(root.display().to_string()))
        .stderr(predicate::str::contains("Completed:"))
        .stderr(predicate::str::contains("executor returned exit code 1"));

    assert_eq!(fs::read_to_string(root.join("output/parties.txt")).unwrap().lines().count(), 5);
    assert!(root.join("casesets/101/case_a.json").is_file());
    for name in ["100", "101", "102"] {
        assert!(root.join("output/csvs").join(format!("{}.csv", name)).is_file());
        assert_eq!(
            fs::read_to_string(root.join("output/explains").join(name).join("case_a__v1.txt")).unwrap(),
            "Seq Scan on parties\n"
        );
    }

    let summary = fs::read_to_string(root.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("v1,case_a,small,2,2,1.5000,1.5000,1.5000,1.5000,1.5000,1.5000,3.00,3,3,3,3,3,40.00"));
    assert!(lines[2].starts_with("v2,case_a,small,2,2,2.5000"));

    let catalog = fs::read_to_string(root.join("explains_all.txt")).unwrap();
    assert_eq!(catalog.matches("== case_a__v1.txt ==").count(), 3);
    assert!(root.join("summary.xlsx").is_file());
}

#[test]
fn test_failing_case_generator_stops_run() {
    let dir = TempDir::new().unwrap();
    let samples = write_script(dir.path(), "samples.sh", SAMPLES_SCRIPT);
    let cases = write_script(dir.path(), "cases.sh", "echo 'invalid generate set' >&2; exit 2\n");
    let executor = write_script(dir.path(), "executor.sh", EXECUTOR_SCRIPT);
    let root = dir.path().join("run");

    Command::cargo_bin("trialbench")
        .unwrap()
        .args(["run", "--party-pool", "2", "--service-pool", "2"])
        .args(["--generate-set", "2,2,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "2", "--seed", "7"])
        .arg("--out-dir")
        .arg(&root)
        .args(["--sample-generator", &sh(&samples)])
        .args(["--case-generator", &sh(&cases)])
        .args(["--executor", &sh(&executor)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Case generation failed for iteration 007"))
        .stderr(predicate::str::contains("invalid generate set"));

    assert!(root.join("output/parties.txt").is_file());
    assert!(!root.join("summary.csv").exists());
}
