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

//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Test helper to create a trialbench command
fn trialbench_cmd() -> Command {
    Command::cargo_bin("trialbench").expect("Failed to find trialbench binary")
}

const SUMMARY: &str = "\
variant,case,category,party_count,service_count,exec_avg,exec_min,exec_max,exec_p50,exec_p95,exec_p99
v1,c1,small,2,2,10.0000,9.0000,11.0000,10.0000,10.9000,10.9800
v1,c2,small,2,2,12.0000,11.0000,13.0000,12.0000,12.9000,12.9800
v2,c1,small,2,2,8.0000,7.0000,9.0000,8.0000,8.9000,8.9800
";

// ===== Help and Version Tests =====

#[test]
fn test_help_output() {
    trialbench_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Trialbench - iterated query benchmark harness"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_version_output() {
    trialbench_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("trialbench"));
}

#[test]
fn test_no_subcommand_fails() {
    trialbench_cmd().assert().failure();
}

#[test]
fn test_run_help_lists_collaborators() {
    trialbench_cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sample-generator"))
        .stdout(predicate::str::contains("--case-generator"))
        .stdout(predicate::str::contains("--executor"))
        .stdout(predicate::str::contains("--padding"));
}

// ===== Run Argument Validation =====

#[test]
fn test_run_requires_pools() {
    trialbench_cmd()
        .args(["run", "--generate-set", "2,2,1", "--sqls", "*.sql", "--iterations", "1", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--party-pool"));
}

#[test]
fn test_run_rejects_zero_iterations_before_spawning() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("run");

    trialbench_cmd()
        .args(["run", "--party-pool", "5", "--service-pool", "5"])
        .args(["--generate-set", "2,2,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "0", "--seed", "100"])
        .arg("--out-dir")
        .arg(&root)
        .args(["--sample-generator", "trialbench-missing-tool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid configuration parameter 'iterations'"));

    assert!(!root.exists());
}

#[test]
fn test_run_rejects_malformed_generate_set() {
    let dir = TempDir::new().unwrap();

    trialbench_cmd()
        .args(["run", "--party-pool", "5", "--service-pool", "5"])
        .args(["--generate-set", "2,x,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "1", "--seed", "100"])
        .arg("--out-dir")
        .arg(dir.path().join("run"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("generate-set"));
}

#[test]
fn test_run_missing_sample_generator_is_fatal() {
    let dir = TempDir::new().unwrap();

    trialbench_cmd()
        .args(["run", "--party-pool", "5", "--service-pool", "5"])
        .args(["--generate-set", "2,2,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "1", "--seed", "100"])
        .arg("--out-dir")
        .arg(dir.path().join("run"))
        .args(["--sample-generator", "trialbench-missing-tool samples.py"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Failed to launch 'trialbench-missing-tool samples.py party 5'"));
}

#[test]
fn test_run_accepts_negative_seed() {
    let dir = TempDir::new().unwrap();

    // gets past argument parsing to the first collaborator launch
    trialbench_cmd()
        .args(["run", "--party-pool", "5", "--service-pool", "5"])
        .args(["--generate-set", "2,2,1", "--sqls", "sql/*.sql"])
        .args(["--iterations", "2", "--seed", "-5"])
        .arg("--out-dir")
        .arg(dir.path().join("run"))
        .args(["--sample-generator", "trialbench-missing-tool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to launch"));
}

// ===== Report Command =====

#[test]
fn test_report_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.csv");
    fs::write(&summary, SUMMARY).unwrap();
    let expected = dir.path().join("summary.xlsx");

    trialbench_cmd()
        .arg("report")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("summary.xlsx"));

    assert!(expected.is_file());
}

#[test]
fn test_report_custom_output_and_grouping() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.csv");
    fs::write(&summary, SUMMARY).unwrap();
    let out = dir.path().join("by-variant.xlsx");

    trialbench_cmd()
        .arg("report")
        .arg(&summary)
        .arg("--out")
        .arg(&out)
        .args(["--group-by", "variant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("by-variant.xlsx"));

    assert!(out.is_file());
}

#[test]
fn test_report_details_before_summary() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.csv");
    fs::write(&summary, SUMMARY).unwrap();
    let first = dir.path().join("100.csv");
    let second = dir.path().join("101.csv");
    fs::write(&first, "variant,case,exec_ms\nv1,c1,9.5\n").unwrap();
    fs::write(&second, "variant,case,exec_ms\nv1,c1,10.5\n").unwrap();

    // each --details takes exactly one value, so the positional is not swallowed
    trialbench_cmd()
        .arg("report")
        .arg("--details")
        .arg(&first)
        .arg("-d")
        .arg(&second)
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::contains("summary.xlsx"));

    assert!(dir.path().join("summary.xlsx").is_file());
}

#[test]
fn test_report_invalid_grouping() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.csv");
    fs::write(&summary, SUMMARY).unwrap();

    trialbench_cmd()
        .arg("report")
        .arg(&summary)
        .args(["--group-by", "category"])
        .assert()
        .failure();
}

#[test]
fn test_report_missing_summary() {
    trialbench_cmd()
        .args(["report", "/nonexistent/summary.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: File not found"));
}

#[test]
fn test_report_empty_summary() {
    let dir = TempDir::new().unwrap();
    let summary = dir.path().join("summary.csv");
    fs::write(&summary, "variant,case,exec_avg\n").unwrap();

    trialbench_cmd()
        .arg("report")
        .arg(&summary)
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no rows"));
}
