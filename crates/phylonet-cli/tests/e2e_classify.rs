//! E2E CLI tests covering:
//! - `phylonet classify` on files and directories, CSV and JSON output
//! - the results file and `--no-append`
//! - invalid networks in directory mode
//! - `phylonet random` naming, reproducibility, and edge-list output
//!
//! Each test runs the `phylonet` binary as a subprocess in an isolated temp
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const GALL: &str = "r a\nr b\na h\nb h\nh x\na y\nb z\n";
const CHERRY: &str = "r x\nr y\n";
/// `v` has in-degree 2 and out-degree 2.
const FORBIDDEN: &str = "r a\nr b\na v\nb v\na p\nb q\nv x\nv y\n";

/// Build a Command targeting the phylonet binary, rooted in `dir`.
fn phylonet_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("phylonet"));
    cmd.current_dir(dir);
    cmd.env("PHYLONET_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd.env("HOME", dir);
    cmd
}

fn workspace() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write network");
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

#[test]
fn classify_prints_name_and_fragments() {
    let tmp = workspace();
    write(tmp.path(), "gall.txt", GALL);

    phylonet_cmd(tmp.path())
        .args(["classify", "gall.txt", "--props", "r,lvl,gt,tc,cp", "--no-append"])
        .assert()
        .success()
        .stdout("gall.txt;1;1;gt;tc;cp\n");

    assert!(!tmp.path().join("results.csv").exists());
}

#[test]
fn classify_appends_to_results_file() {
    let tmp = workspace();
    write(tmp.path(), "cherry.txt", CHERRY);

    for _ in 0..2 {
        phylonet_cmd(tmp.path())
            .args(["classify", "cherry.txt", "--props", "r,tc"])
            .assert()
            .success();
    }

    let results = std::fs::read_to_string(tmp.path().join("results.csv")).expect("results");
    assert_eq!(results, "cherry.txt;0;tc\ncherry.txt;0;tc\n");
}

#[test]
fn classify_uses_default_report_order() {
    let tmp = workspace();
    write(tmp.path(), "cherry.txt", CHERRY);

    phylonet_cmd(tmp.path())
        .args(["classify", "cherry.txt", "--no-append"])
        .assert()
        .success()
        .stdout("cherry.txt;0;0;0;0;0;0;0;0;0;0;tc;ntc;gs;ts;rv;cv;cp;ns;not gt;tb\n");
}

#[test]
fn classify_json_emits_one_object_per_network() {
    let tmp = workspace();
    write(tmp.path(), "gall.txt", GALL);

    let output = phylonet_cmd(tmp.path())
        .args([
            "classify",
            "gall.txt",
            "--props",
            "lvl,nd,gt",
            "--format",
            "json",
            "--no-append",
        ])
        .output()
        .expect("classify should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["name"], "gall.txt");
    assert_eq!(json["reticulations"], 1);
    assert_eq!(json["regularity"], 2);
    assert_eq!(json["properties"][0]["code"], "lvl");
    assert_eq!(json["properties"][0]["value"], 1);
    assert_eq!(json["properties"][1]["value"], 1);
    assert_eq!(json["properties"][2]["value"], true);
}

#[test]
fn classify_reads_project_config() {
    let tmp = workspace();
    write(tmp.path(), "gall.txt", GALL);
    write(
        tmp.path(),
        "phylonet.toml",
        "properties = [\"lvl\", \"ts\"]\nresults_file = \"out/classes.csv\"\n",
    );

    phylonet_cmd(tmp.path())
        .args(["classify", "gall.txt"])
        .assert()
        .success()
        .stdout("gall.txt;1;ts\n");

    let results =
        std::fs::read_to_string(tmp.path().join("out/classes.csv")).expect("configured results");
    assert_eq!(results, "gall.txt;1;ts\n");
}

#[test]
fn classify_directory_skips_invalid_networks() {
    let tmp = workspace();
    let data = tmp.path().join("data");
    std::fs::create_dir(&data).expect("mkdir");
    write(&data, "a_cherry.txt", CHERRY);
    write(&data, "b_bad.txt", FORBIDDEN);
    write(&data, "c_gall.txt", GALL);

    phylonet_cmd(tmp.path())
        .args(["classify", "--dir", "data", "--props", "r", "--no-append"])
        .assert()
        .failure()
        .stdout("a_cherry.txt;0\nc_gall.txt;1\n")
        .stderr(predicate::str::contains("v has indegree 2 & outdegree 2"))
        .stderr(predicate::str::contains("1 of 3 inputs could not be classified"));
}

#[test]
fn classify_rejects_unknown_codes() {
    let tmp = workspace();
    write(tmp.path(), "cherry.txt", CHERRY);

    phylonet_cmd(tmp.path())
        .args(["classify", "cherry.txt", "--props", "lvl,nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown property code: nope"));
}

#[test]
fn classify_needs_files_or_dir() {
    let tmp = workspace();
    phylonet_cmd(tmp.path()).args(["classify"]).assert().failure();
}

// ---------------------------------------------------------------------------
// random
// ---------------------------------------------------------------------------

#[test]
fn random_names_by_vertex_and_edge_count() {
    let tmp = workspace();
    phylonet_cmd(tmp.path())
        .args(["random", "21", "--mean", "0", "--seed", "3", "--props", "r", "--no-append"])
        .assert()
        .success()
        .stdout("(random-21-20);0\n");
}

#[test]
fn random_is_reproducible_with_a_seed() {
    let tmp = workspace();
    let run = || {
        phylonet_cmd(tmp.path())
            .args(["random", "41", "--seed", "17", "--count", "3", "--edges"])
            .output()
            .expect("random should not crash")
            .stdout
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn random_edges_round_trip_through_classify() {
    let tmp = workspace();
    let args = ["random", "31", "--seed", "5", "--mean", "4"];
    let edges = phylonet_cmd(tmp.path())
        .args(args)
        .arg("--edges")
        .output()
        .expect("random should not crash");
    assert!(edges.status.success());
    std::fs::write(tmp.path().join("generated.txt"), &edges.stdout).expect("write edges");

    let direct = phylonet_cmd(tmp.path())
        .args(args)
        .args(["--props", "r,lvl,tb", "--no-append"])
        .output()
        .expect("random should not crash");
    let direct = String::from_utf8(direct.stdout).expect("utf-8 report");
    let (_, fragments) = direct.split_once(';').expect("name;fragments");

    phylonet_cmd(tmp.path())
        .args(["classify", "generated.txt", "--props", "r,lvl,tb", "--no-append"])
        .assert()
        .success()
        .stdout(format!("generated.txt;{fragments}"));
}

#[test]
fn random_rejects_even_vertex_counts() {
    let tmp = workspace();
    phylonet_cmd(tmp.path())
        .args(["random", "20", "--no-append"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("even number of vertices"));
}

#[test]
fn completions_generate_a_script() {
    let tmp = workspace();
    phylonet_cmd(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phylonet"));
}
