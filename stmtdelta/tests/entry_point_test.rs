//! Tests for entry_point.rs: argument handling, settings and exit codes.
#![cfg(feature = "cst")]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use stmtdelta::entry_point::{
    run_with_args, run_with_args_to, EXIT_OK, EXIT_OUT_OF_RANGE, EXIT_USAGE,
};
use tempfile::{tempdir, TempDir};

const PROGRAM: &str = "\
int main(void) {
  int x = 1;
  x = x + 2;
  if (x) { x--; }
  return x;
}
";

const PREPROCESSED: &str = "\
# 1 \"prog.c\"
# 1 \"lib.h\" 1
static int h(void) { return 1; }
# 2 \"prog.c\" 2
int main(void) { return h(); }
";

fn setup(source: &str) -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prog.c");
    fs::write(&path, source).unwrap();
    let path = path.to_string_lossy().to_string();
    (dir, path)
}

fn run(args: &[&str]) -> (i32, String) {
    let mut out = Vec::new();
    let code = run_with_args_to(args.iter().map(|&a| a.to_owned()).collect(), &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

fn json(out: &str) -> serde_json::Value {
    serde_json::from_str(out).unwrap()
}

/// Test that --version flag works correctly.
#[test]
fn test_version_flag() {
    let result = run_with_args(vec!["--version".to_owned()]);
    assert_eq!(result.unwrap(), EXIT_OK);
}

#[test]
fn test_query_instances_line() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[&path, "--query-instances"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(out, "Available transformation instances: 7\n");

    let (_, out) = run(&[&path, "--query-instances", "--policy", "statement"]);
    assert_eq!(out, "Available transformation instances: 5\n");
}

#[test]
fn test_query_instances_json() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[&path, "--query-instances", "--json"]);
    assert_eq!(code, EXIT_OK);
    let value = json(&out);
    assert_eq!(value["transformation"], "remove-stmt");
    assert_eq!(value["policy"], "nested-expr");
    assert_eq!(value["instances"], 7);
}

#[test]
fn test_list_instances_json() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[&path, "--list-instances", "--json"]);
    assert_eq!(code, EXIT_OK);
    let value = json(&out);
    let instances = value["instances"].as_array().unwrap();
    assert_eq!(instances.len(), 7);
    assert_eq!(instances[0]["counter"], 7);
    assert_eq!(instances[0]["kind"], "compound");
    assert_eq!(instances[0]["subsumed"], 6);
    assert_eq!(instances[1]["kind"], "declaration");
    assert_eq!(instances[1]["line"], 2);
    assert_eq!(instances[1]["column"], 3);
    assert_eq!(instances[6]["counter"], 1);
    assert_eq!(instances[6]["snippet"], "return x;");
}

#[test]
fn test_list_instances_table() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[&path, "--list-instances"]);
    assert_eq!(code, EXIT_OK);
    assert!(out.contains("return x;"));
    assert!(out.contains("Available transformation instances:"));
}

#[test]
fn test_counter_one_removes_last_statement() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[&path, "--counter", "1"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(
        out,
        "int main(void) {\n  int x = 1;\n  x = x + 2;\n  if (x) { x--; }\n  \n}\n"
    );
}

#[test]
fn test_window_removes_if_with_its_block() {
    let (_dir, path) = setup(PROGRAM);
    // `if` is counter 4 with two candidates beneath it
    let (code, out) = run(&[&path, "--counter", "2", "--to-counter", "4"]);
    assert_eq!(code, EXIT_OK);
    assert_eq!(
        out,
        "int main(void) {\n  int x = 1;\n  x = x + 2;\n  \n  return x;\n}\n"
    );
}

#[test]
fn test_output_file_and_json_report() {
    let (dir, path) = setup(PROGRAM);
    let target = dir.path().join("out.c");
    let target_str = target.to_string_lossy().to_string();
    let (code, out) = run(&[&path, "--counter", "1", "-o", &target_str, "--json"]);
    assert_eq!(code, EXIT_OK);

    let value = json(&out);
    assert_eq!(value["removed"][0]["counter"], 1);
    assert_eq!(value["removed"][0]["kind"], "other");
    assert!(value.get("text").is_none());

    let written = fs::read_to_string(&target).unwrap();
    assert!(!written.contains("return x;"));
    // the input file is never modified
    assert_eq!(fs::read_to_string(&path).unwrap(), PROGRAM);
}

#[test]
fn test_out_of_range_counter() {
    let (dir, path) = setup(PROGRAM);
    let target = dir.path().join("out.c");
    let target_str = target.to_string_lossy().to_string();
    let (code, out) = run(&[&path, "--counter", "8", "-o", &target_str]);
    assert_eq!(code, EXIT_OUT_OF_RANGE);
    assert!(out.is_empty());
    assert!(!target.exists());
}

#[test]
fn test_invalid_windows_are_usage_errors() {
    let (_dir, path) = setup(PROGRAM);
    assert_eq!(run(&[&path, "--counter", "0"]).0, EXIT_USAGE);
    assert_eq!(run(&[&path, "--counter", "3", "--to-counter", "2"]).0, EXIT_USAGE);
    assert_eq!(run(&[&path]).0, EXIT_USAGE);
    assert_eq!(run(&[&path, "--counter", "1", "--policy", "all"]).0, EXIT_USAGE);
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.c");
    let (code, out) = run(&[&missing.to_string_lossy(), "--query-instances"]);
    assert_eq!(code, EXIT_USAGE);
    assert!(out.is_empty());
}

#[test]
fn test_line_markers_protect_included_code() {
    let (_dir, path) = setup(PREPROCESSED);
    let (_, out) = run(&[&path, "--query-instances", "--policy", "statement"]);
    assert_eq!(out, "Available transformation instances: 2\n");

    let (_, out) = run(&[
        &path,
        "--query-instances",
        "--policy",
        "statement",
        "--no-line-markers",
    ]);
    assert_eq!(out, "Available transformation instances: 4\n");

    // naming the header as main file flips which function is editable
    let (_, out) = run(&[
        &path,
        "--list-instances",
        "--json",
        "--policy",
        "statement",
        "--main-file",
        "lib.h",
    ]);
    let value = json(&out);
    let snippets: Vec<&str> = value["instances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["snippet"].as_str().unwrap())
        .collect();
    assert_eq!(snippets, vec!["{ return 1; }", "return 1;"]);
}

#[test]
fn test_removal_keeps_included_text() {
    let (_dir, path) = setup(PREPROCESSED);
    let (code, out) = run(&[&path, "--counter", "1", "--to-counter", "2"]);
    assert_eq!(code, EXIT_OK);
    assert!(out.contains("static int h(void) { return 1; }"));
    assert!(out.ends_with("int main(void) \n"));
}

fn write_config(dir: &Path, body: &str) {
    fs::write(dir.join(".stmtdelta.toml"), body).unwrap();
}

#[test]
fn test_config_file_sets_defaults() {
    let (dir, path) = setup(PREPROCESSED);
    write_config(
        dir.path(),
        "[stmtdelta]\npolicy = \"statement\"\nrespect_line_markers = false\n",
    );
    let (_, out) = run(&[&path, "--query-instances"]);
    assert_eq!(out, "Available transformation instances: 4\n");

    // command-line policy wins over the file
    let (_, out) = run(&[&path, "--query-instances", "--policy", "single"]);
    assert_eq!(out, "Available transformation instances: 4\n");
    let (_, out) = run(&[&path, "--query-instances", "--policy", "nested-expr"]);
    assert_eq!(out, "Available transformation instances: 4\n");
}

#[test]
fn test_single_policy_ignores_window_width() {
    let (_dir, path) = setup(PROGRAM);
    let (code, out) = run(&[
        &path,
        "--counter",
        "1",
        "--to-counter",
        "5",
        "--policy",
        "single",
        "--json",
    ]);
    assert_eq!(code, EXIT_OK);
    let value = json(&out);
    assert_eq!(value["removed"].as_array().unwrap().len(), 1);
    assert_eq!(value["policy"], "single");
}
