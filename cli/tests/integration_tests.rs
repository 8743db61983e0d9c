//! Integration tests for the subcommander binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn subcommander(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_subcommander"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run subcommander")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn resolve_json(tree: &str, args: &[&str]) -> serde_json::Value {
    let tree = fixture(tree);
    let mut argv = vec!["resolve", "--tree", tree.to_str().unwrap(), "--"];
    argv.extend_from_slice(args);

    let output = subcommander(&argv);
    assert!(output.status.success(), "resolve failed: {}", stderr(&output));
    serde_json::from_str(&stdout(&output))
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{}", stdout(&output)))
}

// ---- resolve ----

#[test]
fn test_resolve_flags_and_args() {
    let parsed = resolve_json("todo.yaml", &["add", "item1", "--dry-run", "item2", "--verbose"]);
    assert_eq!(parsed["command"], serde_json::json!(["todo", "add"]));
    assert_eq!(parsed["values"]["dry-run"], true);
    assert_eq!(parsed["values"]["verbose"], true);
    assert_eq!(parsed["values"]["version"], false);
    assert_eq!(parsed["args"], serde_json::json!(["item1", "item2"]));
    assert_eq!(parsed["executable"], false);
}

#[test]
fn test_resolve_end_of_options() {
    let parsed = resolve_json("todo.yaml", &["--verbose", "--", "nested", "sub", "--echo", "hello"]);
    assert_eq!(parsed["command"], serde_json::json!(["todo"]));
    assert_eq!(
        parsed["args"],
        serde_json::json!(["nested", "sub", "--echo", "hello"])
    );
}

#[test]
fn test_resolve_json_tree_with_int_option() {
    let parsed = resolve_json("echo.json", &["-times=3", "hello", "world"]);
    assert_eq!(parsed["values"]["times"], 3);
    assert_eq!(parsed["values"]["c"], false);
    assert_eq!(parsed["args"], serde_json::json!(["hello", "world"]));
}

#[test]
fn test_resolve_text_format() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&[
        "resolve",
        "--tree",
        tree.to_str().unwrap(),
        "--format",
        "text",
        "--",
        "nested",
        "sub",
        "--echo",
        "hi",
        "rest",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("command: todo nested sub\n"));
    assert!(text.contains("  -echo=\"hi\"\n"));
    assert!(text.contains("args:\n  rest"));
}

#[test]
fn test_resolve_help_token_prints_help() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&[
        "resolve",
        "--tree",
        tree.to_str().unwrap(),
        "--format",
        "text",
        "--",
        "nested",
        "--help",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Usage:\n  todo nested [flags] <command>"));
    assert!(text.contains("Available Commands:\n  hello\n  sub\n"));
    assert!(text.contains("Global Flags:"));
}

#[test]
fn test_resolve_unknown_command_suggests() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&["resolve", "--tree", tree.to_str().unwrap(), "--", "nestd"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error: unknown command \"nestd\". Did you mean one of these?"));
    assert!(err.contains("\tnested"));
}

#[test]
fn test_resolve_missing_required() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&["resolve", "--tree", tree.to_str().unwrap(), "--", "nested", "hello"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains(
        "command \"todo nested hello\": required flags \"-mandatory-flag, -another-mandatory-flag\" not set"
    ));
}

#[test]
fn test_resolve_sibling_flag_rejected() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&[
        "resolve",
        "--tree",
        tree.to_str().unwrap(),
        "--",
        "nested",
        "sub",
        "--dry-run",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("flag provided but not defined: --dry-run"));
}

// ---- validate ----

#[test]
fn test_validate_fixtures() {
    let todo = fixture("todo.yaml");
    let echo = fixture("echo.json");
    let output = subcommander(&["validate", todo.to_str().unwrap(), echo.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "Validated 2 tree definition file(s) with 6 command(s)."
    );
}

#[test]
fn test_validate_rejects_structural_errors() {
    let dir = tempfile::tempdir().unwrap();

    let spaced = dir.path().join("spaced.yaml");
    fs::write(&spaced, "name: root\ncommands:\n  - name: sub command\n").unwrap();
    let output = subcommander(&["validate", spaced.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("must be a single word"));

    let unregistered = dir.path().join("required.json");
    fs::write(&unregistered, r#"{"name":"root","required":["some-other-flag"]}"#).unwrap();
    let output = subcommander(&["validate", unregistered.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("required flag -some-other-flag not found in flag set"));
}

#[test]
fn test_validate_rejects_bad_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "name: app\noptions:\n  - name: count\n    kind: int\n    default: many\n",
    )
    .unwrap();

    let output = subcommander(&["validate", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is declared int but has a string default"));
}

// ---- suggest ----

#[test]
fn test_suggest_ranks_candidates() {
    let output = subcommander(&["suggest", "hello", "--candidates", "hello,world,help", "--limit", "2"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "hello\nhelp\n");
}

#[test]
fn test_suggest_no_match_prints_nothing() {
    let output = subcommander(&["suggest", "zzz", "--candidates", "alpha,beta"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

// ---- help ----

#[test]
fn test_help_json_for_subcommand() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&["help", "--tree", tree.to_str().unwrap(), "--format", "json", "nested", "sub"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["command"], "todo nested sub");
    assert_eq!(parsed["flags"][0]["name"], "-echo");
    assert_eq!(parsed["global_flags"].as_array().unwrap().len(), 3);
}

#[test]
fn test_help_unknown_path() {
    let tree = fixture("todo.yaml");
    let output = subcommander(&["help", "--tree", tree.to_str().unwrap(), "ad"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown command \"ad\""));
    assert!(stderr(&output).contains("\tadd"));
}
