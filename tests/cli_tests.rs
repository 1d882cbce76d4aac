//! Exit status and output of the template-verifier binary
//!
//! Every run uses an empty working directory and a cleared environment so no
//! stray configuration is picked up.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn verifier(workdir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_template-verifier"))
        .args(args)
        .current_dir(workdir.path())
        .env_clear()
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// Exit status
// =============================================================================

#[test]
fn test_pass_exits_zero() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");
    let added = fixture("added_fields.json");

    let output = verifier(&workdir, &["--mode", "production", path_arg(&master), path_arg(&added)]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- PASS ---"));
    assert!(stdout.contains("\n\tmessage 'CompletePingCheck' added\n"));
}

#[test]
fn test_fail_exits_one() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");
    let removed = fixture("removed_field.json");

    let output = verifier(&workdir, &["--mode", "production", path_arg(&master), path_arg(&removed)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stdout).unwrap().contains("*** FAIL ***"));

    let output = verifier(&workdir, &["--mode", "development", path_arg(&master), path_arg(&removed)]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_unreadable_template_exits_two() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");
    let truncated = fixture("truncated.json");

    let output = verifier(&workdir, &[path_arg(&master), path_arg(&truncated)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Cannot parse candidate template"));

    let missing = workdir.path().join("absent.json");
    let output = verifier(&workdir, &[path_arg(&master), path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(2));
}

// =============================================================================
// Input resolution
// =============================================================================

#[test]
fn test_single_file_without_configured_baseline_exits_two() {
    let workdir = tempfile::tempdir().unwrap();
    let removed = fixture("removed_field.json");

    let output = verifier(&workdir, &[path_arg(&removed)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("No baseline schema given and none configured"));
}

#[test]
fn test_configured_baseline_and_candidate() {
    let workdir = tempfile::tempdir().unwrap();
    let config = workdir.path().join("verifier.toml");
    std::fs::write(
        &config,
        format!(
            "[verifier]\nmode = \"production\"\nbaseline = {:?}\ncandidate = {:?}\n",
            path_arg(&fixture("master_template.json")),
            path_arg(&fixture("mixed_changes.json")),
        ),
    )
    .unwrap();

    let output = verifier(&workdir, &["--config", path_arg(&config)]);
    assert_eq!(output.status.code(), Some(1));

    let added = fixture("added_fields.json");
    let output = verifier(&workdir, &["--config", path_arg(&config), path_arg(&added)]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_too_many_files_is_a_usage_error() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");

    let output = verifier(&workdir, &[path_arg(&master), path_arg(&master), path_arg(&master)]);
    assert_eq!(output.status.code(), Some(2));
}

// =============================================================================
// Output
// =============================================================================

#[test]
fn test_json_stdout_is_only_the_report() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");
    let removed = fixture("removed_field.json");

    let output = verifier(
        &workdir,
        &["--format", "json", "--mode", "production", path_arg(&master), path_arg(&removed)],
    );
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accepted"], false);
    assert_eq!(report["verdict"], "older");
    assert_eq!(report["reasons"][0], "message 'AgentUpdate': property 'Flags' removed");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("base: "));
    assert!(stderr.contains("current: "));
}

#[test]
fn test_report_written_to_file() {
    let workdir = tempfile::tempdir().unwrap();
    let master = fixture("master_template.json");
    let report_path = workdir.path().join("report.json");

    let output = verifier(
        &workdir,
        &["--format", "json", "--output", path_arg(&report_path), path_arg(&master), path_arg(&master)],
    );
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["verdict"], "same");
    assert_eq!(report["baseline_checksum"], report["candidate_checksum"]);
}
