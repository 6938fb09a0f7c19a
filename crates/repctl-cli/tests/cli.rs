#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Nothing listens here; tests below must fail before any request is made.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

fn repctl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("repctl").expect("binary should be built");
    cmd.env_remove("REPTOR_KEY").env_remove("RUST_LOG");
    cmd
}

fn write_snippet(dir: &Path, name: &str, template_id: &str, lang: &str, is_main: bool) {
    let body = json!({
        "templateId": template_id,
        "lang": lang,
        "isMain": is_main,
        "tags": ["scuba"],
        "sysReptorFields": {"title": template_id}
    });
    fs::write(dir.join(name), serde_json::to_vec(&body).unwrap()).unwrap();
}

fn snippet_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_snippet(dir.path(), "aad-1.en.json", "aad-1", "en-US", true);
    write_snippet(dir.path(), "aad-1.de.json", "aad-1", "de-DE", false);
    write_snippet(dir.path(), "c1.en.json", "MS.AAD.1.1v1", "en-US", true);
    dir
}

fn write_report(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ScubaResults.json");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn load_templates_requires_api_key() {
    let snippets = snippet_dir();

    repctl_cmd()
        .arg("load-templates")
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key provided"));
}

#[test]
fn load_findings_requires_api_key() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), r#"{"Results": {}}"#);

    repctl_cmd()
        .args(["load-findings", "scuba"])
        .arg(format!("{UNREACHABLE_URL}/projects/abc/"))
        .arg(report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("REPTOR_KEY"));
}

#[test]
fn dry_run_assembles_templates() {
    let snippets = snippet_dir();

    repctl_cmd()
        .args(["load-templates", "--api-key", "k", "--dry-run"])
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Templates created: 2"));
}

#[test]
fn api_key_is_read_from_environment() {
    let snippets = snippet_dir();

    repctl_cmd()
        .env("REPTOR_KEY", "from-env")
        .args(["load-templates", "--dry-run"])
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .assert()
        .success();
}

#[test]
fn dry_run_json_summary_is_valid() {
    let snippets = snippet_dir();

    let output = repctl_cmd()
        .args(["--format", "json", "load-templates", "--api-key", "k", "--dry-run"])
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(parsed["created"], 2);
    assert_eq!(parsed["updated"], 0);
}

#[test]
fn duplicate_main_translation_fails_without_network() {
    let snippets = snippet_dir();
    write_snippet(snippets.path(), "aad-1.fr.json", "AAD 1", "fr-FR", true);

    repctl_cmd()
        .args(["load-templates", "--api-key", "k"])
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple main translations"));
}

#[test]
fn duplicate_language_fails_without_network() {
    let snippets = snippet_dir();
    write_snippet(snippets.path(), "c1.en2.json", "ms.aad.1.1v1", "en-US", false);

    repctl_cmd()
        .args(["load-templates", "--api-key", "k"])
        .arg(UNREACHABLE_URL)
        .arg(snippets.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple en-US translations"));
}

#[test]
fn invalid_project_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), r#"{"Results": {}}"#);

    repctl_cmd()
        .args(["load-findings", "--api-key", "k", "scuba"])
        .arg(format!("{UNREACHABLE_URL}/dashboard/"))
        .arg(report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid project URL"));
}

#[test]
fn wrong_report_file_is_rejected_before_import() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "[1,2,3]");

    repctl_cmd()
        .args(["load-findings", "--api-key", "k", "scuba"])
        .arg(format!("{UNREACHABLE_URL}/projects/abc/"))
        .arg(report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong file"));
}

#[test]
fn report_without_results_is_rejected() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "\u{feff}{\"a\": 1}");

    repctl_cmd()
        .args(["load-findings", "--api-key", "k", "scuba"])
        .arg(format!("{UNREACHABLE_URL}/projects/abc/"))
        .arg(report)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing Results key"));
}

#[test]
fn empty_report_imports_nothing() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), r#"{"Results": {}}"#);

    repctl_cmd()
        .args(["load-findings", "--api-key", "k", "scuba"])
        .arg(format!("{UNREACHABLE_URL}/projects/abc/"))
        .arg(report)
        .arg("--language")
        .arg("de-DE")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project abc (de-DE)"))
        .stdout(predicate::str::contains("Control findings: 0"));
}

#[test]
fn malformed_server_url_is_not_called_a_project_url() {
    let snippets = snippet_dir();

    repctl_cmd()
        .args(["load-templates", "--api-key", "k", "--dry-run", "reptor.example.com"])
        .arg(snippets.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL reptor.example.com"))
        .stderr(predicate::str::contains("project").not());
}
