//! End-to-end tests of the `iexpert` binary for the non-interactive commands

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{completion_body, temp_config_file};

/// Command isolated from the developer's config, key and preferences
fn iexpert(tmp: &TempDir) -> Command {
    iexpert_with_config(tmp, &tmp.path().join("missing.yaml"))
}

fn iexpert_with_config(tmp: &TempDir, config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("iexpert").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .env("IEXPERT_PREFS_DB", tmp.path().join("prefs.db"))
        .env("IEXPERT_COLOR_SCHEME", "light")
        .env_remove("IEXPERT_API_KEY")
        .env_remove("IEXPERT_API_BASE")
        .env_remove("IEXPERT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_tips_panel() {
    let tmp = TempDir::new().unwrap();
    iexpert(&tmp)
        .arg("tips")
        .assert()
        .success()
        .stdout(predicate::str::contains("Battery Health Optimization"))
        .stdout(predicate::str::contains("Storage Management"));
}

#[test]
fn test_features_panel() {
    let tmp = TempDir::new().unwrap();
    iexpert(&tmp)
        .arg("features")
        .assert()
        .success()
        .stdout(predicate::str::contains("Smart Diagnostics"));
}

#[test]
fn test_tools_panel_lists_diagnostics_and_quick_actions() {
    let tmp = TempDir::new().unwrap();
    iexpert(&tmp)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("/diagnose battery"))
        .stdout(predicate::str::contains("/diagnose storage"))
        .stdout(predicate::str::contains("Security Setup"));
}

#[test]
fn test_theme_persists_between_runs() {
    let tmp = TempDir::new().unwrap();

    iexpert(&tmp)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));

    iexpert(&tmp)
        .args(["theme", "dark"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    iexpert(&tmp)
        .arg("theme")
        .assert()
        .success()
        .stdout(predicate::str::contains("dark"));

    iexpert(&tmp)
        .args(["theme", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));
}

#[test]
fn test_invalid_config_file_fails() {
    let (_dir, config_path) = temp_config_file("provider:\n  api_base: \"not a url\"\n");
    let tmp = TempDir::new().unwrap();
    iexpert_with_config(&tmp, &config_path)
        .arg("tips")
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_base"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_prints_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Try X")))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    iexpert(&tmp)
        .env("IEXPERT_API_KEY", "pplx-test-key")
        .env("IEXPERT_API_BASE", server.uri())
        .args(["ask", "Why", "is", "my", "phone", "hot?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Try X"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    iexpert(&tmp)
        .env("IEXPERT_API_KEY", "pplx-test-key")
        .env("IEXPERT_API_BASE", server.uri())
        .args(["ask", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to get response. Please try again.",
        ));
}
