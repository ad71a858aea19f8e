#![allow(deprecated)]

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TWO_WORKSPACES: &str = r#"current_workspace_token = "xoxp-a"

[[workspaces]]
id = "T1"
name = "alpha"
domain = "alpha-team"
token = "xoxp-a"

[[workspaces]]
id = "T2"
name = "beta"
domain = "beta-team"
token = "xoxp-b"
"#;

fn slack_cmd(store: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("slack-cmd").unwrap();
    cmd.env("SLACK_CMD_STORE", store)
        .env("NO_PROXY", "127.0.0.1")
        .env_remove("SLACK_API_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn store_with(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".slack_uploader.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn empty_store() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".slack_uploader.toml");
    (dir, path)
}

/// Answer one `team.info` request per body, in order, then stop
fn serve_team_info(bodies: Vec<&'static str>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        for body in bodies {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            assert!(String::from_utf8_lossy(&request).starts_with("GET /team.info"));

            let reply = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
        }
    });
    (base_url, handle)
}

/// Test that the CLI shows help
#[test]
fn test_help() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Slack CLI"));
}

/// Test that version flag works
#[test]
fn test_version() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("slack-cmd"));
}

/// Unknown commands exit with status 1
#[test]
fn test_unknown_command() {
    let (_dir, store) = empty_store();
    slack_cmd(&store).arg("unknown-command").assert().code(1);
}

/// Missing positional arguments exit with status 1
#[test]
fn test_message_requires_text() {
    let (_dir, store) = empty_store();
    slack_cmd(&store).args(["message", "general"]).assert().code(1);
}

#[test]
fn test_upload_help_lists_options() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .args(["upload", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--title"))
        .stdout(predicate::str::contains("--comment"));
}

/// Test invalid format flag
#[test]
fn test_invalid_format() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .args(["-f", "invalid", "workspaces"])
        .assert()
        .code(1);
}

#[test]
fn test_list_without_token_fails() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("add-token"));
}

#[test]
fn test_workspaces_on_first_run() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .arg("workspaces")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workspace is registered"));
    assert!(!store.exists());
}

#[test]
fn test_workspaces_hides_tokens() {
    let (_dir, store) = store_with(TWO_WORKSPACES);
    slack_cmd(&store)
        .args(["-f", "json", "workspaces"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"alpha\""))
        .stdout(predicate::str::contains("beta-team"))
        .stdout(predicate::str::contains("xoxp-").not());
}

#[test]
fn test_workspaces_plain_keeps_column_order() {
    let (_dir, store) = store_with(TWO_WORKSPACES);
    slack_cmd(&store)
        .args(["-f", "plain", "workspaces"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*|alpha|T1|alpha-team\n"))
        .stdout(predicate::str::contains("|beta|T2|beta-team\n"));
}

#[test]
fn test_add_token_registers_then_updates() {
    let (base_url, server) = serve_team_info(vec![
        r#"{"ok":true,"team":{"id":"T9","name":"gamma","domain":"gamma-team"}}"#,
        r#"{"ok":true,"team":{"id":"T9","name":"gamma-renamed","domain":"gamma-team"}}"#,
    ]);
    let (_dir, store) = empty_store();

    slack_cmd(&store)
        .args(["--base-url", &base_url, "add-token", "xoxp-x", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace gamma registered."));

    let content = fs::read_to_string(&store).unwrap();
    assert!(content.starts_with("current_workspace_token = \"xoxp-x\""));
    assert_eq!(content.matches("[[workspaces]]").count(), 1);
    assert!(content.contains("id = \"T9\""));

    slack_cmd(&store)
        .args(["--base-url", &base_url, "add-token", "xoxp-y", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace gamma-renamed updated."));
    server.join().unwrap();

    let content = fs::read_to_string(&store).unwrap();
    assert_eq!(content.matches("[[workspaces]]").count(), 1);
    assert!(content.contains("name = \"gamma-renamed\""));
    assert!(content.contains("token = \"xoxp-y\""));
    assert!(content.starts_with("current_workspace_token = \"xoxp-x\""));
}

#[test]
fn test_add_token_rejected_leaves_store_untouched() {
    let (base_url, server) = serve_team_info(vec![r#"{"ok":false,"error":"invalid_auth"}"#]);
    let (_dir, store) = empty_store();

    slack_cmd(&store)
        .args(["--base-url", &base_url, "add-token", "xoxp-bad", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid_auth"));
    server.join().unwrap();
    assert!(!store.exists());
}

#[test]
fn test_switch_by_name() {
    let (_dir, store) = store_with(TWO_WORKSPACES);
    slack_cmd(&store)
        .args(["switch", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to beta"));

    let content = fs::read_to_string(&store).unwrap();
    assert!(content.contains("current_workspace_token = \"xoxp-b\""));
}

#[test]
fn test_switch_unknown_workspace() {
    let (_dir, store) = store_with(TWO_WORKSPACES);
    slack_cmd(&store)
        .args(["switch", "gamma"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gamma"));

    assert_eq!(fs::read_to_string(&store).unwrap(), TWO_WORKSPACES);
}

#[test]
fn test_switch_with_nothing_registered() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .arg("switch")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workspace is registered"));
}

#[test]
fn test_malformed_store_is_fatal() {
    let (_dir, store) = store_with("current_workspace_token = \n[[workspaces");
    slack_cmd(&store)
        .arg("workspaces")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse credential store"));
}

#[test]
fn test_message_unreachable_api() {
    let (_dir, store) = store_with(TWO_WORKSPACES);
    slack_cmd(&store)
        .args(["--base-url", "http://127.0.0.1:9", "message", "general", "hi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("channels.list"));
}

#[test]
fn test_completions() {
    let (_dir, store) = empty_store();
    slack_cmd(&store)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("slack-cmd"));
}
