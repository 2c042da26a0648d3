#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn pinboard_cmd() -> Command {
    let mut cmd = Command::new(cargo_bin("pinboard"));
    cmd.env_remove("PINBOARD_ACTOR")
        .env_remove("PINBOARD_BD")
        .env_remove("PINBOARD_AUDIT_DIR")
        .env_remove("PINBOARD_EVENT_SOURCE")
        .env_remove("PINBOARD_TOWN_MARKER");
    cmd
}

#[test]
fn test_help_lists_commands() {
    pinboard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("attach"))
        .stdout(predicate::str::contains("detach"))
        .stdout(predicate::str::contains("event"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn test_event_without_town_is_not_logged() {
    let temp = TempDir::new().unwrap();

    pinboard_cmd()
        .env("PINBOARD_TOWN_MARKER", "no-such-town-marker.json")
        .current_dir(temp.path())
        .args(["event", "sling", "--actor", "mayor", "--payload", "bead=gt-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not logged"));

    assert!(!temp.path().join(".events.jsonl").exists());
}

#[test]
fn test_event_written_at_town_root() {
    let temp = TempDir::new().unwrap();
    let town = temp.path().join("town");
    let nested = town.join("gastown").join("polecats");
    fs::create_dir_all(town.join("mayor")).unwrap();
    fs::create_dir_all(&nested).unwrap();
    fs::write(town.join("mayor").join("town.json"), "{}").unwrap();

    pinboard_cmd()
        .args(["-C", nested.to_str().unwrap()])
        .args([
            "event",
            "sling",
            "--actor",
            "mayor",
            "--payload",
            "bead=gt-42",
            "--payload",
            "attempts=3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged sling event."));

    let content = fs::read_to_string(town.join(".events.jsonl")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(event["type"], "sling");
    assert_eq!(event["actor"], "mayor");
    assert_eq!(event["source"], "gt");
    assert_eq!(event["visibility"], "feed");
    assert_eq!(event["payload"]["bead"], "gt-42");
    assert_eq!(event["payload"]["attempts"], 3);
}

#[test]
fn test_event_rejects_unknown_type() {
    let temp = TempDir::new().unwrap();

    pinboard_cmd()
        .current_dir(temp.path())
        .args(["event", "teleport", "--actor", "mayor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("teleport"));
}

#[test]
fn test_audit_with_empty_workspace() {
    let temp = TempDir::new().unwrap();

    pinboard_cmd()
        .current_dir(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries."));
}

#[test]
fn test_attach_without_bd_fails() {
    let temp = TempDir::new().unwrap();

    pinboard_cmd()
        .env("PINBOARD_BD", "pinboard-test-missing-bd")
        .current_dir(temp.path())
        .args(["attach", "gt-1", "gt-42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bd not installed"));
}
