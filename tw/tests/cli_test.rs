//! CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_card_prints_discovery_document() {
    let home = tempfile::TempDir::new().expect("temp home");
    Command::cargo_bin("tw")
        .expect("binary built")
        .current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .args(["card", "itinerary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Itinerary Agent\""))
        .stdout(predicate::str::contains("\"defaultInputModes\""))
        .stdout(predicate::str::contains("http://localhost:9001/"));
}

#[test]
fn test_card_port_follows_environment() {
    let home = tempfile::TempDir::new().expect("temp home");
    Command::cargo_bin("tw")
        .expect("binary built")
        .current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("BUDGET_PORT", "9102")
        .args(["card", "budget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9102/"));
}

#[test]
fn test_unknown_agent_is_rejected() {
    Command::cargo_bin("tw")
        .expect("binary built")
        .args(["card", "hotel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown agent"));
}
