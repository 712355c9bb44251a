use assert_cmd::Command;
use predicates::prelude::*;

use abell_components::test_utils::ComponentDir;

use crate::fixtures;

fn abell() -> Command {
    let mut cmd = Command::cargo_bin("abell-components").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("ABELL_BASE_PATH");
    cmd
}

#[test]
fn test_cli_renders_html() {
    abell()
        .arg(fixtures::component("Sample.abell"))
        .args(["--props", r#"{"foo": "123TEST"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("<div>Component to test abell. 123TEST</div>"));
}

#[test]
fn test_cli_json_output() {
    let output = abell()
        .arg(fixtures::component("Parent.abell"))
        .args(["--props", r#"{"message": "Woop Woop!"}"#, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["component"], "Parent");
    assert_eq!(value["components"][0]["component"], "Child");
    assert!(value["renderedHTML"].as_str().unwrap().contains("Woop Woop!"));
}

#[test]
fn test_cli_tree_output() {
    abell()
        .arg(fixtures::component("Parent.abell"))
        .args(["--format", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parent (").and(predicate::str::contains("└─ Child (")));
}

#[test]
fn test_cli_reports_cycle() {
    abell()
        .arg(fixtures::component("cycle/A.abell"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular Component Inclusion"))
        .stderr(predicate::str::contains("<- circular reference"));
}

#[test]
fn test_cli_missing_file() {
    let dir = ComponentDir::new().unwrap();
    abell()
        .arg(dir.path().join("Missing.abell"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Component File Not Found"));
}

#[test]
fn test_cli_invalid_props() {
    abell()
        .arg(fixtures::component("Sample.abell"))
        .args(["--props", "not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--props is not valid JSON"));
}

#[test]
fn test_cli_config_file() {
    let dir = ComponentDir::new().unwrap();
    dir.write("lib/Badge.abell", "<span>{{ props.label }}</span>").unwrap();
    let page = dir
        .write("Page.abell", "const Badge = require('Badge.abell');\n<Badge props={ label: 'new' } />")
        .unwrap();
    let config = dir.write("abell.toml", "base_path = \"lib\"\n").unwrap();

    abell()
        .arg(&page)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("<span>new</span>"));
}
