//! Activation against real workspaces and settings files

use serde_json::json;
use std::fs;

use scout_extension::activation::{activate, Outcome};
use scout_extension::classify::NotEligibleReason;
use scout_extension::config::DEFAULT_CONFIG_KEY;
use scout_extension::notify::Level;

use super::helpers::{Sandbox, INK_MANIFEST, SERDE_MANIFEST};

#[test]
fn test_workspace_without_manifest_is_untouched() {
    let sandbox = Sandbox::new();
    sandbox.install_tool("cargo-scout-audit");
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert_eq!(
        report.outcome,
        Outcome::NotEligible(NotEligibleReason::ManifestAbsent)
    );
    assert!(host.notifications().is_empty());
    assert!(!sandbox.settings_path().exists());
}

#[test]
fn test_workspace_without_target_dependency_is_untouched() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(SERDE_MANIFEST);
    sandbox.install_tool("cargo-scout-audit");
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert_eq!(
        report.outcome,
        Outcome::NotEligible(NotEligibleReason::MissingDependency)
    );
    assert!(host.notifications().is_empty());
    assert!(!sandbox.settings_path().exists());
}

#[test]
fn test_malformed_manifest_behaves_like_absent() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("[dependencies\nink = \"4.0\"");
    sandbox.install_tool("cargo-scout-audit");
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert!(matches!(
        report.outcome,
        Outcome::NotEligible(NotEligibleReason::ManifestMalformed(_))
    ));
    assert!(host.notifications().is_empty());
    assert!(!sandbox.settings_path().exists());
}

#[test]
fn test_dev_dependency_only_is_not_eligible() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("[package]\nname = \"x\"\n\n[dev-dependencies]\nink = \"4.0\"\n");
    sandbox.install_tool("cargo-scout-audit");
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert_eq!(
        report.outcome,
        Outcome::NotEligible(NotEligibleReason::NoDependenciesTable)
    );
    assert!(!sandbox.settings_path().exists());
}

#[test]
fn test_missing_tool_notifies_once_and_keeps_setting() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(INK_MANIFEST);
    sandbox.install_rust_analyzer();
    sandbox.write_settings(&json!({ DEFAULT_CONFIG_KEY: ["cargo", "clippy"] }));
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert!(matches!(report.outcome, Outcome::ToolMissing { .. }));
    assert_eq!(host.notifications().len(), 1);
    assert_eq!(host.notifications()[0].level, Level::Error);
    assert_eq!(
        sandbox.read_settings().unwrap()[DEFAULT_CONFIG_KEY],
        json!(["cargo", "clippy"])
    );
}

#[test]
fn test_ink_project_with_tool_is_configured() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest("[dependencies]\nink = \"4.0\"\n");
    sandbox.install_tool("cargo-scout-audit");
    sandbox.install_rust_analyzer();
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert!(report.outcome.is_configured());
    assert_eq!(report.companion_registered, Some(true));
    assert!(host.notifications().is_empty());
    assert_eq!(
        sandbox.read_settings().unwrap()[DEFAULT_CONFIG_KEY],
        json!(["cargo", "scout-audit", "--", "--message-format=json"])
    );
}

#[test]
fn test_reactivation_yields_same_value() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(INK_MANIFEST);
    sandbox.install_tool("cargo-scout-audit");
    sandbox.install_rust_analyzer();
    let config = sandbox.config();

    let mut host = sandbox.host(&config);
    activate(&mut host, &sandbox.probe(), &config);
    let first = fs::read_to_string(sandbox.settings_path()).unwrap();

    let mut host = sandbox.host(&config);
    let report = activate(&mut host, &sandbox.probe(), &config);
    let second = fs::read_to_string(sandbox.settings_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        report.previous,
        Some(json!(["cargo", "scout-audit", "--", "--message-format=json"]))
    );
}

#[test]
fn test_missing_companion_warns_and_still_configures() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(INK_MANIFEST);
    sandbox.install_tool("cargo-scout-audit");
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert!(report.outcome.is_configured());
    assert_eq!(host.notifications().len(), 1);
    assert_eq!(host.notifications()[0].level, Level::Warning);
    assert!(sandbox.read_settings().is_some());
}

#[test]
fn test_existing_settings_are_preserved() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(INK_MANIFEST);
    sandbox.install_tool("cargo-scout-audit");
    sandbox.install_rust_analyzer();
    sandbox.write_settings(&json!({
        "editor.formatOnSave": true,
        "rust-analyzer.cargo.features": "all"
    }));
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    activate(&mut host, &sandbox.probe(), &config);

    let settings = sandbox.read_settings().unwrap();
    assert_eq!(settings["editor.formatOnSave"], true);
    assert_eq!(settings["rust-analyzer.cargo.features"], "all");
    assert_eq!(settings[DEFAULT_CONFIG_KEY][1], "scout-audit");
}

#[test]
fn test_unparsable_settings_fail_without_overwrite() {
    let sandbox = Sandbox::new();
    sandbox.write_manifest(INK_MANIFEST);
    sandbox.install_tool("cargo-scout-audit");
    sandbox.install_rust_analyzer();
    let original = "{\n  // user comment\n  \"editor.tabSize\": 2,\n}\n";
    fs::create_dir_all(sandbox.settings_path().parent().unwrap()).unwrap();
    fs::write(sandbox.settings_path(), original).unwrap();
    let config = sandbox.config();
    let mut host = sandbox.host(&config);

    let report = activate(&mut host, &sandbox.probe(), &config);

    assert!(matches!(report.outcome, Outcome::WriteFailed { .. }));
    assert_eq!(host.notifications().len(), 1);
    assert_eq!(host.notifications()[0].level, Level::Error);
    assert!(host.notifications()[0]
        .message
        .contains("remove comments and trailing commas"));
    assert_eq!(fs::read_to_string(sandbox.settings_path()).unwrap(), original);
}
