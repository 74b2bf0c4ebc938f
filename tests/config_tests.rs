//! Integration tests for config files driving the command handlers.

use cbom_tools::cli::run_compliance;
use cbom_tools::config::{generate_example_config, load_config_file, ConfigPreset};
use cbom_tools::pipeline::exit_codes;
use cbom_tools::{AppConfig, Validatable};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_policy_from_config_file_changes_classification() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join(".cbom-tools.yaml");
    let out = dir.path().join("report.json");
    std::fs::write(
        &config_path,
        format!(
            "compliance:\n  viewer_only: true\npolicy:\n  name_whitelist: [rsa, ml-kem]\noutput:\n  format: json\n  file: {}\nbehavior:\n  quiet: true\n",
            out.display()
        ),
    )
    .unwrap();

    let config = load_config_file(&config_path).unwrap();
    assert!(config.validate().is_empty());
    assert_eq!(config.policy.name_whitelist, vec!["rsa", "ml-kem"]);
    assert!(!config.policy.asymmetric_primitives.is_empty(), "unset fields keep defaults");

    let code = run_compliance(Path::new("tests/fixtures/sample_cbom.json"), &config).unwrap();
    assert_eq!(code, exit_codes::SUCCESS);

    let resolved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let findings = resolved["report"]["findings"].as_array().unwrap();
    let rsa = findings
        .iter()
        .find(|f| f["bomRef"] == "alg:rsa-2048")
        .expect("rsa finding");
    assert_eq!(rsa["levelId"], 3);
}

#[test]
fn test_example_config_parses_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cbom-tools.yaml");
    std::fs::write(&path, generate_example_config()).unwrap();

    let config = load_config_file(&path).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cbom-tools.yaml");
    std::fs::write(
        &path,
        "compliance:\n  service_url: ftp://policy.example.com\n  timeout_secs: 0\n",
    )
    .unwrap();

    let config = load_config_file(&path).unwrap();
    let errors = config.validate();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.field.starts_with("compliance.")));
}

#[test]
fn test_ci_preset_layers_over_file() {
    let mut config = AppConfig::builder()
        .service_url(Some("https://policy.example.com/check".to_string()))
        .build();
    config.merge(&AppConfig::from_preset(ConfigPreset::CiCd));

    assert_eq!(
        config.compliance.remote_url(),
        Some("https://policy.example.com/check")
    );
    assert!(config.behavior.fail_on_noncompliant);
    assert!(config.behavior.quiet);
}
