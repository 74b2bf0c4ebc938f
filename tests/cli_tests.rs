//! Integration tests for the command handlers.

use cbom_tools::cli::{run_compliance, run_detections, run_graph, run_replay, run_validate};
use cbom_tools::pipeline::{exit_codes, OutputFormat};
use cbom_tools::AppConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE: &str = "tests/fixtures/sample_cbom.json";
const STREAM: &str = "tests/fixtures/scan_stream.ndjson";

fn config_writing_to(out: &Path) -> AppConfig {
    AppConfig::builder()
        .viewer_only(true)
        .output_format(OutputFormat::Json)
        .output_file(Some(out.to_path_buf()))
        .quiet(true)
        .build()
}

fn read_json(path: &PathBuf) -> Value {
    let content = std::fs::read_to_string(path).expect("output should be written");
    serde_json::from_str(&content).expect("output should be JSON")
}

#[test]
fn test_validate_command() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("validity.json");
    let code = run_validate(Path::new(SAMPLE), &config_writing_to(&out)).unwrap();

    assert_eq!(code, exit_codes::SUCCESS);
    let validity = read_json(&out);
    assert_eq!(validity["valid"], true);
    assert_eq!(validity["ignoredSomeComponent"], true);
}

#[test]
fn test_validate_command_rejects_incomplete_document() {
    let dir = TempDir::new().unwrap();
    let bom = dir.path().join("bom.json");
    std::fs::write(&bom, r#"{"components": []}"#).unwrap();
    let out = dir.path().join("validity.json");

    let code = run_validate(&bom, &config_writing_to(&out)).unwrap();
    assert_eq!(code, exit_codes::INVALID);
    assert_eq!(read_json(&out)["messages"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_validate_command_fails_on_malformed_json() {
    let dir = TempDir::new().unwrap();
    let bom = dir.path().join("bom.json");
    std::fs::write(&bom, "{not json").unwrap();
    let out = dir.path().join("validity.json");

    assert!(run_validate(&bom, &config_writing_to(&out)).is_err());
}

#[test]
fn test_compliance_command_exit_codes() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.json");

    let config = config_writing_to(&out);
    assert_eq!(
        run_compliance(Path::new(SAMPLE), &config).unwrap(),
        exit_codes::SUCCESS
    );
    let resolved = read_json(&out);
    assert_eq!(resolved["source"]["kind"], "local");
    assert_eq!(resolved["report"]["findings"].as_array().map(Vec::len), Some(6));

    let mut strict = config;
    strict.behavior.fail_on_noncompliant = true;
    assert_eq!(
        run_compliance(Path::new(SAMPLE), &strict).unwrap(),
        exit_codes::NONCOMPLIANT
    );
}

#[test]
fn test_graph_command_for_one_ref() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("graph.json");
    run_graph(Path::new(SAMPLE), Some("cert:api"), &config_writing_to(&out)).unwrap();

    let view = read_json(&out);
    assert_eq!(view["bomRef"], "cert:api");
    assert_eq!(view["found"], true);
    assert_eq!(view["neighbors"]["dependsOn"].as_array().map(Vec::len), Some(1));
    assert_eq!(view["neighbors"]["dependedOnBy"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_graph_command_overview() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("graph.json");
    run_graph(Path::new(SAMPLE), None, &config_writing_to(&out)).unwrap();

    let overview = read_json(&out);
    assert_eq!(overview["stats"]["relations"], 7);
    assert_eq!(overview["dangling"][0]["to"], "key:api");
}

#[test]
fn test_detections_command() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("detections.json");
    run_detections(Path::new(SAMPLE), &config_writing_to(&out)).unwrap();

    let inventory = read_json(&out);
    let rows = inventory["detections"].as_array().expect("rows");
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["name"], "RSA-2048");
    assert_eq!(
        rows[0]["sourceLink"],
        "https://github.com/acme/payments/blob/main/src/main/java/com/acme/Signer.java#L41"
    );
}

#[test]
fn test_replay_command_reports_invalid_final_cbom() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("replay.json");
    let code = run_replay(Path::new(STREAM), &config_writing_to(&out)).unwrap();

    assert_eq!(code, exit_codes::INVALID);
    let outcome = read_json(&out);
    assert_eq!(outcome["status"], "finished");
    assert_eq!(outcome["detections"], 2);
    assert_eq!(outcome["valid"], false);
    assert_eq!(outcome["compliant"], false);
    assert_eq!(outcome["origin"]["git_branch"], "release/2.1");
}
