//! Integration tests for document and report validation.

use cbom_tools::{validate_bom, validate_compliance_report, ComplianceEngine};
use serde_json::{json, Value};

fn sample_cbom() -> Value {
    let content = std::fs::read_to_string("tests/fixtures/sample_cbom.json")
        .expect("fixture should be readable");
    serde_json::from_str(&content).expect("fixture should be valid JSON")
}

#[test]
fn test_sample_is_valid_with_ignored_library() {
    let validity = validate_bom(Some(&sample_cbom()));
    assert!(validity.valid, "{:?}", validity.messages);
    assert!(validity.ignored_some_component);
    assert!(validity.messages.is_empty());
}

#[test]
fn test_all_defects_are_collected() {
    let mut bom = sample_cbom();
    let fields = bom.as_object_mut().expect("document is an object");
    fields.remove("serialNumber");
    fields.remove("version");
    bom["components"][1]
        .as_object_mut()
        .expect("component is an object")
        .remove("type");

    let validity = validate_bom(Some(&bom));
    assert!(!validity.valid);
    assert_eq!(
        validity.messages,
        vec![
            "Missing mandatory field: serialNumber.",
            "Missing mandatory field: version.",
            "Component at index 1 is missing mandatory field: type.",
        ]
    );
}

#[test]
fn test_non_documents_are_invalid() {
    assert!(!validate_bom(None).valid);
    assert!(!validate_bom(Some(&Value::Null)).valid);
    assert!(!validate_bom(Some(&json!("cbom"))).valid);
    assert!(!validate_bom(Some(&json!({"components": {}}))).valid);
}

#[test]
fn test_report_validation() {
    let report = ComplianceEngine::default().evaluate(&sample_cbom()).to_value();
    assert!(validate_compliance_report(Some(&report)));

    let mut unknown_icon = report.clone();
    unknown_icon["complianceLevels"][0]["icon"] = json!("SMILEY");
    assert!(!validate_compliance_report(Some(&unknown_icon)));

    let mut duplicate_level = report.clone();
    duplicate_level["complianceLevels"][1]["id"] = json!(1);
    assert!(!validate_compliance_report(Some(&duplicate_level)));

    let mut failed = report;
    failed["error"] = json!(true);
    assert!(!validate_compliance_report(Some(&failed)));
    assert!(!validate_compliance_report(None));
}
