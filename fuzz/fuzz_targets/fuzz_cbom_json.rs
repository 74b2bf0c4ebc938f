#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz every consumer of an untrusted CBOM document.
///
/// Arbitrary JSON is validated, expanded into a reference graph, queried
/// and evaluated by the local compliance engine. The local report must
/// always pass the report validator.
fuzz_target!(|data: &[u8]| {
    let Ok(bom) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let _ = cbom_tools::validate_bom(Some(&bom));

    let graph = cbom_tools::GraphBuilder::default().build(&bom);
    let refs: Vec<String> = graph.refs().map(str::to_string).collect();
    for bom_ref in &refs {
        let _ = graph.neighbors(bom_ref);
    }
    let _ = graph.dangling_edges();

    let report = cbom_tools::ComplianceEngine::default().evaluate(&bom);
    assert!(cbom_tools::validate_compliance_report(Some(&report.to_value())) || report.error);
    let _ = cbom_tools::validate_compliance_report(Some(&bom));
});
