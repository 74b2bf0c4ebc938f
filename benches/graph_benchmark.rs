//! Benchmarks for graph construction and local compliance evaluation.
//!
//! Run with: cargo bench --bench graph_benchmark

use cbom_tools::{validate_bom, ComplianceEngine, GraphBuilder};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;

/// Generate a CBOM with `count` protocols, each referencing a cipher suite
/// algorithm and a certificate, with three occurrences per asset.
fn generate_cbom(count: usize) -> Value {
    let occurrences = |i: usize| {
        json!({"occurrences": [
            {"location": format!("src/Module{i}.java"), "line": 10},
            {"location": format!("src/Module{i}.java"), "line": 42},
            {"location": format!("src/Other{i}.java"), "line": 7}
        ]})
    };

    let mut components = Vec::with_capacity(count * 3);
    let mut dependencies = Vec::with_capacity(count);
    for i in 0..count {
        let algo = format!("algo-{i}");
        let cert = format!("cert-{i}");
        let proto = format!("proto-{i}");
        components.push(json!({
            "type": "cryptographic-asset",
            "bom-ref": algo,
            "name": if i % 2 == 0 { "RSA-2048" } else { "ML-KEM-768" },
            "cryptoProperties": {
                "assetType": "algorithm",
                "algorithmProperties": {"primitive": if i % 3 == 0 { "block-cipher" } else { "pke" }}
            },
            "evidence": occurrences(i)
        }));
        components.push(json!({
            "type": "cryptographic-asset",
            "bom-ref": cert,
            "name": format!("CN=host{i}"),
            "cryptoProperties": {
                "assetType": "certificate",
                "certificateProperties": {
                    "signatureAlgorithmRef": algo,
                    "subjectPublicKeyRef": format!("missing-{i}")
                }
            },
            "evidence": occurrences(i)
        }));
        components.push(json!({
            "type": "cryptographic-asset",
            "bom-ref": proto,
            "name": "TLS",
            "cryptoProperties": {
                "assetType": "protocol",
                "protocolProperties": {"cipherSuites": [{"algorithms": [algo]}]}
            }
        }));
        dependencies.push(json!({"ref": proto, "dependsOn": [cert]}));
    }

    json!({
        "bomFormat": "CycloneDX",
        "specVersion": "1.6",
        "components": components,
        "dependencies": dependencies
    })
}

fn bench_graph_build(c: &mut Criterion) {
    let builder = GraphBuilder::default();
    let mut group = c.benchmark_group("graph_build");
    for size in [100, 1_000] {
        let bom = generate_cbom(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bom, |b, bom| {
            b.iter(|| black_box(builder.build(black_box(bom))));
        });
    }
    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let bom = generate_cbom(1_000);
    let graph = GraphBuilder::default().build(&bom);
    c.bench_function("neighbors_1000", |b| {
        b.iter(|| black_box(graph.neighbors(black_box("algo-500"))));
    });
}

fn bench_compliance(c: &mut Criterion) {
    let engine = ComplianceEngine::default();
    let mut group = c.benchmark_group("compliance_evaluate");
    for size in [100, 1_000] {
        let bom = generate_cbom(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bom, |b, bom| {
            b.iter(|| black_box(engine.evaluate(black_box(bom))));
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let bom = generate_cbom(1_000);
    c.bench_function("validate_1000", |b| {
        b.iter(|| black_box(validate_bom(Some(black_box(&bom)))));
    });
}

criterion_group!(
    benches,
    bench_graph_build,
    bench_neighbors,
    bench_compliance,
    bench_validate
);
criterion_main!(benches);
