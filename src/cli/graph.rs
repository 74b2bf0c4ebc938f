//! Graph command handler.

use super::emit;
use crate::config::AppConfig;
use crate::graph::{GraphBuilder, GraphStats, Neighbor, Neighbors, RelationEdge};
use crate::pipeline::{exit_codes, load_bom};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphOverview {
    stats: GraphStats,
    dangling: Vec<RelationEdge>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefView<'a> {
    bom_ref: &'a str,
    found: bool,
    neighbors: Neighbors<'a>,
}

/// Run the graph command: an overview, or the neighbors of one bom-ref.
pub fn run_graph(bom_path: &Path, bom_ref: Option<&str>, config: &AppConfig) -> Result<i32> {
    let bom = load_bom(bom_path)?;
    let graph = GraphBuilder::new(config.graph.reference_paths.clone()).build(&bom);

    match bom_ref {
        Some(bom_ref) => {
            let view = RefView {
                bom_ref,
                found: graph.contains(bom_ref),
                neighbors: graph.neighbors(bom_ref),
            };
            if !view.found {
                tracing::warn!("No detection with bom-ref '{bom_ref}'");
            }
            emit(config, &view, format_ref_view)?;
        }
        None => {
            let overview = GraphOverview {
                stats: graph.stats(),
                dangling: graph.dangling_edges(),
            };
            emit(config, &overview, format_overview)?;
        }
    }
    Ok(exit_codes::SUCCESS)
}

fn format_overview(overview: &GraphOverview) -> String {
    let stats = overview.stats;
    let mut out = format!(
        "{} detection(s), {} node(s), {} relation(s), {} dangling\n",
        stats.detections, stats.nodes, stats.relations, stats.dangling
    );
    for edge in &overview.dangling {
        let _ = writeln!(out, "  {} -> {} ({})", edge.from, edge.to, edge.origin_path);
    }
    out
}

fn format_ref_view(view: &RefView<'_>) -> String {
    if !view.found {
        return format!("No detection with bom-ref '{}'\n", view.bom_ref);
    }
    let mut out = format!("{}\n", view.bom_ref);
    let sections: [(&str, &[Neighbor<'_>]); 4] = [
        ("depends on", &view.neighbors.depends_on),
        ("depended on by", &view.neighbors.depended_on_by),
        ("provides", &view.neighbors.provides),
        ("provided by", &view.neighbors.provided_by),
    ];
    for (title, neighbors) in sections {
        if neighbors.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {title}:");
        for neighbor in neighbors {
            let name = neighbor.detection.display_name().unwrap_or("<unnamed>");
            let target = neighbor.detection.bom_ref().unwrap_or_default();
            let _ = writeln!(out, "    {name} [{target}] via {}", neighbor.origin_path);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_ref_view() {
        let bom = json!({"components": [
            {"type": "cryptographic-asset", "bom-ref": "tls", "name": "TLS",
             "cryptoProperties": {"protocolProperties": {"cipherSuites": [{"algorithms": ["aes"]}]}}},
            {"type": "cryptographic-asset", "bom-ref": "aes", "name": "AES-128-GCM@1.2",
             "cryptoProperties": {}}
        ]});
        let graph = GraphBuilder::default().build(&bom);
        let view = RefView {
            bom_ref: "tls",
            found: true,
            neighbors: graph.neighbors("tls"),
        };
        let text = format_ref_view(&view);
        assert!(text.contains("depends on:"));
        assert!(text.contains("AES-128-GCM [aes]"));
    }

    #[test]
    fn test_format_missing_ref() {
        let view = RefView {
            bom_ref: "nope",
            found: false,
            neighbors: Neighbors::default(),
        };
        assert!(format_ref_view(&view).contains("No detection"));
    }
}
