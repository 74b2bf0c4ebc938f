//! Reference graph construction.
//!
//! Relations come from two places: the top-level `dependencies` list and
//! cross-reference fields scattered through each asset's `cryptoProperties`.
//! Both are merged into the same four direction-typed adjacency maps.

use crate::model::{expand_bom, resolve_strings, Detection};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Origin path recorded for `dependencies[].dependsOn` relations.
pub const DEPENDS_ON_ORIGIN: &str = "dependencies.dependsOn";
/// Origin path recorded for `dependencies[].provides` relations.
pub const PROVIDES_ORIGIN: &str = "dependencies.provides";

/// Cross-reference fields of CycloneDX 1.6 crypto assets, in resolution order.
pub const DEFAULT_REFERENCE_PATHS: &[&str] = &[
    "cryptoProperties.certificateProperties.signatureAlgorithmRef",
    "cryptoProperties.certificateProperties.subjectPublicKeyRef",
    "cryptoProperties.protocolProperties.cipherSuites.algorithms",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.encr",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.prf",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.integ",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.ke",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.esn",
    "cryptoProperties.protocolProperties.ikev2TransformTypes.auth",
    "cryptoProperties.relatedCryptoMaterialProperties.algorithmRef",
    "cryptoProperties.relatedCryptoMaterialProperties.securedBy.algorithmRef",
];

/// Owned copy of [`DEFAULT_REFERENCE_PATHS`].
#[must_use]
pub fn default_reference_paths() -> Vec<String> {
    DEFAULT_REFERENCE_PATHS.iter().map(ToString::to_string).collect()
}

/// Kind of relation between two bom-refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    DependsOn,
    Provides,
}

/// A directed relation and the field that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,
    pub origin_path: String,
}

/// One adjacency entry: the other endpoint and the originating field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub target: String,
    pub origin_path: String,
}

/// Bidirectional reference graph keyed by bom-ref.
///
/// Edges may dangle (point at a bom-ref with no detection). They are kept
/// here and filtered out by the query side.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ReferenceGraph {
    pub(crate) depends_on: HashMap<String, Vec<GraphEdge>>,
    pub(crate) depended_on_by: HashMap<String, Vec<GraphEdge>>,
    pub(crate) provides: HashMap<String, Vec<GraphEdge>>,
    pub(crate) provided_by: HashMap<String, Vec<GraphEdge>>,
    pub(crate) detections_by_ref: IndexMap<String, Detection>,
    pub(crate) detections: Vec<Detection>,
    pub(crate) relation_count: usize,
}

impl ReferenceGraph {
    /// Record a relation in its forward and mirrored reverse map.
    pub fn add_relation(&mut self, edge: RelationEdge) {
        let (forward, reverse) = match edge.kind {
            RelationKind::DependsOn => (&mut self.depends_on, &mut self.depended_on_by),
            RelationKind::Provides => (&mut self.provides, &mut self.provided_by),
        };
        forward.entry(edge.from.clone()).or_default().push(GraphEdge {
            target: edge.to.clone(),
            origin_path: edge.origin_path.clone(),
        });
        reverse.entry(edge.to).or_default().push(GraphEdge {
            target: edge.from,
            origin_path: edge.origin_path,
        });
        self.relation_count += 1;
    }

    /// Register a detection under its bom-ref. The first one seen wins.
    ///
    /// Returns the component index already holding the ref when another
    /// component reuses it. Further occurrences of the same component are
    /// expected and return `None`.
    fn index_detection(&mut self, detection: &Detection) -> Option<usize> {
        let bom_ref = detection.bom_ref()?;
        let Some(kept) = self.detections_by_ref.get(bom_ref) else {
            self.detections_by_ref
                .insert(bom_ref.to_string(), detection.clone());
            return None;
        };
        if kept.component_index == detection.component_index {
            return None;
        }
        tracing::debug!(
            "Components {} and {} share bom-ref {bom_ref}, keeping the first",
            kept.component_index,
            detection.component_index
        );
        Some(kept.component_index)
    }

    /// Number of relations (each counted once, not per direction).
    #[must_use]
    pub const fn relation_count(&self) -> usize {
        self.relation_count
    }

    /// Raw forward adjacency for `kind`, including dangling targets.
    #[must_use]
    pub fn raw_edges(&self, kind: RelationKind, bom_ref: &str) -> &[GraphEdge] {
        let map = match kind {
            RelationKind::DependsOn => &self.depends_on,
            RelationKind::Provides => &self.provides,
        };
        map.get(bom_ref).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Forward relations whose target has no detection, sorted by source ref.
    #[must_use]
    pub fn dangling_edges(&self) -> Vec<RelationEdge> {
        let mut dangling: Vec<RelationEdge> = [
            (RelationKind::DependsOn, &self.depends_on),
            (RelationKind::Provides, &self.provides),
        ]
        .into_iter()
        .flat_map(|(kind, map)| {
            map.iter().flat_map(move |(from, edges)| {
                edges
                    .iter()
                    .filter(move |e| !self.detections_by_ref.contains_key(&e.target))
                    .map(move |e| RelationEdge {
                        from: from.clone(),
                        to: e.target.clone(),
                        kind,
                        origin_path: e.origin_path.clone(),
                    })
            })
        })
        .collect();
        dangling.sort_by(|a, b| a.from.cmp(&b.from));
        dangling
    }

    /// Summary counts for logging and reports.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            detections: self.detections.len(),
            nodes: self.detections_by_ref.len(),
            relations: self.relation_count,
            dangling: self.dangling_edges().len(),
        }
    }
}

/// Summary of a built graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub detections: usize,
    /// Distinct bom-refs with a detection
    pub nodes: usize,
    pub relations: usize,
    /// Relations whose target has no detection
    pub dangling: usize,
}

/// Builds a [`ReferenceGraph`] from a BOM document.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    reference_paths: Vec<String>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(default_reference_paths())
    }
}

impl GraphBuilder {
    /// Create a builder resolving the given cross-reference paths.
    #[must_use]
    pub const fn new(reference_paths: Vec<String>) -> Self {
        Self { reference_paths }
    }

    /// The cross-reference paths, in resolution order.
    #[must_use]
    pub fn reference_paths(&self) -> &[String] {
        &self.reference_paths
    }

    /// Expand the document's components and build the graph.
    pub fn build(&self, bom: &Value) -> ReferenceGraph {
        let expansion = expand_bom(bom);
        self.build_with_detections(bom, expansion.detections)
    }

    /// Build the graph from detections that were already expanded.
    pub fn build_with_detections(&self, bom: &Value, detections: Vec<Detection>) -> ReferenceGraph {
        let mut graph = ReferenceGraph::default();

        for detection in &detections {
            graph.index_detection(detection);
        }

        self.add_declared_dependencies(&mut graph, bom);

        for detection in &detections {
            let Some(from) = detection.bom_ref() else {
                continue;
            };
            for path in &self.reference_paths {
                for to in resolve_strings(&detection.component, path) {
                    graph.add_relation(RelationEdge {
                        from: from.to_string(),
                        to: to.to_string(),
                        kind: RelationKind::DependsOn,
                        origin_path: path.clone(),
                    });
                }
            }
        }

        graph.detections = detections;
        let stats = graph.stats();
        tracing::debug!(
            "Built reference graph: {} detections, {} nodes, {} relations ({} dangling)",
            stats.detections,
            stats.nodes,
            stats.relations,
            stats.dangling
        );
        graph
    }

    /// Relations from the top-level `dependencies` list. Malformed entries are skipped.
    fn add_declared_dependencies(&self, graph: &mut ReferenceGraph, bom: &Value) {
        let Some(entries) = bom.get("dependencies").and_then(Value::as_array) else {
            return;
        };

        for (index, entry) in entries.iter().enumerate() {
            let Some(from) = entry.get("ref").and_then(Value::as_str) else {
                tracing::debug!("Skipping dependencies[{index}]: no string ref");
                continue;
            };
            for (field, kind, origin) in [
                ("dependsOn", RelationKind::DependsOn, DEPENDS_ON_ORIGIN),
                ("provides", RelationKind::Provides, PROVIDES_ORIGIN),
            ] {
                let Some(targets) = entry.get(field).and_then(Value::as_array) else {
                    continue;
                };
                for to in targets.iter().filter_map(Value::as_str) {
                    graph.add_relation(RelationEdge {
                        from: from.to_string(),
                        to: to.to_string(),
                        kind,
                        origin_path: origin.to_string(),
                    });
                }
            }
        }
    }
}
