//! Read-only lookups into a built [`ReferenceGraph`].

use super::builder::{GraphEdge, ReferenceGraph};
use crate::model::Detection;
use serde::Serialize;
use std::collections::HashMap;

/// A neighboring detection and the field that links to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor<'a> {
    pub detection: &'a Detection,
    pub origin_path: &'a str,
}

/// All four neighborhoods of a bom-ref. Dangling targets are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbors<'a> {
    pub depends_on: Vec<Neighbor<'a>>,
    pub depended_on_by: Vec<Neighbor<'a>>,
    pub provides: Vec<Neighbor<'a>>,
    pub provided_by: Vec<Neighbor<'a>>,
}

impl Neighbors<'_> {
    /// True if all four sequences are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depends_on.is_empty()
            && self.depended_on_by.is_empty()
            && self.provides.is_empty()
            && self.provided_by.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.depends_on.len()
            + self.depended_on_by.len()
            + self.provides.len()
            + self.provided_by.len()
    }
}

impl ReferenceGraph {
    /// Neighbors of `bom_ref` in every direction.
    ///
    /// An unknown ref yields four empty sequences.
    #[must_use]
    pub fn neighbors(&self, bom_ref: &str) -> Neighbors<'_> {
        Neighbors {
            depends_on: self.resolve_edges(&self.depends_on, bom_ref),
            depended_on_by: self.resolve_edges(&self.depended_on_by, bom_ref),
            provides: self.resolve_edges(&self.provides, bom_ref),
            provided_by: self.resolve_edges(&self.provided_by, bom_ref),
        }
    }

    fn resolve_edges<'a>(
        &'a self,
        map: &'a HashMap<String, Vec<GraphEdge>>,
        bom_ref: &str,
    ) -> Vec<Neighbor<'a>> {
        map.get(bom_ref)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(|edge| {
                self.detections_by_ref
                    .get(&edge.target)
                    .map(|detection| Neighbor {
                        detection,
                        origin_path: &edge.origin_path,
                    })
            })
            .collect()
    }

    /// The detection registered for a bom-ref.
    #[must_use]
    pub fn detection(&self, bom_ref: &str) -> Option<&Detection> {
        self.detections_by_ref.get(bom_ref)
    }

    /// Every detection, in expansion order.
    #[must_use]
    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    /// Bom-refs with a detection, in first-seen order.
    pub fn refs(&self) -> impl Iterator<Item = &str> {
        self.detections_by_ref.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, bom_ref: &str) -> bool {
        self.detections_by_ref.contains_key(bom_ref)
    }
}
