//! Bidirectional reference graph between crypto assets.
//!
//! Nodes are bom-refs. Edges come from the document's `dependencies` list
//! and from cross-reference fields inside `cryptoProperties`, and every edge
//! remembers the field path that produced it.

mod builder;
mod query;

pub use builder::{
    default_reference_paths, GraphBuilder, GraphEdge, GraphStats, ReferenceGraph, RelationEdge,
    RelationKind, DEFAULT_REFERENCE_PATHS, DEPENDS_ON_ORIGIN, PROVIDES_ORIGIN,
};
pub use query::{Neighbor, Neighbors};
