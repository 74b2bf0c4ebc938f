//! **Cryptography bills of materials: reference graphs and post-quantum compliance.**
//!
//! `cbom-tools` reads CycloneDX CBOM documents produced by code scanners and
//! answers three questions about them:
//!
//! - **Is the document usable?** [`validate_bom`] checks mandatory fields and
//!   collects every defect as a message instead of stopping at the first one.
//! - **How are the assets related?** [`GraphBuilder`] expands components into
//!   per-occurrence [`Detection`]s and links them through the document's
//!   `dependencies` and the cross-reference fields inside `cryptoProperties`.
//!   [`ReferenceGraph::neighbors`] answers "what does this asset depend on,
//!   what provides it, and through which field".
//! - **Is it quantum safe?** [`ComplianceEngine`] classifies every asset
//!   against a [`QuantumSafePolicy`]. [`ComplianceResolver`] prefers a remote
//!   compliance service and falls back to the local engine when the remote
//!   report fails [`validate_compliance_report`].
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: tolerant accessors over raw JSON documents, detection
//!   expansion, code origin and inventory counts.
//! - **[`graph`]**: the bidirectional reference graph and its queries.
//! - **[`validation`]**: document and report validators.
//! - **[`compliance`]**: the local engine, report types, remote resolution
//!   and per-asset summaries.
//! - **[`session`]**: the currently loaded CBOM, replaced atomically.
//! - **[`scan`]**: live-scan message stream handling.
//! - **[`config`]**, **[`pipeline`]**, **[`cli`]**: the command-line tool.
//!
//! ## Getting Started
//!
//! ```no_run
//! use cbom_tools::{ComplianceEngine, GraphBuilder, validate_bom};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bom = cbom_tools::pipeline::load_bom("cbom.json".as_ref())?;
//!
//!     let validity = validate_bom(Some(&bom));
//!     for message in &validity.messages {
//!         eprintln!("{message}");
//!     }
//!
//!     let graph = GraphBuilder::default().build(&bom);
//!     for bom_ref in graph.refs() {
//!         let neighbors = graph.neighbors(bom_ref);
//!         println!("{bom_ref}: {} neighbor(s)", neighbors.len());
//!     }
//!
//!     let report = ComplianceEngine::default().evaluate(&bom);
//!     println!("compliant: {}", report.global_compliance_status);
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools
)]

pub mod cli;
pub mod compliance;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod scan;
pub mod session;
pub mod validation;

pub use compliance::{
    ComplianceEngine, ComplianceLevel, ComplianceReport, ComplianceResolver, ComplianceService,
    Finding, QuantumSafePolicy, ReportSource, ResolvedReport,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use error::{CbomError, ErrorContext, Result};
pub use graph::{GraphBuilder, Neighbor, Neighbors, ReferenceGraph};
pub use model::{expand_bom, CodeOrigin, Detection};
pub use scan::{ScanAccumulator, ScanMessage};
pub use session::{BomSource, CbomSession, SessionSignal, SessionSnapshot};
pub use validation::{validate_bom, validate_compliance_report, BomValidity};
