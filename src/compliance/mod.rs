//! Quantum-safety compliance.
//!
//! - [`ComplianceEngine`] evaluates a BOM locally against a
//!   [`QuantumSafePolicy`].
//! - [`ComplianceResolver`] prefers a remote [`ComplianceService`] and falls
//!   back to the local engine when the remote report is unusable.
//! - [`summary`] answers per-asset questions about a finished report.

mod engine;
mod remote;
pub mod summary;
mod types;

pub use engine::{
    quantum_safe_levels, ComplianceEngine, QuantumSafePolicy, DEFAULT_LEVEL, LOCAL_POLICY_NAME,
    LOCAL_SERVICE_NAME, NOT_APPLICABLE, NOT_QUANTUM_SAFE, QUANTUM_SAFE, UNKNOWN,
};
#[cfg(feature = "remote")]
pub use remote::{RemoteClientConfig, RemoteComplianceClient};
pub use remote::{
    ComplianceResolver, ComplianceService, FallbackReason, ReportSource, ResolvedReport,
    DEFAULT_POLICY_IDENTIFIER,
};
pub use types::{ComplianceIcon, ComplianceLevel, ComplianceReport, Finding, LevelId};
