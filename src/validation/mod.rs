//! Document validation.
//!
//! Two independent checks: [`validate_bom`] for incoming CBOMs, producing a
//! defect list, and [`validate_compliance_report`] for compliance reports
//! that cross a trust boundary.

mod bom;
mod report;

pub use bom::{validate_bom, BomValidity, MANDATORY_FIELDS};
pub use report::validate_compliance_report;
