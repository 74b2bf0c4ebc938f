//! Per-asset views over a [`ComplianceReport`].

use super::types::{ComplianceLevel, ComplianceReport, Finding, LevelId};
use crate::model::Detection;
use indexmap::IndexMap;

/// Findings about one asset.
pub fn findings_for<'a>(
    report: &'a ComplianceReport,
    bom_ref: &'a str,
) -> impl Iterator<Item = &'a Finding> + 'a {
    report.findings.iter().filter(move |f| f.bom_ref == bom_ref)
}

/// Findings about one asset that carry a non-empty message.
#[must_use]
pub fn findings_with_message<'a>(report: &'a ComplianceReport, bom_ref: &str) -> Vec<&'a Finding> {
    report
        .findings
        .iter()
        .filter(|f| f.bom_ref == bom_ref && f.message.as_deref().is_some_and(|m| !m.is_empty()))
        .collect()
}

/// Level of an asset: the lowest level id among its findings, or the
/// report's default level when it has none.
///
/// `None` for error reports.
#[must_use]
pub fn level_for(report: &ComplianceReport, bom_ref: &str) -> Option<LevelId> {
    if report.error {
        return None;
    }
    Some(
        findings_for(report, bom_ref)
            .map(|f| f.level_id)
            .min()
            .unwrap_or(report.default_compliance_level),
    )
}

/// The declared level with the given id.
#[must_use]
pub fn level_by_id(report: &ComplianceReport, id: LevelId) -> Option<&ComplianceLevel> {
    let mut matching = report.compliance_levels.iter().filter(|l| l.id == id);
    match (matching.next(), matching.next()) {
        (Some(level), None) => Some(level),
        _ => {
            tracing::warn!("No unique compliance level found for id {id}");
            None
        }
    }
}

/// Level description of an asset, falling back to the level label.
#[must_use]
pub fn description_for<'a>(report: &'a ComplianceReport, bom_ref: &str) -> Option<&'a str> {
    let id = level_for(report, bom_ref)?;
    level_by_id(report, id).map(ComplianceLevel::description_or_label)
}

/// Number of detections at each declared level, in declaration order.
///
/// Detections whose level is not declared are not counted. `None` for
/// error reports.
#[must_use]
pub fn repartition(
    report: &ComplianceReport,
    detections: &[Detection],
) -> Option<IndexMap<LevelId, usize>> {
    if report.error {
        return None;
    }
    let mut counts: IndexMap<LevelId, usize> =
        report.compliance_levels.iter().map(|l| (l.id, 0)).collect();
    for detection in detections {
        let id = detection
            .bom_ref()
            .and_then(|r| level_for(report, r))
            .unwrap_or(report.default_compliance_level);
        if let Some(count) = counts.get_mut(&id) {
            *count += 1;
        }
    }
    Some(counts)
}
