//! Compliance command handler.

use super::{build_resolver, emit};
use crate::compliance::{summary, ReportSource, ResolvedReport};
use crate::config::AppConfig;
use crate::model::expand_bom;
use crate::pipeline::{exit_codes, load_bom};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Run the compliance command.
pub fn run_compliance(bom_path: &Path, config: &AppConfig) -> Result<i32> {
    let bom = load_bom(bom_path)?;
    let resolver = build_resolver(config)?;
    let resolved = resolver.resolve(&bom);
    let detections = expand_bom(&bom).detections;

    if !config.behavior.quiet {
        tracing::info!(
            "{} finding(s) from {} ({:?})",
            resolved.report.findings.len(),
            resolved.report.compliance_service_name,
            resolved.source
        );
    }

    emit(config, &resolved, |r| format_report(r, &detections))?;

    if resolved.report.error {
        return Ok(exit_codes::ERROR);
    }
    if config.behavior.fail_on_noncompliant && !resolved.report.global_compliance_status {
        return Ok(exit_codes::NONCOMPLIANT);
    }
    Ok(exit_codes::SUCCESS)
}

fn format_report(resolved: &ResolvedReport, detections: &[crate::model::Detection]) -> String {
    let report = &resolved.report;
    let mut out = String::new();

    if report.error {
        let _ = writeln!(
            out,
            "Compliance could not be computed by {}",
            report.compliance_service_name
        );
        return out;
    }

    let source = match resolved.source {
        ReportSource::Remote => "remote",
        ReportSource::Local => "local",
        ReportSource::LocalFallback(_) => "local fallback",
    };
    let _ = writeln!(
        out,
        "{} ({}, {source})",
        report.policy_name, report.compliance_service_name
    );
    let status = if report.global_compliance_status {
        "COMPLIANT"
    } else {
        "NOT COMPLIANT"
    };
    let _ = writeln!(out, "Status: {status}");

    if let Some(counts) = summary::repartition(report, detections) {
        for (id, count) in &counts {
            if let Some(level) = summary::level_by_id(report, *id) {
                let _ = writeln!(out, "  {} {:<24} {count}", level.icon.symbol(), level.label);
            }
        }
    }

    for finding in &report.findings {
        let message = finding.message.as_deref().unwrap_or("");
        let _ = writeln!(out, "  [{}] {}: {message}", finding.level_id, finding.bom_ref);
    }
    out
}
