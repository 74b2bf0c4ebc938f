//! Replay command handler: feed a recorded scan stream through the scan
//! accumulator and load the final CBOM it produced.

use super::{build_session, emit};
use crate::config::AppConfig;
use crate::model::CodeOrigin;
use crate::pipeline::exit_codes;
use crate::scan::{ScanAccumulator, ScanStats, ScanStatus};
use crate::session::{BomSource, SessionSignal};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutcome {
    status: ScanStatus,
    status_message: Option<String>,
    stats: ScanStats,
    origin: CodeOrigin,
    detections: usize,
    valid: Option<bool>,
    compliant: Option<bool>,
    signals: Vec<SessionSignal>,
}

/// Run the replay command.
pub fn run_replay(stream_path: &Path, config: &AppConfig) -> Result<i32> {
    let file = std::fs::File::open(stream_path)
        .with_context(|| format!("Failed to open {}", stream_path.display()))?;

    let mut scan = ScanAccumulator::new();
    scan.start(CodeOrigin::default());
    scan.replay(BufReader::new(file))?;

    let mut outcome = ReplayOutcome {
        status: scan.status(),
        status_message: scan.status_message().map(str::to_string),
        stats: scan.stats().clone(),
        origin: scan.origin().clone(),
        detections: scan.current_detections().len(),
        valid: None,
        compliant: None,
        signals: scan.signals().to_vec(),
    };

    if let Some(bom) = scan.take_final_bom() {
        let session = build_session(config)?;
        let snapshot = session.load(
            bom,
            BomSource::LiveScan {
                origin: scan.origin().clone(),
            },
        );
        outcome.origin = snapshot.origin.clone();
        outcome.detections = snapshot.detections().len();
        outcome.valid = Some(snapshot.validity.valid);
        outcome.compliant = (!snapshot.compliance.report.error)
            .then_some(snapshot.compliance.report.global_compliance_status);
        for signal in &snapshot.signals {
            if !outcome.signals.contains(signal) {
                outcome.signals.push(*signal);
            }
        }
    } else {
        tracing::warn!("The stream did not contain a final CBOM");
    }

    emit(config, &outcome, format_outcome)?;

    Ok(match outcome.status {
        ScanStatus::Failed => exit_codes::ERROR,
        _ if outcome.valid == Some(false) => exit_codes::INVALID,
        _ if config.behavior.fail_on_noncompliant && outcome.compliant == Some(false) => {
            exit_codes::NONCOMPLIANT
        }
        _ => exit_codes::SUCCESS,
    })
}

fn format_outcome(outcome: &ReplayOutcome) -> String {
    let mut out = format!(
        "Scan {:?}: {}\n",
        outcome.status,
        outcome.status_message.as_deref().unwrap_or("")
    );
    if let Some(url) = &outcome.origin.git_url {
        let branch = outcome.origin.git_branch.as_deref().unwrap_or("?");
        let _ = writeln!(out, "  {url} @ {branch}");
    }
    if let Some(files) = outcome.stats.files {
        let _ = writeln!(out, "  {files} file(s) scanned");
    }
    if let Some(secs) = outcome.stats.total_duration_secs {
        let _ = writeln!(out, "  {secs}s total");
    }
    let _ = writeln!(out, "  {} detection(s)", outcome.detections);
    if let Some(compliant) = outcome.compliant {
        let _ = writeln!(out, "  compliant: {compliant}");
    }
    for signal in &outcome.signals {
        let _ = writeln!(out, "  ! {}", signal.description());
    }
    out
}
