//! Detections command handler: the inventory of one CBOM.

use super::{build_session, emit};
use crate::config::AppConfig;
use crate::model::{count_algorithm_property, count_names, Occurrences};
use crate::pipeline::{exit_codes, load_bom};
use crate::session::{BomSource, SessionSignal, SessionSnapshot};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionRow {
    bom_ref: Option<String>,
    name: Option<String>,
    location: Option<String>,
    line: Option<u64>,
    compliance: Option<String>,
    source_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Inventory {
    detections: Vec<DetectionRow>,
    primitives: Occurrences,
    names: Occurrences,
    signals: Vec<SessionSignal>,
}

impl Inventory {
    fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let detections = snapshot.detections();
        let rows = detections
            .iter()
            .map(|detection| {
                let occurrence = detection.occurrence();
                DetectionRow {
                    bom_ref: detection.bom_ref().map(str::to_string),
                    name: snapshot.detection_display_name(detection).map(str::to_string),
                    location: occurrence
                        .as_ref()
                        .and_then(|o| o.location)
                        .map(str::to_string),
                    line: occurrence.and_then(|o| o.line),
                    compliance: snapshot
                        .compliance_level_for(detection)
                        .map(|level| level.label.clone()),
                    source_link: snapshot.source_link(detection),
                }
            })
            .collect();
        Self {
            detections: rows,
            primitives: count_algorithm_property(detections, "primitive"),
            names: count_names(detections),
            signals: snapshot.signals.clone(),
        }
    }
}

/// Run the detections command.
pub fn run_detections(bom_path: &Path, config: &AppConfig) -> Result<i32> {
    let bom = load_bom(bom_path)?;
    let file_name = bom_path
        .file_name()
        .map_or_else(|| "-".to_string(), |n| n.to_string_lossy().into_owned());

    let session = build_session(config)?;
    let snapshot = session.load(bom, BomSource::Upload { file_name });
    for signal in &snapshot.signals {
        tracing::warn!("{}", signal.description());
    }

    emit(config, &Inventory::from_snapshot(&snapshot), format_inventory)?;
    Ok(exit_codes::SUCCESS)
}

fn format_inventory(inventory: &Inventory) -> String {
    let mut out = format!(
        "{} detection(s), {} distinct name(s)\n",
        inventory.detections.len(),
        inventory.names.distinct()
    );
    for row in &inventory.detections {
        let name = row.name.as_deref().unwrap_or("<unnamed>");
        let level = row.compliance.as_deref().unwrap_or("-");
        let _ = write!(out, "  {name:<32} {level:<24}");
        match (&row.location, row.line) {
            (Some(location), Some(line)) => {
                let _ = write!(out, " {location}:{line}");
            }
            (Some(location), None) => {
                let _ = write!(out, " {location}");
            }
            _ => {}
        }
        out.push('\n');
    }
    if inventory.primitives.distinct() > 0 {
        let _ = writeln!(out, "Primitives:");
        for (primitive, count) in &inventory.primitives.entries {
            let _ = writeln!(out, "  {primitive:<16} {count}");
        }
    }
    out
}
