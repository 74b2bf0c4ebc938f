//! Validate command handler.

use super::emit;
use crate::config::AppConfig;
use crate::pipeline::{exit_codes, load_bom};
use crate::validation::{validate_bom, BomValidity};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Run the validate command.
pub fn run_validate(bom_path: &Path, config: &AppConfig) -> Result<i32> {
    let bom = load_bom(bom_path)?;
    let validity = validate_bom(Some(&bom));

    emit(config, &validity, format_validity)?;

    Ok(if validity.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::INVALID
    })
}

fn format_validity(validity: &BomValidity) -> String {
    let mut out = String::new();
    let verdict = if validity.valid { "VALID" } else { "INVALID" };
    let _ = writeln!(out, "CBOM is {verdict}");
    if validity.ignored_some_component {
        let _ = writeln!(out, "Some components are not cryptographic assets and were ignored");
    }
    for message in &validity.messages {
        let _ = writeln!(out, "  - {message}");
    }
    out
}
