//! Shared plumbing for command handlers: loading documents and writing
//! results.

mod output;

pub use output::{auto_detect_format, to_json, write_output, OutputFormat, OutputTarget};

use crate::error::{ErrorContext, Result};
use serde_json::Value;
use std::path::Path;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success: the document is valid and, when asked, compliant
    pub const SUCCESS: i32 = 0;
    /// The document failed validation
    pub const INVALID: i32 = 1;
    /// At least one asset is below the quantum-safe level
    pub const NONCOMPLIANT: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Parse a CBOM document from text.
pub fn parse_bom_str(content: &str) -> Result<Value> {
    let trimmed = content.trim_start_matches('\u{feff}');
    serde_json::from_str(trimmed).context("decoding CBOM JSON")
}

/// Read and parse a CBOM document, `-` meaning stdin.
pub fn load_bom(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("reading CBOM from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?
    };
    tracing::debug!("Read {} bytes from {}", content.len(), path.display());
    parse_bom_str(&content).with_context(|| format!("parsing {}", path.display()))
}
