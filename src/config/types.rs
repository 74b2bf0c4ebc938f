//! Configuration types for cbom-tools.

use crate::compliance::{QuantumSafePolicy, DEFAULT_POLICY_IDENTIFIER};
use crate::graph::default_reference_paths;
use crate::pipeline::OutputFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default timeout for remote compliance requests, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Compliance service selection
    pub compliance: ComplianceConfig,
    /// Reference graph construction
    pub graph: GraphConfig,
    /// Lookup tables of the local quantum-safe engine
    pub policy: QuantumSafePolicy,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the remote compliance service URL.
    pub fn service_url(mut self, url: Option<String>) -> Self {
        self.config.compliance.service_url = url;
        self
    }

    /// Set the policy identifier requested from the remote service.
    pub fn policy_identifier(mut self, policy: impl Into<String>) -> Self {
        self.config.compliance.policy_identifier = policy.into();
        self
    }

    /// Never contact a remote compliance service.
    pub const fn viewer_only(mut self, viewer_only: bool) -> Self {
        self.config.compliance.viewer_only = viewer_only;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Exit non-zero when an asset is not quantum safe.
    pub const fn fail_on_noncompliant(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_noncompliant = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Which compliance service produces reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Policy check endpoint of a remote service; local engine when unset
    pub service_url: Option<String>,
    /// Policy requested from the remote service
    pub policy_identifier: String,
    /// Request timeout in seconds
    #[schemars(range(min = 1))]
    pub timeout_secs: u64,
    /// Use the local engine even when a service URL is set
    pub viewer_only: bool,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            policy_identifier: DEFAULT_POLICY_IDENTIFIER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            viewer_only: false,
        }
    }
}

impl ComplianceConfig {
    /// The remote URL to use, if any.
    #[must_use]
    pub fn remote_url(&self) -> Option<&str> {
        if self.viewer_only {
            return None;
        }
        self.service_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Reference graph construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    /// Dotted paths, relative to a detection, whose string values are
    /// references to other assets
    pub reference_paths: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            reference_paths: default_reference_paths(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Output file path (None for stdout)
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 2 when an asset is not quantum safe
    pub fail_on_noncompliant: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}
