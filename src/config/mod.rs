//! Configuration module for cbom-tools.
//!
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.cbom-tools.yaml` file in your project root or `~/.config/cbom-tools/`:
//!
//! ```yaml
//! compliance:
//!   service_url: https://policy.example.com/api/v1/compliance/check
//!   policy_identifier: quantum_safe
//! behavior:
//!   fail_on_noncompliant: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, ComplianceConfig, GraphConfig, OutputConfig,
    DEFAULT_TIMEOUT_SECS,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError, ExplicitOverrides,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// The schema documents every option accepted in `.cbom-tools.yaml`.
pub fn generate_json_schema() -> serde_json::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["compliance", "graph", "policy", "output", "behavior"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
