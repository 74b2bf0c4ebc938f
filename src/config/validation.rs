//! Configuration validation for cbom-tools.

use super::types::{AppConfig, BehaviorConfig, ComplianceConfig, GraphConfig, OutputConfig};
use crate::compliance::QuantumSafePolicy;
use crate::error::{CbomError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl AppConfig {
    /// Return the config if it is valid, otherwise one error listing every
    /// problem. Each problem is also logged.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        for error in &errors {
            tracing::error!("{error}");
        }
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(CbomError::config(joined.join("; ")))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.compliance.validate());
        errors.extend(self.graph.validate());
        errors.extend(self.policy.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for ComplianceConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(url) = &self.service_url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            errors.push(ConfigError::new(
                "compliance.service_url",
                format!("URL must use http or https, got '{url}'"),
            ));
        }

        if self.policy_identifier.trim().is_empty() {
            errors.push(ConfigError::new(
                "compliance.policy_identifier",
                "Policy identifier must not be empty",
            ));
        }

        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "compliance.timeout_secs",
                "Timeout must be at least one second",
            ));
        }

        errors
    }
}

impl Validatable for GraphConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (i, path) in self.reference_paths.iter().enumerate() {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                errors.push(ConfigError::new(
                    "graph.reference_paths",
                    format!("Path {i} ('{path}') has an empty segment"),
                ));
            }
        }
        errors
    }
}

impl Validatable for QuantumSafePolicy {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.asymmetric_primitives.is_empty() {
            errors.push(ConfigError::new(
                "policy.asymmetric_primitives",
                "At least one asymmetric primitive is required",
            ));
        }
        if let Some(token) = self.name_whitelist.iter().find(|t| **t != t.to_lowercase()) {
            errors.push(ConfigError::new(
                "policy.name_whitelist",
                format!("Name tokens are matched in lowercase, got '{token}'"),
            ));
        }
        if self.name_whitelist.iter().any(String::is_empty) {
            errors.push(ConfigError::new(
                "policy.name_whitelist",
                "Name tokens must not be empty",
            ));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(file_path) = &self.file
            && let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError::new(
                "output.file",
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let errors = AppConfig::default().validate();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_validated_collects_every_error() {
        let mut config = AppConfig::default();
        config.compliance.timeout_secs = 0;
        config.graph.reference_paths = vec![".x".to_string()];
        match config.validated() {
            Err(CbomError::Config(message)) => {
                assert!(message.contains("compliance.timeout_secs"));
                assert!(message.contains("graph.reference_paths"));
            }
            other => panic!("expected a config error, got {other:?}"),
        }
        assert!(AppConfig::default().validated().is_ok());
    }

    #[test]
    fn test_compliance_validation() {
        let config = ComplianceConfig {
            service_url: Some("ftp://svc".to_string()),
            policy_identifier: " ".to_string(),
            timeout_secs: 0,
            viewer_only: false,
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "compliance.service_url");
    }

    #[test]
    fn test_graph_validation() {
        let config = GraphConfig {
            reference_paths: vec!["a..b".to_string(), "ok.path".to_string()],
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("a..b"));
    }

    #[test]
    fn test_policy_validation() {
        let policy = QuantumSafePolicy {
            asymmetric_primitives: Vec::new(),
            name_whitelist: vec!["ML-KEM".to_string()],
            ..QuantumSafePolicy::default()
        };
        assert_eq!(policy.validate().len(), 2);
        assert!(QuantumSafePolicy::default().is_valid());
    }

    #[test]
    fn test_output_validation() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/out.json")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());

        let config = OutputConfig {
            file: Some(PathBuf::from("out.json")),
            ..OutputConfig::default()
        };
        assert!(config.is_valid());
    }
}
