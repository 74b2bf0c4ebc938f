//! Named configuration presets.

use super::types::{AppConfig, BehaviorConfig, ComplianceConfig, OutputConfig};
use crate::pipeline::OutputFormat;

/// Named presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigPreset {
    /// Remote service when configured, local engine otherwise
    #[default]
    Default,
    /// Local engine only, nothing leaves the machine
    Offline,
    /// JSON output and a failing exit code for non-compliant documents
    CiCd,
}

impl ConfigPreset {
    /// Get the preset name as used in CLI and config files.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Offline => "offline",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from its name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "offline" | "viewer" => Some(Self::Offline),
            "ci-cd" | "cicd" | "ci" => Some(Self::CiCd),
            _ => None,
        }
    }

    /// All available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Offline, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Offline => Self {
                compliance: ComplianceConfig {
                    viewer_only: true,
                    ..ComplianceConfig::default()
                },
                ..Self::default()
            },
            ConfigPreset::CiCd => Self {
                output: OutputConfig {
                    format: OutputFormat::Json,
                    no_color: true,
                    ..OutputConfig::default()
                },
                behavior: BehaviorConfig {
                    fail_on_noncompliant: true,
                    quiet: true,
                },
                ..Self::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(ConfigPreset::from_name("CI"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("bogus"), None);
    }

    #[test]
    fn test_offline_preset_never_goes_remote() {
        let mut config = AppConfig::from_preset(ConfigPreset::Offline);
        config.compliance.service_url = Some("https://svc".to_string());
        assert_eq!(config.compliance.remote_url(), None);
    }

    #[test]
    fn test_ci_cd_preset() {
        let config = AppConfig::from_preset(ConfigPreset::CiCd);
        assert!(config.behavior.fail_on_noncompliant);
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}
