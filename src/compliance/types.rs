//! Compliance report data model, serialized in the camelCase wire format
//! shared by the local engine and remote compliance services.

use crate::model::is_truthy;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a compliance level within a report.
pub type LevelId = u32;

/// Icon shown next to a compliance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceIcon {
    Checkmark,
    CheckmarkSecure,
    Warning,
    Error,
    NotApplicable,
    Unknown,
}

impl ComplianceIcon {
    pub const ALL: [Self; 6] = [
        Self::Checkmark,
        Self::CheckmarkSecure,
        Self::Warning,
        Self::Error,
        Self::NotApplicable,
        Self::Unknown,
    ];

    /// Wire name, e.g. `CHECKMARK_SECURE`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Checkmark => "CHECKMARK",
            Self::CheckmarkSecure => "CHECKMARK_SECURE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Unknown => "UNKNOWN",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.name() == name)
    }

    /// Single-character marker for terminal output.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Checkmark => "✓",
            Self::CheckmarkSecure => "🔒",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::NotApplicable => "-",
            Self::Unknown => "?",
        }
    }
}

/// One level of a compliance scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceLevel {
    pub id: LevelId,
    pub label: String,
    pub color_hex: String,
    pub icon: ComplianceIcon,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_if_set"
    )]
    pub description: Option<String>,
}

impl ComplianceLevel {
    /// Description, or the label when none is set.
    #[must_use]
    pub fn description_or_label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.label)
    }
}

/// Verdict for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub bom_ref: String,
    pub level_id: LevelId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_if_set"
    )]
    pub message: Option<String>,
}

impl Finding {
    pub fn new(bom_ref: impl Into<String>, level_id: LevelId, message: impl Into<String>) -> Self {
        Self {
            bom_ref: bom_ref.into(),
            level_id,
            message: Some(message.into()),
        }
    }
}

/// A complete compliance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub compliance_service_name: String,
    pub policy_name: String,
    pub findings: Vec<Finding>,
    pub compliance_levels: Vec<ComplianceLevel>,
    pub default_compliance_level: LevelId,
    pub global_compliance_status: bool,
    pub error: bool,
}

impl ComplianceReport {
    /// A report standing for "compliance could not be computed".
    #[must_use]
    pub fn error(service_name: impl Into<String>) -> Self {
        Self {
            compliance_service_name: service_name.into(),
            policy_name: String::new(),
            findings: Vec::new(),
            compliance_levels: Vec::new(),
            default_compliance_level: 0,
            global_compliance_status: false,
            error: true,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error
    }

    /// Wire representation.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Keep strings, treat any falsy value as absent.
///
/// Truthy non-strings are rejected upstream by the report validator.
fn string_if_set<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        other if !is_truthy(&other) => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}
