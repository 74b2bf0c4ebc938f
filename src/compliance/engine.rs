//! Local quantum-safety policy evaluation.
//!
//! Each cryptographic asset is classified by the first matching rule:
//!
//! 1. `nistQuantumSecurityLevel > 0` is quantum safe.
//! 2. No primitive is unknown.
//! 3. A symmetric primitive is not applicable.
//! 4. An OID on the whitelist is quantum safe.
//! 5. A name containing a whitelisted family token is quantum safe.
//! 6. An asymmetric primitive is not quantum safe.
//! 7. Anything left (primitive `unknown`/`other`) is unknown.

use super::types::{ComplianceIcon, ComplianceLevel, ComplianceReport, Finding, LevelId};
use crate::error::{CbomError, ComplianceErrorKind, Result};
use crate::model::{is_crypto_asset, is_truthy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name the local engine reports itself under.
pub const LOCAL_SERVICE_NAME: &str = "Basic Local Compliance Service";
/// Policy applied by the local engine.
pub const LOCAL_POLICY_NAME: &str = "NIST Post-Quantum Cryptography";

pub const NOT_QUANTUM_SAFE: LevelId = 1;
pub const UNKNOWN: LevelId = 2;
pub const QUANTUM_SAFE: LevelId = 3;
pub const NOT_APPLICABLE: LevelId = 4;

/// Level used for assets that could not be classified.
pub const DEFAULT_LEVEL: LevelId = UNKNOWN;

/// Lookup tables of the quantum-safe policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QuantumSafePolicy {
    /// Primitives classified as asymmetric
    pub asymmetric_primitives: Vec<String>,
    /// Primitives that do not allow classification on their own
    pub unknown_primitives: Vec<String>,
    /// Lowercase algorithm-family tokens matched against asset names
    pub name_whitelist: Vec<String>,
    /// OIDs of post-quantum algorithms
    pub oid_whitelist: Vec<String>,
}

impl Default for QuantumSafePolicy {
    fn default() -> Self {
        Self {
            asymmetric_primitives: strings(&["signature", "key-agree", "kem", "pke"]),
            unknown_primitives: strings(&["unknown", "other"]),
            name_whitelist: strings(&[
                "ml-kem", "ml-dsa", "slh-dsa", "pqxdh", "bike", "mceliece", "frodokem", "hqc",
                "kyber", "ntru", "crystals", "falcon", "mayo", "sphincs", "xmss", "lms",
            ]),
            oid_whitelist: strings(&[
                "1.3.6.1.4.1.2.267.12.4.4",
                "1.3.6.1.4.1.2.267.12.6.5",
                "1.3.6.1.4.1.2.267.12.8.7",
                "1.3.9999.6.4.16",
                "1.3.9999.6.7.16",
                "1.3.9999.6.4.13",
                "1.3.9999.6.7.13",
                "1.3.9999.6.5.12",
                "1.3.9999.6.8.12",
                "1.3.9999.6.5.10",
                "1.3.9999.6.8.10",
                "1.3.9999.6.6.12",
                "1.3.9999.6.9.12",
                "1.3.9999.6.6.10",
                "1.3.9999.6.9.10",
                "1.3.6.1.4.1.22554.5.6.1",
                "1.3.6.1.4.1.22554.5.6.2",
                "1.3.6.1.4.1.22554.5.6.3",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl QuantumSafePolicy {
    fn is_asymmetric(&self, primitive: &str) -> bool {
        self.asymmetric_primitives.iter().any(|p| p == primitive)
    }

    fn is_unknown(&self, primitive: &str) -> bool {
        self.unknown_primitives.iter().any(|p| p == primitive)
    }

    fn whitelisted_oid(&self, oid: &str) -> bool {
        self.oid_whitelist.iter().any(|o| o == oid)
    }

    /// First whitelist token contained in `name`, case-insensitively.
    fn whitelisted_name_token(&self, name: &str) -> Option<&str> {
        let lower = name.to_lowercase();
        self.name_whitelist
            .iter()
            .find(|token| lower.contains(&token.to_lowercase()))
            .map(String::as_str)
    }
}

/// The fixed four-level quantum-safety scale.
#[must_use]
pub fn quantum_safe_levels() -> Vec<ComplianceLevel> {
    vec![
        ComplianceLevel {
            id: NOT_QUANTUM_SAFE,
            label: "Not Quantum Safe".to_string(),
            color_hex: "#fac532".to_string(),
            icon: ComplianceIcon::Warning,
            description: None,
        },
        ComplianceLevel {
            id: UNKNOWN,
            label: "Unknown".to_string(),
            color_hex: "#17a9d1".to_string(),
            icon: ComplianceIcon::Unknown,
            description: Some("Unknown Compliance".to_string()),
        },
        ComplianceLevel {
            id: QUANTUM_SAFE,
            label: "Quantum Safe".to_string(),
            color_hex: "green".to_string(),
            icon: ComplianceIcon::CheckmarkSecure,
            description: None,
        },
        ComplianceLevel {
            id: NOT_APPLICABLE,
            label: "Not Applicable".to_string(),
            color_hex: "gray".to_string(),
            icon: ComplianceIcon::NotApplicable,
            description: Some(
                "Not Applicable: we only categorize asymmetric algorithms".to_string(),
            ),
        },
    ]
}

/// Evaluates BOMs against a [`QuantumSafePolicy`].
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    policy: QuantumSafePolicy,
}

impl ComplianceEngine {
    #[must_use]
    pub const fn new(policy: QuantumSafePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &QuantumSafePolicy {
        &self.policy
    }

    /// Evaluate every cryptographic asset of `bom`.
    ///
    /// Any failure yields an error report rather than a partial one.
    #[must_use]
    pub fn evaluate(&self, bom: &Value) -> ComplianceReport {
        match self.try_evaluate(bom) {
            Ok(report) => report,
            Err(err) => {
                tracing::error!("{err}");
                ComplianceReport::error(LOCAL_SERVICE_NAME)
            }
        }
    }

    /// Evaluate every cryptographic asset of `bom`, failing on the first
    /// asset without a bom-ref.
    pub fn try_evaluate(&self, bom: &Value) -> Result<ComplianceReport> {
        let components = match bom.get("components") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(value) if is_truthy(value) => {
                return Err(CbomError::compliance(
                    "local evaluation",
                    ComplianceErrorKind::ComponentsNotArray,
                ));
            }
            // Absent or falsy: nothing to evaluate
            _ => &[][..],
        };

        let mut findings = Vec::new();
        for (index, component) in components.iter().enumerate() {
            if !is_crypto_asset(component) {
                continue;
            }
            let bom_ref = component
                .get("bom-ref")
                .and_then(Value::as_str)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| {
                    CbomError::compliance(
                        "local evaluation",
                        ComplianceErrorKind::MissingBomRef { index },
                    )
                })?;
            let (level_id, message) = self.classify(component);
            findings.push(Finding::new(bom_ref, level_id, message));
        }

        let global_compliance_status = findings
            .iter()
            .all(|f| f.level_id != NOT_QUANTUM_SAFE && f.level_id != UNKNOWN);

        tracing::debug!(
            "Local compliance evaluated {} asset(s), compliant: {global_compliance_status}",
            findings.len()
        );

        Ok(ComplianceReport {
            compliance_service_name: LOCAL_SERVICE_NAME.to_string(),
            policy_name: LOCAL_POLICY_NAME.to_string(),
            findings,
            compliance_levels: quantum_safe_levels(),
            default_compliance_level: DEFAULT_LEVEL,
            global_compliance_status,
            error: false,
        })
    }

    /// Classify one cryptographic asset.
    #[must_use]
    pub fn classify(&self, component: &Value) -> (LevelId, String) {
        let Some(crypto) = component.get("cryptoProperties").filter(|v| is_truthy(v)) else {
            return (
                UNKNOWN,
                "The field 'cryptoProperties' was not set, which does not allow further categorization".to_string(),
            );
        };
        let Some(algorithm) = crypto.get("algorithmProperties").filter(|v| is_truthy(v)) else {
            return (
                UNKNOWN,
                "The field 'algorithmProperties' was not set, which does not allow further categorization".to_string(),
            );
        };

        if algorithm
            .get("nistQuantumSecurityLevel")
            .and_then(security_level)
            .is_some_and(|level| level > 0.0)
        {
            return (
                QUANTUM_SAFE,
                "The field 'nistQuantumSecurityLevel' was set with a strictly positive value in the CBOM".to_string(),
            );
        }

        let Some(primitive) = algorithm.get("primitive").filter(|v| is_truthy(v)) else {
            return (
                UNKNOWN,
                "The asset primitive was not set, which does not allow further categorization"
                    .to_string(),
            );
        };
        let primitive = primitive.as_str().unwrap_or_default();
        let asymmetric = self.policy.is_asymmetric(primitive);

        if !asymmetric && !self.policy.is_unknown(primitive) {
            return (
                NOT_APPLICABLE,
                "The asset has a symmetric primitive, so the Quantum Safe categorization is not applicable".to_string(),
            );
        }

        if crypto
            .get("oid")
            .and_then(Value::as_str)
            .is_some_and(|oid| self.policy.whitelisted_oid(oid))
        {
            return (
                QUANTUM_SAFE,
                "The OID of the asset is part of the Quantum Safe OIDs whitelist".to_string(),
            );
        }

        if let Some(token) = component
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| self.policy.whitelisted_name_token(name))
        {
            return (
                QUANTUM_SAFE,
                format!(
                    "The name of the asset contains '{token}', which is part of the Quantum Safe whitelist of component names"
                ),
            );
        }

        if asymmetric {
            (
                NOT_QUANTUM_SAFE,
                "The asset has an asymmetric primitive and does not match with the Quantum Safe whitelists of OIDs and names".to_string(),
            )
        } else {
            (
                UNKNOWN,
                "The asset primitive is unclear and does not allow further categorization"
                    .to_string(),
            )
        }
    }
}

/// Numeric security level, accepting numbers and numeric strings.
fn security_level(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
