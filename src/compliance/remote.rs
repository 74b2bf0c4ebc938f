//! Compliance report resolution: remote service first, local engine as
//! fallback.
//!
//! Remote reports are untrusted. They are shape-checked with
//! [`validate_compliance_report`] and replaced by the local engine's report
//! when they fail the check or cannot be fetched.

use super::engine::{ComplianceEngine, LOCAL_SERVICE_NAME};
use super::types::ComplianceReport;
use crate::error::Result;
use crate::validation::validate_compliance_report;
use serde::Serialize;
use serde_json::Value;

/// Policy requested from remote services when none is configured.
pub const DEFAULT_POLICY_IDENTIFIER: &str = "quantum_safe";

/// A source of compliance reports for whole BOMs.
///
/// Implementations return the raw report; validation is the caller's job.
pub trait ComplianceService: Send + Sync {
    /// Request a report for `bom` under the policy `policy_identifier`.
    fn check(&self, bom: &Value, policy_identifier: &str) -> Result<Value>;

    /// Service name for logs.
    fn name(&self) -> &str;
}

/// Why the local engine replaced a remote report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    /// The request failed in transport (connection, HTTP status)
    Unreachable,
    /// A response arrived but was not a usable report
    Rejected,
}

/// Where the resolved report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "reason")]
pub enum ReportSource {
    Remote,
    Local,
    LocalFallback(FallbackReason),
}

/// A report together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedReport {
    pub report: ComplianceReport,
    pub source: ReportSource,
}

impl ResolvedReport {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, ReportSource::LocalFallback(_))
    }
}

/// Picks the report for a BOM.
pub struct ComplianceResolver {
    engine: ComplianceEngine,
    service: Option<Box<dyn ComplianceService>>,
    policy_identifier: String,
}

impl std::fmt::Debug for ComplianceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceResolver")
            .field("service", &self.service.as_ref().map(|s| s.name()))
            .field("policy_identifier", &self.policy_identifier)
            .finish_non_exhaustive()
    }
}

impl Default for ComplianceResolver {
    fn default() -> Self {
        Self::local(ComplianceEngine::default())
    }
}

impl ComplianceResolver {
    /// Viewer-only resolver: always the local engine.
    #[must_use]
    pub fn local(engine: ComplianceEngine) -> Self {
        Self {
            engine,
            service: None,
            policy_identifier: DEFAULT_POLICY_IDENTIFIER.to_string(),
        }
    }

    /// Resolver asking `service` first.
    #[must_use]
    pub fn with_service(engine: ComplianceEngine, service: Box<dyn ComplianceService>) -> Self {
        Self {
            engine,
            service: Some(service),
            policy_identifier: DEFAULT_POLICY_IDENTIFIER.to_string(),
        }
    }

    #[must_use]
    pub fn policy_identifier(mut self, policy_identifier: impl Into<String>) -> Self {
        self.policy_identifier = policy_identifier.into();
        self
    }

    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.service.is_none()
    }

    /// Resolve the compliance report for `bom`. Never fails.
    #[must_use]
    pub fn resolve(&self, bom: &Value) -> ResolvedReport {
        let Some(service) = &self.service else {
            return ResolvedReport {
                report: self.local_report(bom),
                source: ReportSource::Local,
            };
        };

        let reason = match service.check(bom, &self.policy_identifier) {
            Ok(raw) => match accept_remote(&raw) {
                Some(report) => {
                    tracing::debug!("Using compliance report from {}", service.name());
                    return ResolvedReport {
                        report,
                        source: ReportSource::Remote,
                    };
                }
                None => FallbackReason::Rejected,
            },
            Err(err) => {
                tracing::warn!("Compliance service {} failed: {err}", service.name());
                if err.is_connection_error() {
                    FallbackReason::Unreachable
                } else {
                    FallbackReason::Rejected
                }
            }
        };

        tracing::warn!("Using the local compliance report instead of the remote one");
        ResolvedReport {
            report: self.local_report(bom),
            source: ReportSource::LocalFallback(reason),
        }
    }

    /// Local report, replaced by an error report if it fails its own check.
    fn local_report(&self, bom: &Value) -> ComplianceReport {
        let report = self.engine.evaluate(bom);
        if report.error || validate_compliance_report(Some(&report.to_value())) {
            report
        } else {
            ComplianceReport::error(LOCAL_SERVICE_NAME)
        }
    }
}

fn accept_remote(raw: &Value) -> Option<ComplianceReport> {
    if !validate_compliance_report(Some(raw)) {
        return None;
    }
    serde_json::from_value(raw.clone())
        .inspect_err(|e| tracing::warn!("Compliance report could not be decoded: {e}"))
        .ok()
}

#[cfg(feature = "remote")]
pub use client::{RemoteClientConfig, RemoteComplianceClient};

#[cfg(feature = "remote")]
mod client {
    use super::ComplianceService;
    use crate::error::{CbomError, RemoteErrorKind, Result};
    use reqwest::blocking::Client;
    use serde_json::Value;
    use std::time::Duration;

    /// Remote compliance service configuration.
    #[derive(Debug, Clone)]
    pub struct RemoteClientConfig {
        /// Policy check endpoint, without query string
        pub url: String,
        pub timeout: Duration,
    }

    impl RemoteClientConfig {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                timeout: Duration::from_secs(30),
            }
        }
    }

    /// HTTP client for a remote compliance service.
    pub struct RemoteComplianceClient {
        client: Client,
        config: RemoteClientConfig,
    }

    fn network_error(msg: &str, err: &reqwest::Error) -> CbomError {
        CbomError::remote(msg, RemoteErrorKind::NetworkError(err.to_string()))
    }

    impl RemoteComplianceClient {
        pub fn new(config: RemoteClientConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(config.timeout)
                .user_agent(concat!(
                    env!("CARGO_PKG_NAME"),
                    "/",
                    env!("CARGO_PKG_VERSION")
                ))
                .build()
                .map_err(|e| network_error("Failed to create HTTP client", &e))?;
            Ok(Self { client, config })
        }
    }

    impl ComplianceService for RemoteComplianceClient {
        fn check(&self, bom: &Value, policy_identifier: &str) -> Result<Value> {
            tracing::debug!(
                "Requesting policy '{policy_identifier}' from {}",
                self.config.url
            );
            let response = self
                .client
                .post(&self.config.url)
                .query(&[("policyIdentifier", policy_identifier)])
                .json(bom)
                .send()
                .map_err(|e| network_error("Failed to send policy check request", &e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(CbomError::remote(
                    "policy check",
                    RemoteErrorKind::HttpStatus {
                        status: status.as_u16(),
                        body,
                    },
                ));
            }

            response.json().map_err(|e| {
                CbomError::remote(
                    "policy check",
                    RemoteErrorKind::InvalidResponse(e.to_string()),
                )
            })
        }

        fn name(&self) -> &str {
            &self.config.url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CbomError, RemoteErrorKind};
    use serde_json::json;

    struct FixedService(std::result::Result<Value, bool>);

    impl ComplianceService for FixedService {
        fn check(&self, _bom: &Value, policy_identifier: &str) -> Result<Value> {
            assert_eq!(policy_identifier, "custom");
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(true) => Err(CbomError::remote(
                    "test",
                    RemoteErrorKind::NetworkError("refused".to_string()),
                )),
                Err(false) => Err(CbomError::remote(
                    "test",
                    RemoteErrorKind::InvalidResponse("html".to_string()),
                )),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn bom() -> Value {
        json!({"components": [{
            "type": "cryptographic-asset",
            "bom-ref": "rsa",
            "name": "RSA",
            "cryptoProperties": {"algorithmProperties": {"primitive": "pke"}}
        }]})
    }

    fn resolver(outcome: std::result::Result<Value, bool>) -> ComplianceResolver {
        ComplianceResolver::with_service(
            ComplianceEngine::default(),
            Box::new(FixedService(outcome)),
        )
        .policy_identifier("custom")
    }

    #[test]
    fn test_local_only() {
        let resolver = ComplianceResolver::default();
        assert!(resolver.is_local_only());
        let resolved = resolver.resolve(&bom());
        assert_eq!(resolved.source, ReportSource::Local);
        assert_eq!(resolved.report.compliance_service_name, LOCAL_SERVICE_NAME);
    }

    #[test]
    fn test_valid_remote_report_is_used() {
        let remote = json!({
            "complianceServiceName": "Remote",
            "policyName": "Custom",
            "findings": [{"bomRef": "rsa", "levelId": 7}],
            "complianceLevels": [{"id": 7, "label": "Ok", "colorHex": "#0f0", "icon": "CHECKMARK"}],
            "defaultComplianceLevel": 7,
            "globalComplianceStatus": true,
            "error": false
        });
        let resolved = resolver(Ok(remote)).resolve(&bom());
        assert_eq!(resolved.source, ReportSource::Remote);
        assert_eq!(resolved.report.compliance_service_name, "Remote");
        assert!(!resolved.is_fallback());
    }

    #[test]
    fn test_invalid_remote_report_falls_back() {
        let resolved = resolver(Ok(json!({"error": true}))).resolve(&bom());
        assert_eq!(
            resolved.source,
            ReportSource::LocalFallback(FallbackReason::Rejected)
        );
        assert_eq!(resolved.report.compliance_service_name, LOCAL_SERVICE_NAME);
        assert_eq!(resolved.report.findings.len(), 1);
    }

    #[test]
    fn test_fractional_level_ids_fall_back() {
        let remote = json!({
            "complianceServiceName": "Remote",
            "policyName": "Custom",
            "findings": [],
            "complianceLevels": [{"id": 1.5, "label": "Odd", "colorHex": "#000", "icon": "ERROR"}],
            "defaultComplianceLevel": 1.5,
            "globalComplianceStatus": true,
            "error": false
        });
        let resolved = resolver(Ok(remote)).resolve(&bom());
        assert!(resolved.is_fallback());
    }

    #[test]
    fn test_transport_failure_falls_back_as_unreachable() {
        let resolved = resolver(Err(true)).resolve(&bom());
        assert_eq!(
            resolved.source,
            ReportSource::LocalFallback(FallbackReason::Unreachable)
        );

        let resolved = resolver(Err(false)).resolve(&bom());
        assert_eq!(
            resolved.source,
            ReportSource::LocalFallback(FallbackReason::Rejected)
        );
    }

    #[test]
    fn test_local_evaluation_error_surfaces_as_error_report() {
        let broken = json!({"components": [{"type": "cryptographic-asset", "cryptoProperties": {}}]});
        let resolved = ComplianceResolver::default().resolve(&broken);
        assert!(resolved.report.error);
        assert_eq!(resolved.source, ReportSource::Local);
    }
}
