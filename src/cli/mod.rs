//! CLI command handlers.
//!
//! Handlers are invoked by main.rs and return the process exit code.

mod compliance;
mod detections;
mod graph;
mod replay;
mod validate;

pub use compliance::run_compliance;
pub use detections::run_detections;
pub use graph::run_graph;
pub use replay::run_replay;
pub use validate::run_validate;

use crate::compliance::{ComplianceEngine, ComplianceResolver};
use crate::config::AppConfig;
use crate::graph::GraphBuilder;
use crate::pipeline::{auto_detect_format, write_output, OutputFormat, OutputTarget};
use crate::session::CbomSession;
use anyhow::Result;
use serde::Serialize;

/// Build the compliance resolver described by `config`.
///
/// A configured service URL is ignored in viewer-only mode and when the
/// `remote` feature is disabled.
pub fn build_resolver(config: &AppConfig) -> Result<ComplianceResolver> {
    let engine = ComplianceEngine::new(config.policy.clone());
    let Some(url) = config.compliance.remote_url() else {
        return Ok(ComplianceResolver::local(engine));
    };

    #[cfg(feature = "remote")]
    {
        use crate::compliance::{RemoteClientConfig, RemoteComplianceClient};
        let client = RemoteComplianceClient::new(RemoteClientConfig {
            url: url.to_string(),
            timeout: std::time::Duration::from_secs(config.compliance.timeout_secs),
        })?;
        Ok(ComplianceResolver::with_service(engine, Box::new(client))
            .policy_identifier(config.compliance.policy_identifier.clone()))
    }

    #[cfg(not(feature = "remote"))]
    {
        tracing::warn!(
            "Compliance service {url} configured but the 'remote' feature is not enabled; \
             using the local engine"
        );
        Ok(ComplianceResolver::local(engine))
    }
}

/// Build a session with the resolver and reference paths from `config`.
pub fn build_session(config: &AppConfig) -> Result<CbomSession> {
    Ok(CbomSession::with_builder(
        build_resolver(config)?,
        GraphBuilder::new(config.graph.reference_paths.clone()),
    ))
}

/// Write `value` as JSON, or `summary` rendered as text, depending on the
/// configured format.
fn emit<T, F>(config: &AppConfig, value: &T, summary: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let target = OutputTarget::from_option(config.output.file.clone());
    let content = match auto_detect_format(config.output.format, &target) {
        OutputFormat::Summary => summary(value),
        OutputFormat::Json | OutputFormat::Auto => crate::pipeline::to_json(value)?,
    };
    write_output(&content, &target, config.behavior.quiet)
}
