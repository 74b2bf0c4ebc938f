//! The currently loaded CBOM and everything derived from it.
//!
//! A [`SessionSnapshot`] is built completely before it becomes visible, then
//! swapped in as a whole. Readers hold an `Arc` to the snapshot they got and
//! never see a half-built one. When loads overlap, the one that started
//! last wins and earlier results are dropped.

use crate::compliance::{
    summary, ComplianceLevel, ComplianceResolver, FallbackReason, ReportSource, ResolvedReport,
};
use crate::graph::{GraphBuilder, ReferenceGraph};
use crate::model::{expand_bom, source_link, CodeOrigin, Detection};
use crate::validation::{validate_bom, BomValidity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// How the current BOM was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum BomSource {
    /// A file provided by the user
    Upload { file_name: String },
    /// A stored scan retrieved by repository
    Api {
        git_url: String,
        branch: Option<String>,
    },
    /// The final document of a live scan
    LiveScan { origin: CodeOrigin },
}

/// Non-fatal conditions worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionSignal {
    /// The document failed structural validation
    InvalidCbom,
    /// Some components are not cryptographic assets and were skipped
    IgnoredComponent,
    /// The remote compliance report was replaced by the local one
    FallbackLocalCompliance,
    /// No compliance report could be computed
    ComplianceUnavailable,
    /// A streamed message was not valid JSON
    JsonParsing,
    /// A remote endpoint could not be reached
    NoConnection,
    /// The scanner reported an error
    ScanError,
}

impl SessionSignal {
    /// Message suitable for end users.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidCbom => "The CBOM is not valid; results may be incomplete",
            Self::IgnoredComponent => {
                "Some components are not cryptographic assets and were ignored"
            }
            Self::FallbackLocalCompliance => {
                "The compliance service was unavailable; the local compliance report is shown"
            }
            Self::ComplianceUnavailable => "Compliance results could not be computed",
            Self::JsonParsing => "A message could not be parsed as JSON",
            Self::NoConnection => "A remote service could not be reached",
            Self::ScanError => "The scan reported an error",
        }
    }
}

/// Everything derived from one loaded BOM.
#[derive(Debug)]
pub struct SessionSnapshot {
    pub bom: Value,
    pub validity: BomValidity,
    pub graph: ReferenceGraph,
    pub compliance: ResolvedReport,
    pub origin: CodeOrigin,
    pub source: BomSource,
    pub signals: Vec<SessionSignal>,
    pub loaded_at: DateTime<Utc>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn detections(&self) -> &[Detection] {
        self.graph.detections()
    }

    /// Name shown for a detection, without its identifier suffix.
    #[must_use]
    pub fn detection_display_name<'a>(&self, detection: &'a Detection) -> Option<&'a str> {
        detection.display_name()
    }

    /// Compliance level of a detection, `None` if no report is available.
    #[must_use]
    pub fn compliance_level_for(&self, detection: &Detection) -> Option<&ComplianceLevel> {
        let report = &self.compliance.report;
        let id = summary::level_for(report, detection.bom_ref()?)?;
        summary::level_by_id(report, id)
    }

    /// Browsable source URL of a detection.
    #[must_use]
    pub fn source_link(&self, detection: &Detection) -> Option<String> {
        source_link(&self.origin, detection)
    }

    #[must_use]
    pub fn has_signal(&self, signal: SessionSignal) -> bool {
        self.signals.contains(&signal)
    }
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    snapshot: Option<Arc<SessionSnapshot>>,
}

/// Holder of the current snapshot.
#[derive(Debug)]
pub struct CbomSession {
    resolver: ComplianceResolver,
    builder: GraphBuilder,
    started: AtomicU64,
    current: RwLock<Current>,
}

impl CbomSession {
    #[must_use]
    pub fn new(resolver: ComplianceResolver) -> Self {
        Self::with_builder(resolver, GraphBuilder::default())
    }

    #[must_use]
    pub fn with_builder(resolver: ComplianceResolver, builder: GraphBuilder) -> Self {
        Self {
            resolver,
            builder,
            started: AtomicU64::new(0),
            current: RwLock::new(Current::default()),
        }
    }

    /// Build a snapshot for `bom` and make it current.
    ///
    /// If another load started after this one and already finished, the
    /// returned snapshot is not installed.
    pub fn load(&self, bom: Value, source: BomSource) -> Arc<SessionSnapshot> {
        let ticket = self.begin();
        let snapshot = Arc::new(self.build(bom, source));
        self.install(ticket, Arc::clone(&snapshot));
        snapshot
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<SessionSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    /// Drop the current snapshot and any load still in progress.
    pub fn clear(&self) {
        let ticket = self.begin();
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.generation = ticket;
        current.snapshot = None;
    }

    fn begin(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn install(&self, ticket: u64, snapshot: Arc<SessionSnapshot>) -> bool {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if ticket < current.generation {
            tracing::debug!(
                "Discarding stale CBOM load {ticket} (current is {})",
                current.generation
            );
            return false;
        }
        current.generation = ticket;
        current.snapshot = Some(snapshot);
        true
    }

    fn build(&self, bom: Value, source: BomSource) -> SessionSnapshot {
        let validity = validate_bom(Some(&bom));
        let expansion = expand_bom(&bom);
        let graph = self.builder.build_with_detections(&bom, expansion.detections);
        let compliance = self.resolver.resolve(&bom);

        let mut origin = CodeOrigin::from_bom(&bom);
        match &source {
            BomSource::Upload { file_name } => {
                origin.uploaded_file_name = Some(file_name.clone());
            }
            BomSource::Api { git_url, branch } => {
                origin.git_url = Some(git_url.clone());
                if branch.is_some() {
                    origin.git_branch.clone_from(branch);
                }
            }
            BomSource::LiveScan { origin: scanned } => origin.fill_from(scanned),
        }

        let signals = collect_signals(&validity, &compliance);
        tracing::info!(
            "Loaded CBOM: {} detection(s), {} relation(s), compliance from {:?}",
            graph.detections().len(),
            graph.relation_count(),
            compliance.source
        );

        SessionSnapshot {
            bom,
            validity,
            graph,
            compliance,
            origin,
            source,
            signals,
            loaded_at: Utc::now(),
        }
    }
}

fn collect_signals(validity: &BomValidity, compliance: &ResolvedReport) -> Vec<SessionSignal> {
    let mut signals = Vec::new();
    if validity.ignored_some_component {
        signals.push(SessionSignal::IgnoredComponent);
    }
    if !validity.valid {
        signals.push(SessionSignal::InvalidCbom);
    }
    if let ReportSource::LocalFallback(reason) = compliance.source {
        if reason == FallbackReason::Unreachable {
            signals.push(SessionSignal::NoConnection);
        }
        signals.push(SessionSignal::FallbackLocalCompliance);
    }
    if compliance.report.error {
        signals.push(SessionSignal::ComplianceUnavailable);
    }
    signals
}
