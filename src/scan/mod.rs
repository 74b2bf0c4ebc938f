//! Live-scan message stream.
//!
//! A scanner streams JSON messages, one per line: status labels,
//! provisional detections, repository facts and finally the consolidated
//! CBOM. [`ScanAccumulator`] folds them into scan state. Provisional
//! detections only exist until the final CBOM arrives, which replaces them
//! outright.

use crate::error::{CbomError, ParseErrorKind, Result};
use crate::model::{expand_components, CodeOrigin, Detection};
use crate::session::SessionSignal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::BufRead;

/// Label sent when the scanner begins.
pub const STARTING_LABEL: &str = "Starting...";
/// Label sent when the scanner is done.
pub const FINISHED_LABEL: &str = "Finished";

/// One streamed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanMessage {
    /// Progress label
    Label { message: String },
    /// Scanner failure
    Error { message: String },
    /// A crypto-asset component, serialized as a JSON string
    Detection { message: String },
    /// The final CBOM, serialized as a JSON string
    Cbom { message: String },
    /// Branch that was scanned
    Branch { message: String },
    ScannedFileCount { message: String },
    ScannedNumberOfLines { message: String },
    ScannedDuration { message: String },
    /// Commit that was scanned
    RevisionHash { message: String },
    /// Package URLs of the scanned project
    Purl {
        #[serde(default)]
        purls: Option<Vec<String>>,
    },
    #[serde(other)]
    Unknown,
}

/// Lifecycle of a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
    Finished,
    Failed,
}

/// Counters reported by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files: Option<u64>,
    pub lines: Option<u64>,
    /// Scanner-reported duration, as sent
    pub scan_duration: Option<String>,
    /// Seconds between the start and finish labels
    pub total_duration_secs: Option<i64>,
}

/// Folds scan messages into the current scan state.
#[derive(Debug, Clone, Default)]
pub struct ScanAccumulator {
    status: ScanStatus,
    status_message: Option<String>,
    started_at: Option<DateTime<Utc>>,
    provisional: Vec<Value>,
    final_bom: Option<Value>,
    origin: CodeOrigin,
    stats: ScanStats,
    signals: Vec<SessionSignal>,
}

impl ScanAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and start a scan of `origin`.
    pub fn start(&mut self, origin: CodeOrigin) {
        *self = Self {
            status: ScanStatus::Scanning,
            origin,
            ..Self::default()
        };
    }

    /// Feed one raw line. Blank lines are skipped.
    ///
    /// Malformed JSON is recorded as a [`SessionSignal::JsonParsing`] signal.
    pub fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match parse_message(line) {
            Ok(message) => self.handle(message),
            Err(e) => {
                tracing::warn!("{e}");
                self.signal(SessionSignal::JsonParsing);
            }
        }
    }

    /// Apply one message.
    pub fn handle(&mut self, message: ScanMessage) {
        match message {
            ScanMessage::Label { message } => {
                if message == STARTING_LABEL {
                    self.status = ScanStatus::Scanning;
                    self.started_at = Some(Utc::now());
                }
                if message == FINISHED_LABEL {
                    self.status = ScanStatus::Finished;
                    self.stats.total_duration_secs = self
                        .started_at
                        .map(|start| (Utc::now() - start).num_seconds());
                }
                self.status_message = Some(message);
            }
            ScanMessage::Error { message } => {
                tracing::error!("Error from scanner: {message}");
                self.status = ScanStatus::Failed;
                self.status_message = Some(message);
                self.signal(SessionSignal::ScanError);
            }
            ScanMessage::Detection { message } => match serde_json::from_str(&message) {
                Ok(asset) => self.provisional.push(asset),
                Err(e) => {
                    tracing::warn!("Could not parse streamed detection: {e}");
                    self.signal(SessionSignal::JsonParsing);
                }
            },
            ScanMessage::Cbom { message } => match serde_json::from_str(&message) {
                Ok(bom) => {
                    tracing::info!(
                        "Received final CBOM, dropping {} provisional detection(s)",
                        self.provisional.len()
                    );
                    self.provisional.clear();
                    self.final_bom = Some(bom);
                }
                Err(e) => {
                    tracing::warn!("Could not parse streamed CBOM: {e}");
                    self.signal(SessionSignal::JsonParsing);
                }
            },
            ScanMessage::Branch { message } => self.origin.git_branch = Some(message),
            ScanMessage::RevisionHash { message } => self.origin.commit = Some(message),
            ScanMessage::Purl { purls } => self.origin.purls = purls.unwrap_or_default(),
            ScanMessage::ScannedFileCount { message } => {
                self.stats.files = parse_count(&message);
            }
            ScanMessage::ScannedNumberOfLines { message } => {
                self.stats.lines = parse_count(&message);
            }
            ScanMessage::ScannedDuration { message } => self.stats.scan_duration = Some(message),
            ScanMessage::Unknown => tracing::debug!("Ignoring scan message of unknown type"),
        }
    }

    /// Feed every line of `reader`.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (number, line) in reader.lines().enumerate() {
            let line = line
                .map_err(|e| CbomError::Scan(format!("reading line {}: {e}", number + 1)))?;
            self.handle_line(&line);
        }
        Ok(())
    }

    /// Detections streamed so far. Empty once the scan is no longer running.
    #[must_use]
    pub fn current_detections(&self) -> Vec<Detection> {
        if self.status == ScanStatus::Scanning {
            expand_components(&self.provisional).detections
        } else {
            Vec::new()
        }
    }

    /// Take the final CBOM, if it has arrived.
    pub fn take_final_bom(&mut self) -> Option<Value> {
        self.final_bom.take()
    }

    #[must_use]
    pub const fn has_final_bom(&self) -> bool {
        self.final_bom.is_some()
    }

    #[must_use]
    pub const fn status(&self) -> ScanStatus {
        self.status
    }

    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    #[must_use]
    pub const fn origin(&self) -> &CodeOrigin {
        &self.origin
    }

    #[must_use]
    pub const fn stats(&self) -> &ScanStats {
        &self.stats
    }

    #[must_use]
    pub fn signals(&self) -> &[SessionSignal] {
        &self.signals
    }

    fn signal(&mut self, signal: SessionSignal) {
        if !self.signals.contains(&signal) {
            self.signals.push(signal);
        }
    }
}

/// Decode one raw stream line.
pub fn parse_message(line: &str) -> Result<ScanMessage> {
    serde_json::from_str(line).map_err(|e| {
        CbomError::parse(
            "scan message",
            ParseErrorKind::InvalidMessage(e.to_string()),
        )
    })
}

fn parse_count(message: &str) -> Option<u64> {
    message.trim().parse().ok()
}
