//! Unified error types for cbom-tools.
//!
//! Document defects are never errors here: they are collected by the
//! validators as non-fatal findings. The types below cover failures that
//! stop an operation (unreadable input, an aborted compliance evaluation,
//! an unreachable compliance service).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cbom-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CbomError {
    /// Errors while reading or decoding a BOM or a message
    #[error("Failed to parse CBOM: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors that abort a compliance evaluation
    #[error("Compliance evaluation failed: {context}")]
    Compliance {
        context: String,
        #[source]
        source: ComplianceErrorKind,
    },

    /// Errors talking to a remote compliance service
    #[error("Remote compliance service failed: {context}")]
    Remote {
        context: String,
        #[source]
        source: RemoteErrorKind,
    },

    /// Errors reported by a live scan
    #[error("Scan failed: {0}")]
    Scan(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid stream message: {0}")]
    InvalidMessage(String),
}

/// Specific compliance error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ComplianceErrorKind {
    #[error("Cryptographic asset at index {index} has no bom-ref")]
    MissingBomRef { index: usize },

    #[error("The components field is not an array")]
    ComponentsNotArray,
}

/// Specific remote service error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RemoteErrorKind {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for cbom-tools operations
pub type Result<T> = std::result::Result<T, CbomError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl CbomError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a compliance error with context
    pub fn compliance(context: impl Into<String>, source: ComplianceErrorKind) -> Self {
        Self::Compliance {
            context: context.into(),
            source,
        }
    }

    /// Create a remote service error with context
    pub fn remote(context: impl Into<String>, source: RemoteErrorKind) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the failure came from the transport rather than the content.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Remote {
                source: RemoteErrorKind::NetworkError(_) | RemoteErrorKind::HttpStatus { .. },
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for CbomError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CbomError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to the existing one, so a chain reads
/// from the outermost operation to the innermost failure.
///
/// ```ignore
/// use cbom_tools::error::ErrorContext;
///
/// let bom: Value = serde_json::from_str(&content)
///     .with_context(|| format!("decoding {}", path.display()))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CbomError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: CbomError, new_ctx: &str) -> CbomError {
    match err {
        CbomError::Parse {
            context: existing,
            source,
        } => CbomError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CbomError::Compliance {
            context: existing,
            source,
        } => CbomError::Compliance {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CbomError::Remote {
            context: existing,
            source,
        } => CbomError::Remote {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CbomError::Io {
            path,
            message,
            source,
        } => CbomError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CbomError::Scan(msg) => CbomError::Scan(chain_context(new_ctx, &msg)),
        CbomError::Config(msg) => CbomError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: CbomError = serde_json::from_str::<serde_json::Value>("{")
            .map_err(CbomError::from)
            .unwrap_err();
        assert!(
            err.to_string().contains("CBOM"),
            "Error message should mention parsing: {err}"
        );

        let err = CbomError::compliance(
            "local engine",
            ComplianceErrorKind::MissingBomRef { index: 2 },
        );
        assert!(err.to_string().contains("local engine"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CbomError::io("/path/to/cbom.json", io_err);

        assert!(err.to_string().contains("/path/to/cbom.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(CbomError::parse(
                "base",
                ParseErrorKind::InvalidJson("trailing comma".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(CbomError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(CbomError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_connection_error_classification() {
        let net = CbomError::remote(
            "POST",
            RemoteErrorKind::NetworkError("connection refused".to_string()),
        );
        assert!(net.is_connection_error());

        let shape = CbomError::remote(
            "decode",
            RemoteErrorKind::InvalidResponse("not json".to_string()),
        );
        assert!(!shape.is_connection_error());
    }
}
