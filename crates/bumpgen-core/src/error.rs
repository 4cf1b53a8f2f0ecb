//! Error types for normal map derivation and upload.

use thiserror::Error;

/// Common trait for reportable errors.
///
/// Every error type in this crate carries a stable code and a category so
/// callers (the CLI in particular) can report them uniformly:
///
/// ```ignore
/// use bumpgen_core::error::ReportableError;
///
/// fn report<E: ReportableError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait ReportableError: std::error::Error {
    /// Stable error code such as "NORMAL_001".
    fn code(&self) -> &'static str;

    /// Human-readable message, by default the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Category for grouping related errors ("normal", "upload", "png").
    fn category(&self) -> &'static str;
}

/// Errors from normal map derivation.
///
/// The derivation is a pure transform, so the only failure is a caller
/// handing it inputs that break the buffer invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalMapError {
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
}

impl NormalMapError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        NormalMapError::PreconditionViolation(message.into())
    }
}

impl ReportableError for NormalMapError {
    fn code(&self) -> &'static str {
        match self {
            NormalMapError::PreconditionViolation(_) => "NORMAL_001",
        }
    }

    fn category(&self) -> &'static str {
        "normal"
    }
}

/// Errors reported by a texture upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("buffer domain {buffer} does not match storage format {storage}")]
    DomainMismatch {
        buffer: &'static str,
        storage: &'static str,
    },

    #[error("upload rejected: {0}")]
    Rejected(String),
}

impl ReportableError for UploadError {
    fn code(&self) -> &'static str {
        match self {
            UploadError::DomainMismatch { .. } => "UPLOAD_001",
            UploadError::Rejected(_) => "UPLOAD_002",
        }
    }

    fn category(&self) -> &'static str {
        "upload"
    }
}

/// Error for the combined derive-then-upload flow.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Derive(#[from] NormalMapError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ReportableError for PipelineError {
    fn code(&self) -> &'static str {
        match self {
            PipelineError::Derive(e) => e.code(),
            PipelineError::Upload(e) => e.code(),
        }
    }

    fn category(&self) -> &'static str {
        match self {
            PipelineError::Derive(e) => e.category(),
            PipelineError::Upload(e) => e.category(),
        }
    }
}
