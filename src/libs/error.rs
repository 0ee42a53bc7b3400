//! Error taxonomy for the install workflow.
//!
//! Library code returns [`InstallError`]; the command layer wraps it in
//! `anyhow` only at the edges. Each variant maps to one class of failure so
//! the orchestrator can decide which steps are fatal and which are advisory.

use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    /// Transport failure, non-success HTTP status or a stalled transfer.
    #[error("network error: {0}")]
    Network(String),

    /// The release descriptor lacks the tag or the configured asset.
    #[error("not found: {0}")]
    NotFound(String),

    /// The release descriptor is not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// An archive entry would land outside the install directory.
    #[error("archive entry escapes the install directory: {0}")]
    PathTraversal(String),

    /// The archive itself is unreadable or corrupt.
    #[error("archive error: {0}")]
    Archive(String),

    /// Process enumeration, termination or launch failed.
    #[error("process error: {0}")]
    Process(String),
}

impl InstallError {
    /// Wraps an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("failed to {} {}", action, path.display()), source)
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Process exit code when the failing step is not known.
    ///
    /// `2` metadata, `4` extraction, `5` path traversal, `1` anything else.
    /// The orchestrator refines this per phase, see `InstallFailure`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Network(_) | Self::NotFound(_) | Self::Parse(_) => 2,
            Self::Io { .. } | Self::Archive(_) => 4,
            Self::PathTraversal(_) => 5,
            Self::Process(_) => 1,
        }
    }
}

impl From<reqwest::Error> for InstallError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<zip::result::ZipError> for InstallError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => Self::io("failed to read archive", source),
            other => Self::Archive(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(InstallError::Network("reset".into()).is_retryable());
        assert!(!InstallError::NotFound("asset".into()).is_retryable());
        assert!(!InstallError::PathTraversal("../x".into()).is_retryable());
        assert!(!InstallError::io("write", io::Error::other("disk full")).is_retryable());
    }

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(InstallError::Parse("eof".into()).exit_code(), 2);
        assert_eq!(InstallError::Archive("bad header".into()).exit_code(), 4);
        assert_eq!(InstallError::PathTraversal("../x".into()).exit_code(), 5);
    }

    #[test]
    fn io_error_keeps_context_in_message() {
        let err = InstallError::io_at("create", Path::new("/tmp/x"), io::Error::other("denied"));
        assert_eq!(err.to_string(), "failed to create /tmp/x: denied");
    }
}
