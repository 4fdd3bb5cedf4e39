// src/error.rs

//! Error types for recipe evaluation and cooking

use std::fmt;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a recipe run
///
/// Nothing is retried locally; every error propagates to the caller and
/// the run stops at the first one.
#[derive(Error, Debug)]
pub enum Error {
    /// Option/setting combination rejected before any build work
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No source entry for the requested version, or a bad source entry
    #[error("Source fetch failed: {0}")]
    SourceFetchFailed(String),

    /// Archive could not be downloaded or read
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Downloaded archive does not match its recorded checksum
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// External build tool could not be located
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// External build tool exited unsuccessfully
    #[error("Build failed: {0}")]
    BuildFailed(String),

    /// An expected artifact was absent when packaging
    #[error("Packaging failed: {0}")]
    PackagingFailed(String),

    /// Malformed sources data, profile, config or key=value argument
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Retrieval,
    Build,
    Packaging,
    Other,
}

impl Error {
    /// Classify the error by the pipeline stage that produces it
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(_) => ErrorKind::Configuration,
            Self::SourceFetchFailed(_) | Self::DownloadError(_) | Self::ChecksumMismatch { .. } => {
                ErrorKind::Retrieval
            }
            Self::ToolNotFound(_) | Self::BuildFailed(_) => ErrorKind::Build,
            Self::PackagingFailed(_) => ErrorKind::Packaging,
            Self::ParseError(_) | Self::IoError(_) | Self::Io(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "configuration",
            Self::Retrieval => "retrieval",
            Self::Build => "build",
            Self::Packaging => "packaging",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::InvalidConfiguration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::ChecksumMismatch {
                expected: "a".into(),
                actual: "b".into()
            }
            .kind(),
            ErrorKind::Retrieval
        );
        assert_eq!(Error::BuildFailed("x".into()).kind(), ErrorKind::Build);
        assert_eq!(Error::PackagingFailed("x".into()).kind(), ErrorKind::Packaging);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfiguration("fPIC is always enabled".into());
        assert_eq!(err.to_string(), "Invalid configuration: fPIC is always enabled");
    }
}
