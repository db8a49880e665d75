//! Error types for recents-core operations.
//!
//! Nothing in this subsystem is fatal to the host: every failure degrades to
//! serving the best available data (stale entries, an empty list, or a status
//! indicator). The [`Error`] type exists so the boundary between the cache and
//! its collaborators stays explicit; callers decide how far an error travels.

use thiserror::Error;

/// The main error type for recents-core operations.
///
/// Errors preserve their source chain where one exists and carry enough
/// context to distinguish "the index is not there" from "the index rejected
/// the query", which surface differently to the user.
#[derive(Error, Debug)]
pub enum Error {
    /// The external index is absent or disabled.
    ///
    /// Reported as an "unavailable" status to the presentation layer rather
    /// than as a failure; the cached entries are left untouched.
    #[error("external index unavailable")]
    IndexUnavailable,

    /// The external index is present but the query itself errored.
    ///
    /// Logged and swallowed at the controller boundary; the last known
    /// entries are retained.
    #[error("index query failed: {0}")]
    QueryFailed(String),

    /// I/O operation failed.
    ///
    /// Covers settings-file reads and writes. The underlying
    /// `std::io::Error` is preserved for detailed inspection.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or inaccessible.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    ///
    /// Covers malformed TOML in the persisted settings record.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might clear up on a later attempt.
    ///
    /// Index availability and query failures are transient from this crate's
    /// perspective: the index may finish initializing, or the next
    /// invalidation may arrive after the index has recovered. Configuration
    /// and serialization problems require user action.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::IndexUnavailable | Self::QueryFailed(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            Self::Config(_) | Self::Serialization(_) => false,
        }
    }

    /// Get the error category as a static string for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::IndexUnavailable => "index_unavailable",
            Self::QueryFailed(_) => "query",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_formatting() {
        assert_eq!(
            Error::IndexUnavailable.to_string(),
            "external index unavailable"
        );
        assert!(
            Error::QueryFailed("boom".to_string())
                .to_string()
                .contains("boom")
        );
        assert!(
            Error::Config("missing field".to_string())
                .to_string()
                .contains("missing field")
        );
    }

    #[test]
    fn categories() {
        assert_eq!(Error::IndexUnavailable.category(), "index_unavailable");
        assert_eq!(Error::QueryFailed(String::new()).category(), "query");
        assert_eq!(Error::Io(io::Error::other("x")).category(), "io");
        assert_eq!(Error::Config(String::new()).category(), "config");
        assert_eq!(
            Error::Serialization(String::new()).category(),
            "serialization"
        );
    }

    #[test]
    fn recoverability() {
        assert!(Error::IndexUnavailable.is_recoverable());
        assert!(Error::QueryFailed("transient".to_string()).is_recoverable());
        assert!(
            Error::Io(io::Error::new(io::ErrorKind::TimedOut, "timeout")).is_recoverable()
        );
        assert!(
            !Error::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied")).is_recoverable()
        );
        assert!(!Error::Config("bad".to_string()).is_recoverable());
        assert!(!Error::Serialization("bad".to_string()).is_recoverable());
    }

    #[test]
    fn io_source_chain_preserved() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        let source = std::error::Error::source(&error);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("access denied"));
    }

    #[test]
    fn toml_errors_map_to_serialization() {
        let parse_err = toml::from_str::<toml::Value>("not [ valid").unwrap_err();
        let error: Error = parse_err.into();
        assert_eq!(error.category(), "serialization");
    }
}
