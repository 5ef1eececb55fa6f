//! Error taxonomy for the acquisition orchestrator.
//!
//! Transport and filesystem failures from the lower modules are classified
//! into this taxonomy at the orchestrator boundary; no raw reqwest or io
//! errors escape unwrapped. A denied storage permission is never an error
//! here — the storage selector degrades to private storage instead. User
//! cancellation is an outcome, not an error variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::guard::GuardError;
use crate::storage::StorageError;
use crate::transfer::TransferError;

/// Errors that can end an acquisition.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Malformed URL or empty display name; no I/O was attempted.
    #[error("invalid request: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} downloading {url}")]
    BadStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level failure reaching the server.
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The transfer timed out.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Filesystem failure while preparing directories or writing the file.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Post-transfer verification failed; the corrupt file was deleted.
    #[error("download produced an empty or missing file at {path}")]
    EmptyOrMissingFile {
        /// The destination that failed verification.
        path: PathBuf,
    },

    /// No private storage directory exists on this host.
    #[error("no private storage directory available")]
    NoPrivateStorage,
}

impl AcquireError {
    /// Creates an invalid-input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Short, non-technical message suitable for a user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { .. } => "The download link or title is not valid.".to_string(),
            Self::BadStatus { status, .. } => {
                format!("The server could not provide the file (HTTP {status}).")
            }
            Self::Network { .. } => "A network problem interrupted the download.".to_string(),
            Self::Timeout { .. } => "The download timed out.".to_string(),
            Self::Io { .. } | Self::NoPrivateStorage => {
                "The file could not be saved to this device.".to_string()
            }
            Self::EmptyOrMissingFile { .. } => {
                "The downloaded file was incomplete and has been removed.".to_string()
            }
        }
    }
}

impl From<TransferError> for AcquireError {
    fn from(error: TransferError) -> Self {
        match error {
            TransferError::UnsupportedScheme { url } => Self::InvalidInput {
                reason: format!("unsupported URL scheme: {url}"),
            },
            TransferError::Network { url, source } => Self::Network { url, source },
            TransferError::Timeout { url } => Self::Timeout { url },
            TransferError::BadStatus { url, status } => Self::BadStatus { url, status },
            TransferError::Io { path, source } => Self::Io { path, source },
        }
    }
}

impl From<GuardError> for AcquireError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Missing { path } | GuardError::Empty { path } => {
                Self::EmptyOrMissingFile { path }
            }
            GuardError::Io { path, source } => Self::Io { path, source },
        }
    }
}

impl From<StorageError> for AcquireError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::Prepare { path, source } => Self::Io { path, source },
            StorageError::NoPrivateRoot => Self::NoPrivateStorage,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_display() {
        let error = AcquireError::BadStatus {
            url: "https://example.com/b.pdf".to_string(),
            status: 404,
        };
        let msg = error.to_string();
        assert!(msg.contains("404"), "got: {msg}");
        assert!(msg.contains("https://example.com/b.pdf"), "got: {msg}");
    }

    #[test]
    fn test_transfer_errors_classify_into_taxonomy() {
        let classified: AcquireError =
            TransferError::bad_status("https://x/f.pdf", 503).into();
        assert!(matches!(
            classified,
            AcquireError::BadStatus { status: 503, .. }
        ));

        let classified: AcquireError =
            TransferError::unsupported_scheme("ftp://x/f.pdf").into();
        assert!(matches!(classified, AcquireError::InvalidInput { .. }));

        let classified: AcquireError = TransferError::timeout("https://x/f.pdf").into();
        assert!(matches!(classified, AcquireError::Timeout { .. }));
    }

    #[test]
    fn test_guard_errors_classify_as_empty_or_missing() {
        let classified: AcquireError = GuardError::Missing {
            path: "/tmp/a.pdf".into(),
        }
        .into();
        assert!(matches!(classified, AcquireError::EmptyOrMissingFile { .. }));

        let classified: AcquireError = GuardError::Empty {
            path: "/tmp/a.pdf".into(),
        }
        .into();
        assert!(matches!(classified, AcquireError::EmptyOrMissingFile { .. }));
    }

    #[test]
    fn test_user_messages_are_non_technical() {
        let errors = [
            AcquireError::invalid_input("bad url"),
            AcquireError::BadStatus {
                url: "https://x/f.pdf".to_string(),
                status: 404,
            },
            AcquireError::Timeout {
                url: "https://x/f.pdf".to_string(),
            },
            AcquireError::EmptyOrMissingFile {
                path: "/tmp/f.pdf".into(),
            },
        ];
        for error in errors {
            let msg = error.user_message();
            assert!(!msg.is_empty());
            assert!(
                !msg.contains("reqwest") && !msg.contains("tokio"),
                "user message must not leak internals: {msg}"
            );
        }
    }
}
