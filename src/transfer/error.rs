//! Error types for the transfer module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while transferring a remote document to disk.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The URL does not start with `http://` or `https://`. Raised before
    /// any network I/O is attempted.
    #[error("unsupported URL scheme: {url}")]
    UnsupportedScheme {
        /// The offending URL.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, broken
    /// stream).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server responded with a status other than 200 or 206.
    #[error("HTTP {status} downloading {url}")]
    BadStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Filesystem error while writing the destination file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Creates an unsupported-scheme error.
    pub fn unsupported_scheme(url: impl Into<String>) -> Self {
        Self::UnsupportedScheme { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a bad-status error.
    pub fn bad_status(url: impl Into<String>, status: u16) -> Self {
        Self::BadStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>` impls on purpose: the
// variants need context (url, path) the source errors do not carry, so the
// helper constructors are the conversion surface.
