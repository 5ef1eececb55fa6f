//! Pre-transfer conflict detection and post-transfer integrity verification.
//!
//! The conflict check and the transfer are not atomic: a file created at the
//! destination between the check and the write is silently overwritten. This
//! TOCTOU window is an accepted limitation, documented by the integration
//! suite rather than papered over with per-path locking.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by post-transfer verification.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The transfer reported success but no file exists at the destination.
    #[error("downloaded file missing at {path}")]
    Missing {
        /// The expected destination path.
        path: PathBuf,
    },

    /// The downloaded file is zero bytes; it has been deleted.
    #[error("downloaded file at {path} is empty")]
    Empty {
        /// The deleted destination path.
        path: PathBuf,
    },

    /// Filesystem error while verifying; any file at the path is deleted.
    #[error("failed to verify {path}: {source}")]
    Io {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Decides whether an existing file at the destination may be replaced.
///
/// Implementations typically ask the user; the answer may take arbitrarily
/// long. Declining is a cancellation, not an error.
#[async_trait]
pub trait ConflictPrompt: Send + Sync {
    async fn confirm_overwrite(&self, path: &Path) -> bool;
}

/// Prompt that always confirms replacement. Non-interactive callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConflictPrompt for AlwaysConfirm {
    async fn confirm_overwrite(&self, _path: &Path) -> bool {
        true
    }
}

/// Prompt that always declines replacement, turning conflicts into
/// cancellations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverConfirm;

#[async_trait]
impl ConflictPrompt for NeverConfirm {
    async fn confirm_overwrite(&self, _path: &Path) -> bool {
        false
    }
}

/// Returns whether a file already exists at the destination.
///
/// A failed existence check is logged and treated as no conflict; the
/// transfer's own file creation will surface the underlying problem.
pub async fn existing_file(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => exists,
        Err(error) => {
            warn!(path = %path.display(), %error, "could not check for an existing file");
            false
        }
    }
}

/// Verifies a completed transfer left a non-empty file, returning its size.
///
/// On any failure the file at `path` is deleted (best effort) before the
/// error propagates — no corrupt partial output survives.
///
/// # Errors
///
/// [`GuardError::Missing`] when no file exists, [`GuardError::Empty`] when it
/// is zero bytes, [`GuardError::Io`] for stat failures.
pub async fn verify_complete(path: &Path) -> Result<u64, GuardError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "transfer reported success but file is missing");
            return Err(GuardError::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            remove_quietly(path).await;
            return Err(GuardError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if metadata.len() == 0 {
        warn!(path = %path.display(), "deleting zero-byte download");
        remove_quietly(path).await;
        return Err(GuardError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), bytes = metadata.len(), "integrity check passed");
    Ok(metadata.len())
}

async fn remove_quietly(path: &Path) {
    if let Err(error) = tokio::fs::remove_file(path).await {
        if error.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), %error, "failed to remove corrupt download");
        }
    }
}

/// Summary of an acquired file on disk.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    /// Filename component of the path.
    pub name: String,
    /// Full path on disk.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, when the filesystem reports one.
    #[serde(skip)]
    pub modified: Option<SystemTime>,
}

/// Stats an acquired file.
///
/// # Errors
///
/// Returns the underlying IO error when the file cannot be statted.
pub async fn file_info(path: &Path) -> Result<FileInfo, std::io::Error> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(FileInfo {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        size: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_existing_file_detects_presence() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("book.pdf");

        assert!(!existing_file(&path).await);
        std::fs::write(&path, b"data").unwrap();
        assert!(existing_file(&path).await);
    }

    #[tokio::test]
    async fn test_existing_file_false_when_check_errors() {
        let temp = TempDir::new().unwrap();
        // A regular file as a path component makes the stat fail outright
        // rather than report not-found.
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        assert!(!existing_file(&blocker.join("book.pdf")).await);
    }

    #[tokio::test]
    async fn test_verify_complete_returns_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("book.pdf");
        std::fs::write(&path, b"some pdf bytes").unwrap();

        let size = verify_complete(&path).await.unwrap();
        assert_eq!(size, 14);
        assert!(path.exists(), "healthy file must not be deleted");
    }

    #[tokio::test]
    async fn test_verify_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.pdf");

        let result = verify_complete(&path).await;
        assert!(matches!(result, Err(GuardError::Missing { .. })));
    }

    #[tokio::test]
    async fn test_verify_empty_file_deleted_before_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        let result = verify_complete(&path).await;
        assert!(matches!(result, Err(GuardError::Empty { .. })));
        assert!(!path.exists(), "zero-byte file must be deleted");
    }

    #[tokio::test]
    async fn test_prompt_defaults() {
        let path = PathBuf::from("/tmp/x.pdf");
        assert!(AlwaysConfirm.confirm_overwrite(&path).await);
        assert!(!NeverConfirm.confirm_overwrite(&path).await);
    }

    #[tokio::test]
    async fn test_file_info_reports_name_and_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Dune.pdf");
        std::fs::write(&path, b"0123456789").unwrap();

        let info = file_info(&path).await.unwrap();
        assert_eq!(info.name, "Dune.pdf");
        assert_eq!(info.size, 10);
        assert_eq!(info.path, path);
        assert!(info.modified.is_some());
    }

    #[tokio::test]
    async fn test_file_info_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let result = file_info(&temp.path().join("absent.pdf")).await;
        assert!(result.is_err());
    }
}
