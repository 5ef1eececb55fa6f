//! Hand-off port: open an acquired file with an external viewer.
//!
//! The OS share/open surface is injected behind [`FileOpener`] so the
//! orchestrator can be tested without a desktop session, and so a missing
//! viewer app is reported as its own failure class rather than a download
//! failure.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// The external viewer invocation failed; the downloaded file is intact.
#[derive(Debug, Error)]
#[error("no viewer available for {mime} file {path}: {reason}")]
pub struct HandOffError {
    /// The file that could not be opened.
    pub path: PathBuf,
    /// The MIME type that was offered to the OS.
    pub mime: String,
    /// Host-specific failure detail.
    pub reason: String,
}

/// Invokes the OS-native open/share mechanism for a local file.
#[async_trait]
pub trait FileOpener: Send + Sync {
    /// Opens `path` with a viewer for `mime`.
    ///
    /// # Errors
    ///
    /// Returns [`HandOffError`] when no compatible viewer handles the file.
    async fn open_file(&self, path: &Path, mime: &str) -> Result<(), HandOffError>;
}

/// Opener shelling out to the platform's default open command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command() -> &'static str {
        if cfg!(target_os = "macos") {
            "open"
        } else if cfg!(windows) {
            "explorer"
        } else {
            "xdg-open"
        }
    }
}

#[async_trait]
impl FileOpener for SystemOpener {
    async fn open_file(&self, path: &Path, mime: &str) -> Result<(), HandOffError> {
        let program = Self::command();
        debug!(%program, path = %path.display(), mime, "handing off to system opener");

        let status = tokio::process::Command::new(program)
            .arg(path)
            .status()
            .await
            .map_err(|error| HandOffError {
                path: path.to_path_buf(),
                mime: mime.to_string(),
                reason: error.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(HandOffError {
                path: path.to_path_buf(),
                mime: mime.to_string(),
                reason: format!("opener exited with {status}"),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_off_error_display_names_mime_and_path() {
        let error = HandOffError {
            path: PathBuf::from("/tmp/Dune.epub"),
            mime: "application/epub+zip".to_string(),
            reason: "no handler registered".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("application/epub+zip"), "got: {msg}");
        assert!(msg.contains("/tmp/Dune.epub"), "got: {msg}");
        assert!(msg.contains("no handler registered"), "got: {msg}");
    }

    #[test]
    fn test_system_opener_command_is_platform_specific() {
        let command = SystemOpener::command();
        assert!(["open", "explorer", "xdg-open"].contains(&command));
    }
}
