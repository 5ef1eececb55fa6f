//! Lifecycle events emitted during an acquisition.
//!
//! The notifier is a fire-and-forget sink consumed by UI layers; the
//! orchestrator never blocks on it or observes its outcome.

use std::path::PathBuf;

use tracing::{info, warn};

/// Lifecycle event for one acquisition.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquireEvent {
    /// Transfer is about to begin.
    Started {
        /// The source URL being fetched.
        url: String,
        /// The destination filename.
        file_name: String,
    },
    /// Coarse transfer progress, fraction in 0.0..=1.0.
    Progress { fraction: f64 },
    /// Shared storage was wanted but unavailable; files land in app storage.
    UsingPrivateStorage,
    /// The file was acquired and verified.
    Succeeded { path: PathBuf },
    /// The acquisition failed; `message` is short and non-technical.
    Failed { message: String },
    /// The user declined to overwrite an existing file. Not an error.
    Cancelled,
    /// The download succeeded but no compatible viewer could open it.
    HandOffUnavailable { path: PathBuf },
}

/// Fire-and-forget sink for [`AcquireEvent`]s.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &AcquireEvent);
}

/// Notifier that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &AcquireEvent) {}
}

/// Notifier that forwards events to the tracing subscriber.
///
/// Cancellation is deliberately logged at info, not as an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &AcquireEvent) {
        match event {
            AcquireEvent::Started { url, file_name } => {
                info!(%url, %file_name, "download started");
            }
            AcquireEvent::Progress { fraction } => {
                info!(percent = (fraction * 100.0).round(), "download progress");
            }
            AcquireEvent::UsingPrivateStorage => {
                info!("storage permission unavailable, saving to app storage");
            }
            AcquireEvent::Succeeded { path } => {
                info!(path = %path.display(), "download complete");
            }
            AcquireEvent::Failed { message } => {
                warn!(%message, "download failed");
            }
            AcquireEvent::Cancelled => {
                info!("download cancelled");
            }
            AcquireEvent::HandOffUnavailable { path } => {
                warn!(path = %path.display(), "file saved but no viewer app found");
            }
        }
    }
}
