//! Acquisition orchestrator: permission → storage → name → conflict →
//! transfer → integrity, with an optional hand-off to an external viewer.
//!
//! Each call walks the sequence exactly once; there is no retry loop and no
//! state shared between calls beyond the filesystem itself. Two concurrent
//! acquisitions targeting the same destination path race in the conflict
//! pre-check (TOCTOU) — an accepted limitation, documented in the
//! integration suite.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::guard::{self, ConflictPrompt};
use crate::handoff::FileOpener;
use crate::naming;
use crate::storage::StorageSelector;
use crate::transfer::TransferClient;

use super::error::AcquireError;
use super::events::{AcquireEvent, Notifier};
use super::request::{AcquisitionRequest, ResolvedDestination};

/// Terminal outcome of a `download` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired {
    /// The file was transferred and verified at this path.
    Saved(PathBuf),
    /// The user declined to overwrite an existing file. Nothing was written.
    Cancelled,
}

/// Terminal outcome of a `download_and_open` call.
#[derive(Debug)]
pub enum Opened {
    /// The file was acquired and an external viewer took it.
    Viewer(PathBuf),
    /// The file was acquired but no compatible viewer could open it. The
    /// file remains on disk; this is distinct from a download failure.
    SavedWithoutViewer {
        /// Where the file was saved.
        path: PathBuf,
        /// Why the hand-off failed.
        error: crate::handoff::HandOffError,
    },
    /// The user declined to overwrite an existing file.
    Cancelled,
}

/// Public entry point of the acquisition service.
///
/// Owns the transfer client and storage selector, and holds the injected
/// ports: overwrite confirmation, external viewer hand-off, and the
/// fire-and-forget lifecycle notifier.
#[derive(Clone)]
pub struct Acquirer {
    transfer: TransferClient,
    storage: StorageSelector,
    prompt: Arc<dyn ConflictPrompt>,
    opener: Arc<dyn FileOpener>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Acquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Acquirer")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl Acquirer {
    #[must_use]
    pub fn new(
        transfer: TransferClient,
        storage: StorageSelector,
        prompt: Arc<dyn ConflictPrompt>,
        opener: Arc<dyn FileOpener>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transfer,
            storage,
            prompt,
            opener,
            notifier,
        }
    }

    /// Acquires the requested document into local storage.
    ///
    /// Runs the full sequence: storage permission resolution, destination
    /// selection, filename derivation, overwrite-conflict gate, streaming
    /// transfer, and post-transfer integrity verification. Lifecycle events
    /// are emitted along the way.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] classified per failure; any partially
    /// written file is removed before the error returns. A declined
    /// overwrite is `Ok(Acquired::Cancelled)`, not an error.
    #[instrument(skip(self, request), fields(url = %request.source_url(), name = %request.display_name()))]
    pub async fn download(
        &self,
        request: &AcquisitionRequest,
    ) -> Result<Acquired, AcquireError> {
        match self.run(request).await {
            Ok(Acquired::Saved(path)) => {
                self.notifier
                    .notify(&AcquireEvent::Succeeded { path: path.clone() });
                Ok(Acquired::Saved(path))
            }
            Ok(Acquired::Cancelled) => {
                // Cancellation is silent from an error standpoint.
                info!("overwrite declined, download cancelled");
                self.notifier.notify(&AcquireEvent::Cancelled);
                Ok(Acquired::Cancelled)
            }
            Err(error) => {
                self.notifier.notify(&AcquireEvent::Failed {
                    message: error.user_message(),
                });
                Err(error)
            }
        }
    }

    /// Acquires the document into app-private storage and hands it to an
    /// external viewer.
    ///
    /// Private storage is forced regardless of the request's preference,
    /// and an explicit destination directory is ignored: private storage
    /// guarantees the viewer can be granted read access without further
    /// permission negotiation. A hand-off failure after a successful
    /// download is reported as [`Opened::SavedWithoutViewer`], never as a
    /// download error — the file is already safely on disk.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] only for failures of the download portion.
    #[instrument(skip(self, request), fields(url = %request.source_url()))]
    pub async fn download_and_open(
        &self,
        request: &AcquisitionRequest,
    ) -> Result<Opened, AcquireError> {
        let forced = request.forcing_private_storage();
        let path = match self.download(&forced).await? {
            Acquired::Saved(path) => path,
            Acquired::Cancelled => return Ok(Opened::Cancelled),
        };

        let mime = naming::mime_for_path(&path);
        match self.opener.open_file(&path, mime).await {
            Ok(()) => {
                info!(path = %path.display(), mime, "handed off to viewer");
                Ok(Opened::Viewer(path))
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "hand-off failed, file kept");
                self.notifier
                    .notify(&AcquireEvent::HandOffUnavailable { path: path.clone() });
                Ok(Opened::SavedWithoutViewer { path, error })
            }
        }
    }

    /// The sequence proper. Event emission for terminal states lives in
    /// [`download`](Self::download) so every exit path notifies exactly once.
    async fn run(&self, request: &AcquisitionRequest) -> Result<Acquired, AcquireError> {
        let destination = self.resolve_destination(request).await?;

        // Conflict gate: the transfer never sees a path with a pre-existing
        // file unless the prompt explicitly confirmed replacement.
        if guard::existing_file(&destination.full_path).await {
            debug!(path = %destination.full_path.display(), "destination exists, prompting");
            if !self.prompt.confirm_overwrite(&destination.full_path).await {
                return Ok(Acquired::Cancelled);
            }
        }

        self.notifier.notify(&AcquireEvent::Started {
            url: request.source_url().to_string(),
            file_name: destination.file_name.clone(),
        });

        let notifier = Arc::clone(&self.notifier);
        let outcome = self
            .transfer
            .transfer(request.source_url(), &destination.full_path, move |fraction| {
                notifier.notify(&AcquireEvent::Progress { fraction });
            })
            .await?;

        let bytes_verified = guard::verify_complete(&outcome.path).await?;
        debug!(
            path = %outcome.path.display(),
            bytes = bytes_verified,
            private = destination.used_private_storage,
            "acquisition verified"
        );

        Ok(Acquired::Saved(outcome.path))
    }

    /// Resolves directory and filename for one request.
    async fn resolve_destination(
        &self,
        request: &AcquisitionRequest,
    ) -> Result<ResolvedDestination, AcquireError> {
        let resolved = self
            .storage
            .resolve_destination_dir(request.prefers_private_storage(), request.explicit_dir())
            .await?;
        if resolved.degraded {
            self.notifier.notify(&AcquireEvent::UsingPrivateStorage);
        }

        let file_name = naming::build_file_name(request.display_name(), request.source_url());
        let full_path = resolved.path.join(&file_name);
        Ok(ResolvedDestination {
            directory: resolved.path,
            file_name,
            full_path,
            used_private_storage: resolved.used_private,
        })
    }
}
