//! Destination directory selection with graceful permission degradation.
//!
//! Shared-storage permission denial is never fatal: the selector falls back
//! to the app-private downloads directory and reports the degradation so the
//! caller can surface an informational notice. The returned directory always
//! exists on disk before this module returns it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::permission::PermissionResolver;

/// Subdirectory of the platform data dir used for private downloads.
const PRIVATE_SUBDIR: &str = "bookfetch/downloads";

/// Errors raised while preparing a destination directory.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The directory could not be created or accessed.
    #[error("failed to prepare directory {path}: {source}")]
    Prepare {
        /// The directory that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No private storage root could be determined for this host.
    #[error("no private storage directory available on this platform")]
    NoPrivateRoot,
}

/// A chosen destination directory, with how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDir {
    /// The directory, guaranteed to exist.
    pub path: PathBuf,
    /// Whether app-private storage was used.
    pub used_private: bool,
    /// True when shared storage was wanted but permission was denied (or no
    /// shared directory exists), so the selection degraded to private.
    pub degraded: bool,
}

/// Chooses a concrete destination directory per request.
#[derive(Debug, Clone)]
pub struct StorageSelector {
    resolver: PermissionResolver,
    private_root: Option<PathBuf>,
    shared_root: Option<PathBuf>,
}

impl StorageSelector {
    /// Selector backed by the platform's data dir and Downloads dir.
    #[must_use]
    pub fn new(resolver: PermissionResolver) -> Self {
        let private_root = dirs::data_dir().map(|dir| dir.join(PRIVATE_SUBDIR));
        let shared_root = dirs::download_dir();
        Self {
            resolver,
            private_root,
            shared_root,
        }
    }

    /// Selector with explicit storage roots. Used in tests and by embedders
    /// that manage their own directory layout.
    #[must_use]
    pub fn with_roots(
        resolver: PermissionResolver,
        private_root: PathBuf,
        shared_root: Option<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            private_root: Some(private_root),
            shared_root,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Resolves the destination directory for one acquisition.
    ///
    /// - An explicit directory is used verbatim (the caller asserts it is
    ///   writable); it is still created when absent.
    /// - `prefer_private` short-circuits straight to private storage, with no
    ///   permission prompt.
    /// - Otherwise shared storage is requested; denial degrades to private
    ///   storage rather than erroring.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only for filesystem failures or a host with
    /// no usable private root — never for a denied permission.
    #[instrument(skip(self))]
    pub async fn resolve_destination_dir(
        &self,
        prefer_private: bool,
        explicit_dir: Option<&Path>,
    ) -> Result<ResolvedDir, StorageError> {
        if let Some(dir) = explicit_dir {
            ensure_dir(dir).await?;
            return Ok(ResolvedDir {
                path: dir.to_path_buf(),
                used_private: false,
                degraded: false,
            });
        }

        if prefer_private {
            return self.private_dir(false).await;
        }

        // Permission state is requested fresh on every call; the user may
        // have changed OS settings since the last acquisition.
        let state = self.resolver.request_shared_storage().await;
        if state.allows_shared_storage() {
            if let Some(shared) = &self.shared_root {
                ensure_dir(shared).await?;
                return Ok(ResolvedDir {
                    path: shared.clone(),
                    used_private: false,
                    degraded: false,
                });
            }
            debug!("no shared downloads directory on this host, using private storage");
            return self.private_dir(true).await;
        }

        debug!("shared storage permission denied, using private storage");
        self.private_dir(true).await
    }

    async fn private_dir(&self, degraded: bool) -> Result<ResolvedDir, StorageError> {
        let root = self
            .private_root
            .as_ref()
            .ok_or(StorageError::NoPrivateRoot)?;
        ensure_dir(root).await?;
        Ok(ResolvedDir {
            path: root.clone(),
            used_private: true,
            degraded,
        })
    }
}

async fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| StorageError::Prepare {
            path: path.to_path_buf(),
            source,
        })
}
