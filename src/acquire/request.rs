//! Acquisition request and resolved-destination value types.

use std::path::{Path, PathBuf};

use super::error::AcquireError;

/// An immutable request to acquire one remote document.
///
/// Constructed per call and validated up front: a malformed URL or empty
/// display name fails fast before any I/O.
#[derive(Debug, Clone)]
pub struct AcquisitionRequest {
    source_url: String,
    display_name: String,
    explicit_dir: Option<PathBuf>,
    prefer_private_storage: bool,
}

impl AcquisitionRequest {
    /// Creates a validated request.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::InvalidInput`] when the URL is empty or not
    /// http/https, or when the display name is empty after trimming.
    pub fn new(
        source_url: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, AcquireError> {
        let source_url = source_url.into();
        let display_name = display_name.into();

        if !source_url.starts_with("http://") && !source_url.starts_with("https://") {
            return Err(AcquireError::invalid_input(format!(
                "source URL must be http or https: {source_url:?}"
            )));
        }
        if display_name.trim().is_empty() {
            return Err(AcquireError::invalid_input("display name must not be empty"));
        }

        Ok(Self {
            source_url,
            display_name,
            explicit_dir: None,
            prefer_private_storage: false,
        })
    }

    /// Requests an explicit destination directory, used verbatim.
    #[must_use]
    pub fn with_destination_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.explicit_dir = Some(dir.into());
        self
    }

    /// Requests app-private storage regardless of permission state.
    #[must_use]
    pub fn prefer_private_storage(mut self, prefer: bool) -> Self {
        self.prefer_private_storage = prefer;
        self
    }

    /// Copy of this request with private storage forced on and any explicit
    /// directory cleared. Used by the open-after-download path, where private
    /// storage guarantees the viewer can read the file without further
    /// permission negotiation; an explicit directory would route around that.
    #[must_use]
    pub(crate) fn forcing_private_storage(&self) -> Self {
        let mut forced = self.clone();
        forced.prefer_private_storage = true;
        forced.explicit_dir = None;
        forced
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn explicit_dir(&self) -> Option<&Path> {
        self.explicit_dir.as_deref()
    }

    #[must_use]
    pub fn prefers_private_storage(&self) -> bool {
        self.prefer_private_storage
    }
}

/// The concrete destination derived for one request, discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Directory the file lands in; exists on disk.
    pub directory: PathBuf,
    /// Derived filename including extension.
    pub file_name: String,
    /// `directory` joined with `file_name`.
    pub full_path: PathBuf,
    /// Whether app-private storage was selected.
    pub used_private_storage: bool,
}
