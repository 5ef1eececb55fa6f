//! Runtime storage-permission resolution across platforms and OS versions.
//!
//! Only one platform in the product has a runtime permission model, and the
//! set of capabilities it requires for shared-storage writes changes with the
//! OS version. That banding is captured in a single ordered table rather than
//! nested conditionals, so adding a future version band is a one-line change.
//!
//! The actual OS permission dialog lives behind the [`PermissionBackend`]
//! port; requesting a capability may suspend until the user answers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

/// An OS-granted permission class relevant to shared-storage writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ReadMediaImages,
    ReadMediaVideo,
    ReadMediaAudio,
    WriteExternalStorage,
    ReadExternalStorage,
}

/// Aggregate permission outcome for a storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Every required capability is granted.
    Granted,
    /// At least one required capability is denied.
    Denied,
    /// The platform has no runtime permission model for this storage class.
    NotApplicable,
}

impl PermissionState {
    /// Whether shared storage may be written under this state.
    #[must_use]
    pub fn allows_shared_storage(self) -> bool {
        matches!(self, Self::Granted | Self::NotApplicable)
    }
}

/// Host platform as seen by the permission resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Android with its runtime permission model, banded by API level.
    Android { api_level: u32 },
    /// Any platform without runtime storage permissions (iOS, desktop).
    Other,
}

/// Host OS permission API. Both operations are asynchronous because
/// `request` may display a native dialog and wait for user input.
#[async_trait]
pub trait PermissionBackend: Send + Sync {
    /// Returns whether the capability is currently granted, without prompting.
    async fn check(&self, capability: Capability) -> bool;

    /// Prompts the user for the capability and returns the resulting grant.
    async fn request(&self, capability: Capability) -> bool;
}

/// Backend for hosts where every storage capability is implicitly granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysGranted;

#[async_trait]
impl PermissionBackend for AlwaysGranted {
    async fn check(&self, _capability: Capability) -> bool {
        true
    }

    async fn request(&self, _capability: Capability) -> bool {
        true
    }
}

/// One row of the version-band table: applies to `api_level >= min_api`.
struct Band {
    min_api: u32,
    required: &'static [Capability],
}

/// Ordered newest-first; the first matching band wins.
const BANDS: &[Band] = &[
    // API 33+: granular media capabilities, all required.
    Band {
        min_api: 33,
        required: &[
            Capability::ReadMediaImages,
            Capability::ReadMediaVideo,
            Capability::ReadMediaAudio,
        ],
    },
    // API 29-32: write alone suffices.
    Band {
        min_api: 29,
        required: &[Capability::WriteExternalStorage],
    },
    // API 28 and below: both read and write.
    Band {
        min_api: 0,
        required: &[
            Capability::WriteExternalStorage,
            Capability::ReadExternalStorage,
        ],
    },
];

/// Capabilities required for shared-storage writes at the given API level.
#[must_use]
pub fn required_capabilities(api_level: u32) -> &'static [Capability] {
    BANDS
        .iter()
        .find(|band| api_level >= band.min_api)
        .map_or(&[], |band| band.required)
}

/// Resolves the aggregate shared-storage permission state for a platform.
///
/// State is re-evaluated on every call — never cached — so a user changing OS
/// settings mid-session is picked up by the next acquisition.
#[derive(Clone)]
pub struct PermissionResolver {
    platform: Platform,
    backend: Arc<dyn PermissionBackend>,
}

impl std::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl PermissionResolver {
    #[must_use]
    pub fn new(platform: Platform, backend: Arc<dyn PermissionBackend>) -> Self {
        Self { platform, backend }
    }

    /// Resolver for hosts with no runtime permission model.
    #[must_use]
    pub fn without_runtime_permissions() -> Self {
        Self::new(Platform::Other, Arc::new(AlwaysGranted))
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Checks whether shared storage may currently be written, never prompting.
    pub async fn check_shared_storage(&self) -> PermissionState {
        let Platform::Android { api_level } = self.platform else {
            return PermissionState::NotApplicable;
        };

        for capability in required_capabilities(api_level) {
            if !self.backend.check(*capability).await {
                debug!(?capability, api_level, "shared storage capability missing");
                return PermissionState::Denied;
            }
        }
        PermissionState::Granted
    }

    /// Requests shared-storage access, prompting the user only when a check
    /// does not already report granted. Never prompts twice for an
    /// already-granted capability set within one call chain.
    pub async fn request_shared_storage(&self) -> PermissionState {
        match self.check_shared_storage().await {
            PermissionState::Denied => {}
            state => return state,
        }

        let Platform::Android { api_level } = self.platform else {
            return PermissionState::NotApplicable;
        };

        // Every missing capability is requested even when an earlier one is
        // declined, matching the host's multi-permission dialog behavior.
        let mut all_granted = true;
        for capability in required_capabilities(api_level) {
            if !self.backend.request(*capability).await {
                debug!(?capability, api_level, "capability request denied");
                all_granted = false;
            }
        }

        if all_granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend granting a fixed capability set; counts request prompts.
    struct FixedBackend {
        granted: Mutex<HashSet<Capability>>,
        prompts: AtomicUsize,
        grant_on_request: bool,
    }

    impl FixedBackend {
        fn new(granted: &[Capability], grant_on_request: bool) -> Self {
            Self {
                granted: Mutex::new(granted.iter().copied().collect()),
                prompts: AtomicUsize::new(0),
                grant_on_request,
            }
        }

        fn prompt_count(&self) -> usize {
            self.prompts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PermissionBackend for FixedBackend {
        async fn check(&self, capability: Capability) -> bool {
            self.granted.lock().unwrap().contains(&capability)
        }

        async fn request(&self, capability: Capability) -> bool {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            if self.grant_on_request {
                self.granted.lock().unwrap().insert(capability);
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn test_band_table_newest_band() {
        assert_eq!(
            required_capabilities(34),
            &[
                Capability::ReadMediaImages,
                Capability::ReadMediaVideo,
                Capability::ReadMediaAudio,
            ]
        );
        assert_eq!(required_capabilities(33).len(), 3);
    }

    #[test]
    fn test_band_table_middle_band() {
        assert_eq!(
            required_capabilities(29),
            &[Capability::WriteExternalStorage]
        );
        assert_eq!(
            required_capabilities(32),
            &[Capability::WriteExternalStorage]
        );
    }

    #[test]
    fn test_band_table_oldest_band() {
        assert_eq!(
            required_capabilities(28),
            &[
                Capability::WriteExternalStorage,
                Capability::ReadExternalStorage,
            ]
        );
        assert_eq!(required_capabilities(0).len(), 2);
    }

    #[tokio::test]
    async fn test_other_platform_is_not_applicable_and_never_prompts() {
        let backend = Arc::new(FixedBackend::new(&[], false));
        let resolver = PermissionResolver::new(Platform::Other, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.check_shared_storage().await,
            PermissionState::NotApplicable
        );
        assert_eq!(
            resolver.request_shared_storage().await,
            PermissionState::NotApplicable
        );
        assert_eq!(backend.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_newest_band_requires_all_media_capabilities() {
        // Two of three media capabilities granted -> aggregate Denied.
        let backend = Arc::new(FixedBackend::new(
            &[Capability::ReadMediaImages, Capability::ReadMediaVideo],
            false,
        ));
        let resolver =
            PermissionResolver::new(Platform::Android { api_level: 33 }, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.check_shared_storage().await,
            PermissionState::Denied
        );
    }

    #[tokio::test]
    async fn test_request_short_circuits_when_already_granted() {
        let backend = Arc::new(FixedBackend::new(&[Capability::WriteExternalStorage], true));
        let resolver =
            PermissionResolver::new(Platform::Android { api_level: 30 }, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.request_shared_storage().await,
            PermissionState::Granted
        );
        assert_eq!(
            backend.prompt_count(),
            0,
            "already-granted capability must not prompt"
        );
    }

    #[tokio::test]
    async fn test_request_prompts_and_grants_when_missing() {
        let backend = Arc::new(FixedBackend::new(&[], true));
        let resolver =
            PermissionResolver::new(Platform::Android { api_level: 28 }, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.request_shared_storage().await,
            PermissionState::Granted
        );
        // Oldest band: both read and write prompted.
        assert_eq!(backend.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_request_denied_stays_denied() {
        let backend = Arc::new(FixedBackend::new(&[], false));
        let resolver =
            PermissionResolver::new(Platform::Android { api_level: 33 }, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.request_shared_storage().await,
            PermissionState::Denied
        );
        // All three media capabilities are still prompted, not just the first.
        assert_eq!(backend.prompt_count(), 3);
    }

    #[tokio::test]
    async fn test_state_reevaluated_per_call() {
        let backend = Arc::new(FixedBackend::new(&[], true));
        let resolver =
            PermissionResolver::new(Platform::Android { api_level: 30 }, Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        assert_eq!(
            resolver.check_shared_storage().await,
            PermissionState::Denied
        );
        // A request grants the capability; a later check observes the change.
        resolver.request_shared_storage().await;
        assert_eq!(
            resolver.check_shared_storage().await,
            PermissionState::Granted
        );
    }

    #[test]
    fn test_allows_shared_storage() {
        assert!(PermissionState::Granted.allows_shared_storage());
        assert!(PermissionState::NotApplicable.allows_shared_storage());
        assert!(!PermissionState::Denied.allows_shared_storage());
    }
}
