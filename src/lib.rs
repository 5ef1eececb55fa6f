//! Bookfetch Core Library
//!
//! This library is the file acquisition service of a book catalog client:
//! it turns a remote document URL into a verified, user-accessible local
//! file, and can optionally hand the result to an external viewer.
//!
//! # Architecture
//!
//! - [`permission`] - platform/version-banded storage permission resolution
//! - [`storage`] - destination directory selection with graceful fallback
//! - [`naming`] - safe filename derivation and MIME inference
//! - [`guard`] - overwrite-conflict gate and post-transfer integrity check
//! - [`transfer`] - streaming HTTP transfer with coarse progress
//! - [`handoff`] - external viewer port (OS open/share)
//! - [`acquire`] - the orchestrator composing the above

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod acquire;
pub mod guard;
pub mod handoff;
pub mod naming;
pub mod permission;
pub mod storage;
pub mod transfer;

// Re-export commonly used types
pub use acquire::{
    AcquireError, AcquireEvent, AcquisitionRequest, Acquired, Acquirer, Notifier, NullNotifier,
    Opened, ResolvedDestination, TracingNotifier,
};
pub use guard::{AlwaysConfirm, ConflictPrompt, FileInfo, GuardError, NeverConfirm, file_info};
pub use handoff::{FileOpener, HandOffError, SystemOpener};
pub use permission::{
    Capability, PermissionBackend, PermissionResolver, PermissionState, Platform,
};
pub use storage::{ResolvedDir, StorageError, StorageSelector};
pub use transfer::{TransferClient, TransferError, TransferOutcome};
