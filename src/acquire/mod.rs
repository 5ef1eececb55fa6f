//! Acquisition orchestration: the public entry point of the service.
//!
//! Composes the permission resolver, storage selector, name sanitizer,
//! conflict/integrity guard, and transfer executor into two operations:
//! [`Acquirer::download`] and [`Acquirer::download_and_open`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bookfetch_core::acquire::{Acquirer, AcquisitionRequest};
//! use bookfetch_core::guard::AlwaysConfirm;
//! use bookfetch_core::handoff::SystemOpener;
//! use bookfetch_core::permission::PermissionResolver;
//! use bookfetch_core::storage::StorageSelector;
//! use bookfetch_core::transfer::TransferClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = StorageSelector::new(PermissionResolver::without_runtime_permissions());
//! let acquirer = Acquirer::new(
//!     TransferClient::new(),
//!     storage,
//!     Arc::new(AlwaysConfirm),
//!     Arc::new(SystemOpener),
//!     Arc::new(bookfetch_core::acquire::TracingNotifier),
//! );
//! let request = AcquisitionRequest::new("https://example.com/book.pdf", "Dune")?;
//! let outcome = acquirer.download(&request).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod orchestrator;
mod request;

pub use error::AcquireError;
pub use events::{AcquireEvent, Notifier, NullNotifier, TracingNotifier};
pub use orchestrator::{Acquired, Acquirer, Opened};
pub use request::{AcquisitionRequest, ResolvedDestination};
