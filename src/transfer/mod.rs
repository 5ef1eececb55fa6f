//! Whole-file HTTP transfer of remote documents to local paths.
//!
//! Single-attempt streaming downloads with coarse progress reporting and
//! cleanup of partial output on failure. Retry policy, resumption, and
//! explicit deadlines are deliberately not provided here; timeout semantics
//! belong to the underlying transport.

mod client;
mod error;

pub use client::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, TransferClient, TransferOutcome};
pub use error::TransferError;
