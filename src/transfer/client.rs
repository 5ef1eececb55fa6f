//! HTTP transfer executor: whole-file streaming GET to a destination path.
//!
//! The transfer is single-attempt: retry scheduling and resumable ranges are
//! outside this crate's contract. A failed or interrupted stream removes the
//! partial file before the error returns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::TransferError;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Number of progress callbacks per transfer when the length is known.
const PROGRESS_STEPS: u64 = 10;

/// Result of a completed transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The destination path that was written.
    pub path: PathBuf,
    /// Total bytes written to disk.
    pub bytes_written: u64,
}

/// HTTP client for streaming documents to disk.
///
/// Designed to be created once and reused; connection pooling is handled by
/// the underlying reqwest client.
#[derive(Debug, Clone)]
pub struct TransferClient {
    client: Client,
}

impl Default for TransferClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferClient {
    /// Creates a client with the default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied timeouts.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Transfers the document at `url` to `destination`, reporting coarse
    /// progress.
    ///
    /// `on_progress` receives the completed fraction (0.0..=1.0) at roughly
    /// every tenth of the expected bytes; it is never invoked when the server
    /// does not announce a length.
    ///
    /// HTTP 200 and 206 count as success; any other status is
    /// [`TransferError::BadStatus`]. On any failure the partially written
    /// destination file is removed before the error returns.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError`] when the URL scheme is unsupported, the
    /// request fails at the network level, the server returns a non-success
    /// status, or writing to disk fails.
    #[must_use = "transfer outcome contains the written path and byte count"]
    #[instrument(skip(self, on_progress), fields(url = %url, destination = %destination.display()))]
    pub async fn transfer<F>(
        &self,
        url: &str,
        destination: &Path,
        mut on_progress: F,
    ) -> Result<TransferOutcome, TransferError>
    where
        F: FnMut(f64) + Send,
    {
        // Scheme gate before any network I/O.
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(TransferError::unsupported_scheme(url));
        }

        debug!("starting transfer");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                TransferError::timeout(url)
            } else {
                TransferError::network(url, e)
            }
        })?;

        let status = response.status().as_u16();
        if status != 200 && status != 206 {
            return Err(TransferError::bad_status(url, status));
        }

        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&len| len > 0);

        let file = File::create(destination)
            .await
            .map_err(|e| TransferError::io(destination, e))?;

        let stream_result =
            stream_to_file(file, response, url, destination, content_length, &mut on_progress)
                .await;

        match stream_result {
            Ok(bytes_written) => {
                info!(bytes = bytes_written, "transfer complete");
                Ok(TransferOutcome {
                    path: destination.to_path_buf(),
                    bytes_written,
                })
            }
            Err(error) => {
                // Cleanup-then-report: no partial artifact survives.
                debug!(path = %destination.display(), "removing partial file after stream error");
                let _ = tokio::fs::remove_file(destination).await;
                Err(error)
            }
        }
    }
}

/// Streams the response body to the file, emitting coarse progress.
async fn stream_to_file<F>(
    file: File,
    response: reqwest::Response,
    url: &str,
    destination: &Path,
    content_length: Option<u64>,
    on_progress: &mut F,
) -> Result<u64, TransferError>
where
    F: FnMut(f64) + Send,
{
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;
    let mut last_fraction = 0.0_f64;

    // Next byte count at which progress fires; None disables progress
    // entirely when the length is unknown (no divide-by-zero path exists).
    let step = content_length.map(|total| (total / PROGRESS_STEPS).max(1));
    let mut next_report = step;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| TransferError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransferError::io(destination, e))?;
        bytes_written += chunk.len() as u64;

        if let (Some(total), Some(threshold)) = (content_length, next_report) {
            if bytes_written >= threshold {
                #[allow(clippy::cast_precision_loss)]
                let fraction = (bytes_written as f64 / total as f64).min(1.0);
                on_progress(fraction);
                last_fraction = fraction;
                next_report = step.map(|s| threshold.saturating_add(s));
            }
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| TransferError::io(destination, e))?;

    // A complete transfer always ends on 1.0, even when the last chunk
    // landed between two thresholds.
    if content_length.is_some() && last_fraction < 1.0 {
        on_progress(1.0);
    }

    Ok(bytes_written)
}
