//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download catalog documents into verified local files.
///
/// Bookfetch fetches a remote PDF/EPUB, verifies the result, and can hand
/// the file straight to your system viewer.
#[derive(Parser, Debug)]
#[command(name = "bookfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Document URL to download (http or https)
    pub url: String,

    /// Human-readable title used to derive the filename
    #[arg(short, long)]
    pub title: String,

    /// Destination directory, used verbatim (created when absent)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Save to app-private storage even when shared storage is available
    #[arg(short, long)]
    pub private: bool,

    /// Open the file with the system viewer after downloading
    #[arg(short, long)]
    pub open: bool,

    /// Replace an existing file without asking
    #[arg(long)]
    pub overwrite: bool,

    /// Never replace an existing file; treat a conflict as cancellation
    #[arg(long, conflicts_with = "overwrite")]
    pub no_overwrite: bool,

    /// Print a JSON summary of the acquired file
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
