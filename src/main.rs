//! CLI entry point for the bookfetch tool.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use bookfetch_core::{
    AcquireEvent, AcquisitionRequest, Acquired, Acquirer, AlwaysConfirm, ConflictPrompt,
    NeverConfirm, Notifier, Opened, PermissionResolver, StorageSelector, SystemOpener,
    TransferClient, file_info,
};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let mut request = AcquisitionRequest::new(&args.url, &args.title)?;
    if let Some(dir) = &args.dir {
        request = request.with_destination_dir(dir);
    }
    request = request.prefer_private_storage(args.private);

    let prompt: Arc<dyn ConflictPrompt> = if args.overwrite {
        Arc::new(AlwaysConfirm)
    } else if args.no_overwrite {
        Arc::new(NeverConfirm)
    } else {
        Arc::new(TerminalPrompt)
    };

    let storage = StorageSelector::new(PermissionResolver::without_runtime_permissions());
    let acquirer = Acquirer::new(
        TransferClient::new(),
        storage,
        prompt,
        Arc::new(SystemOpener),
        Arc::new(CliNotifier::new(args.quiet)),
    );

    if args.open {
        match acquirer.download_and_open(&request).await? {
            Opened::Viewer(path) => report(&path, &args).await?,
            Opened::SavedWithoutViewer { path, .. } => {
                if !args.quiet {
                    println!(
                        "The file is saved, but no compatible viewer app was found."
                    );
                }
                report(&path, &args).await?;
            }
            Opened::Cancelled => report_cancelled(&args),
        }
    } else {
        match acquirer.download(&request).await? {
            Acquired::Saved(path) => report(&path, &args).await?,
            Acquired::Cancelled => report_cancelled(&args),
        }
    }

    Ok(())
}

/// Prints a summary of the acquired file.
async fn report(path: &Path, args: &Args) -> Result<()> {
    let info = file_info(path).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else if !args.quiet {
        println!("Saved {} ({} bytes) to {}", info.name, info.size, path.display());
    }
    Ok(())
}

fn report_cancelled(args: &Args) {
    if !args.quiet {
        println!("Cancelled.");
    }
}

/// Interactive overwrite confirmation on the terminal.
struct TerminalPrompt;

#[async_trait]
impl ConflictPrompt for TerminalPrompt {
    async fn confirm_overwrite(&self, path: &Path) -> bool {
        let prompt = format!(
            "A file named {} already exists. Replace it? [y/N] ",
            path.display()
        );
        tokio::task::spawn_blocking(move || {
            use std::io::Write;
            print!("{prompt}");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line).is_err() {
                return false;
            }
            matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
        })
        .await
        .unwrap_or(false)
    }
}

/// Notifier driving an indicatif progress bar and terminal messages.
struct CliNotifier {
    bar: ProgressBar,
    quiet: bool,
}

impl CliNotifier {
    fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(100)
        };
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar, quiet }
    }
}

impl Notifier for CliNotifier {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn notify(&self, event: &AcquireEvent) {
        match event {
            AcquireEvent::Started { file_name, .. } => {
                self.bar.set_position(0);
                self.bar.set_message(file_name.clone());
            }
            AcquireEvent::Progress { fraction } => {
                self.bar.set_position((fraction * 100.0).round() as u64);
            }
            AcquireEvent::UsingPrivateStorage => {
                if !self.quiet {
                    self.bar.println(
                        "Storage permission unavailable; saving inside app storage.",
                    );
                }
            }
            AcquireEvent::Succeeded { .. }
            | AcquireEvent::Failed { .. }
            | AcquireEvent::Cancelled => {
                self.bar.finish_and_clear();
            }
            AcquireEvent::HandOffUnavailable { .. } => {}
        }
    }
}
