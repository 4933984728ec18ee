//! CLI entry point for the ytgrab tool.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use ytgrab_core::{
    CsvLedger, Session, SessionParameters, YtDlpDownloader, YtDlpSearch, config,
    session::{EventReceiver, SessionEvent, event_channel},
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

    let params = SessionParameters::new(&args.keyword, args.count, args.max_duration, args.quality)
        .context("invalid session parameters")?;

    let binary = config::resolve_ytdlp_binary(args.ytdlp.as_deref());
    debug!(binary = %binary.display(), "Using media tool");

    let search = YtDlpSearch::new(binary.clone());
    let downloader = YtDlpDownloader::new(binary, args.output_dir.clone());
    let ledger = CsvLedger::new(args.ledger.clone());

    let (events_tx, events_rx) = event_channel();
    let session = Session::new(search, downloader, ledger, events_tx);

    // The session runs on its own task; this task stays responsive and
    // renders whatever the worker reports.
    let worker = tokio::spawn(async move { session.run(&params).await });

    render_events(events_rx, args.quiet).await;

    let summary = worker
        .await
        .context("session worker panicked")?
        .context("session failed")?;

    info!(
        downloaded = summary.downloaded,
        requested = summary.requested,
        failed = summary.failed,
        "Session complete"
    );

    Ok(())
}

/// Drains session events and renders them on a single progress bar.
///
/// Log lines are printed above the bar so earlier output is never cleared.
async fn render_events(mut events: EventReceiver, quiet: bool) {
    let bar = if quiet {
        None
    } else {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    };

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Log(line) => {
                if let Some(bar) = &bar {
                    bar.println(line);
                }
            }
            SessionEvent::OverallProgress(percent) => {
                if let Some(bar) = &bar {
                    bar.set_position(percent.round() as u64);
                }
            }
            SessionEvent::DownloadProgress { title, percent } => {
                if let Some(bar) = &bar {
                    bar.set_message(format!("{title}: {percent:.1}%"));
                }
            }
            SessionEvent::Finished(summary) => {
                if let Some(bar) = &bar {
                    bar.finish_with_message(format!(
                        "Downloaded {} of {} requested",
                        summary.downloaded, summary.requested
                    ));
                }
            }
        }
    }
}
