//! Session orchestration: search, filter, download, persist.
//!
//! A session moves through `Searching`, `Filtering/Downloading`,
//! `Persisting` and `Done`. Candidates are processed strictly in the order
//! the search returned them, one download at a time. The known-link set is
//! read once at session start and the ledger is appended to once at session
//! end.
//!
//! Failure scope is deliberately narrow: a failed search degrades to an
//! empty candidate list, a failed download skips to the next candidate, and
//! only ledger I/O aborts the session.

mod events;
mod params;

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::download::{DownloadRequest, VideoDownloader};
use crate::ledger::{Ledger, LedgerError};
use crate::search::SearchBackend;

pub use events::{EventReceiver, EventSender, SessionEvent, SessionSummary, event_channel};
pub use params::{SEARCH_POOL_MULTIPLIER, SessionParameters, ValidationError};

/// Errors that abort a session.
///
/// Everything else (search failure, per-video download failure) is
/// recovered inside the run loop.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The ledger could not be read at session start or written at session
    /// end. Downloaded media is not rolled back.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// One download run: search a candidate pool, filter it against the ledger
/// and the duration limit, download sequentially up to the target count,
/// then persist the new links.
#[derive(Debug)]
pub struct Session<S, D, L> {
    search: S,
    downloader: D,
    ledger: L,
    events: EventSender,
}

impl<S, D, L> Session<S, D, L>
where
    S: SearchBackend,
    D: VideoDownloader,
    L: Ledger,
{
    /// Wires a session to its adapters and event channel.
    pub fn new(search: S, downloader: D, ledger: L, events: EventSender) -> Self {
        Self {
            search,
            downloader,
            ledger,
            events,
        }
    }

    /// Runs the session to completion.
    ///
    /// Reaching fewer than the requested downloads after exhausting the
    /// pool is a partial result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] when the ledger cannot be read or
    /// appended; completed downloads are not rolled back.
    #[instrument(skip(self), fields(keyword = params.keyword(), target = params.target_count()))]
    pub async fn run(&self, params: &SessionParameters) -> Result<SessionSummary, SessionError> {
        let mut known = self.ledger.load_known_links()?;

        let pool_size = params.search_pool_size();
        self.log(format!(
            "Searching \"{}\" (pool of {pool_size}, target {}, limit {} min, quality {})",
            params.keyword(),
            params.target_count(),
            params.max_duration_minutes(),
            params.quality(),
        ));

        let candidates = self.search.search(params.keyword(), pool_size).await;
        self.log(format!("Search returned {} results", candidates.len()));

        let max_duration_secs = params.max_duration_secs();
        let mut summary = SessionSummary {
            requested: params.target_count(),
            ..SessionSummary::default()
        };

        for candidate in &candidates {
            if summary.downloaded >= params.target_count() {
                break;
            }

            if known.contains(&candidate.link) {
                summary.skipped_known += 1;
                debug!(link = %candidate.link, "Already recorded, skipping");
            } else if candidate.duration_secs > max_duration_secs {
                summary.skipped_duration += 1;
                self.log(format!(
                    "Over duration limit, skipping: {} | {} ({}s)",
                    candidate.title, candidate.link, candidate.duration_secs
                ));
            } else {
                self.log(format!(
                    "Downloading: {} | {} ({}s)",
                    candidate.title, candidate.link, candidate.duration_secs
                ));

                let request = DownloadRequest {
                    link: candidate.link.clone(),
                    quality: params.quality(),
                };
                let events = self.events.clone();
                let title = candidate.title.clone();
                let succeeded = self
                    .downloader
                    .download(&request, &move |percent| {
                        forward_download_progress(&events, &title, percent);
                    })
                    .await;

                if succeeded {
                    // Inserting into the known set also absorbs a pool that
                    // returns the same link twice.
                    known.insert(candidate.link.clone());
                    summary.new_links.push(candidate.link.clone());
                    summary.downloaded += 1;
                    self.log(format!("Downloaded: {}", candidate.title));
                } else {
                    summary.failed += 1;
                    self.log(format!("Download failed, skipping: {}", candidate.title));
                }
            }

            self.emit(SessionEvent::OverallProgress(overall_progress(
                summary.downloaded,
                params.target_count(),
            )));
        }

        if summary.new_links.is_empty() {
            self.log("No videos downloaded".to_string());
        } else {
            self.ledger.append_links(&summary.new_links)?;
            self.log(format!(
                "Recorded {} new links in the ledger",
                summary.new_links.len()
            ));
        }

        if !summary.reached_target() {
            warn!(
                downloaded = summary.downloaded,
                requested = summary.requested,
                "Candidate pool exhausted before reaching the target"
            );
        }
        info!(
            downloaded = summary.downloaded,
            skipped_known = summary.skipped_known,
            skipped_duration = summary.skipped_duration,
            failed = summary.failed,
            "Session finished"
        );

        self.emit(SessionEvent::Finished(summary.clone()));
        Ok(summary)
    }

    fn log(&self, line: String) {
        self.emit(SessionEvent::Log(line));
    }

    fn emit(&self, event: SessionEvent) {
        // A dropped receiver only means nothing is rendering.
        let _ = self.events.send(event);
    }
}

/// Stable progress handler for in-flight downloads.
///
/// Receives the candidate title explicitly instead of capturing display
/// state; the per-download closure is a thin adapter over this function.
fn forward_download_progress(events: &EventSender, title: &str, percent: f64) {
    let _ = events.send(SessionEvent::DownloadProgress {
        title: title.to_string(),
        percent,
    });
}

/// Overall session progress as a percentage of the target count, capped
/// at 100.
fn overall_progress(downloaded: u32, target_count: u32) -> f64 {
    (f64::from(downloaded) / f64::from(target_count) * 100.0).min(100.0)
}
