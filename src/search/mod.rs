//! Keyword search against the video platform via the external media tool.
//!
//! The search adapter shells out to `yt-dlp` with the `ytsearch<N>:<keyword>`
//! query convention and `--dump-json`, which emits one JSON metadata record
//! per result line on stdout. Only the fields the session needs are parsed;
//! everything else in the record is ignored.
//!
//! Search failures are deliberately soft: a missing tool or unparsable
//! output yields an empty candidate list, and the session reports zero
//! downloads instead of aborting.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// A single search result considered for download.
///
/// Candidates are immutable once produced; the session discards them after
/// the filtering decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    /// Canonical page URL, used as the unique identifier for deduplication.
    pub link: String,
    /// Video title, used as the output base filename.
    pub title: String,
    /// Duration in seconds; 0 when the platform reports none.
    pub duration_secs: u64,
}

/// Search seam between the session and the external tool.
#[async_trait]
pub trait SearchBackend {
    /// Requests up to `pool_size` results for `keyword`, in the order the
    /// platform returns them (treated as relevance order).
    async fn search(&self, keyword: &str, pool_size: usize) -> Vec<VideoCandidate>;
}

/// Raw metadata record emitted by `yt-dlp --dump-json`, one per line.
#[derive(Debug, Deserialize)]
struct SearchRecord {
    webpage_url: String,
    title: Option<String>,
    duration: Option<f64>,
}

impl From<SearchRecord> for VideoCandidate {
    fn from(record: SearchRecord) -> Self {
        // yt-dlp reports fractional seconds for some extractors.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration_secs = record.duration.map_or(0, |secs| secs.max(0.0) as u64);
        Self {
            link: record.webpage_url,
            title: record
                .title
                .unwrap_or_else(|| "Unknown Title".to_string()),
            duration_secs,
        }
    }
}

/// [`SearchBackend`] implementation invoking the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpSearch {
    binary: PathBuf,
}

impl YtDlpSearch {
    /// Creates a search client using the given `yt-dlp` binary path.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl SearchBackend for YtDlpSearch {
    #[instrument(skip(self), fields(binary = %self.binary.display()))]
    async fn search(&self, keyword: &str, pool_size: usize) -> Vec<VideoCandidate> {
        let query = format!("ytsearch{pool_size}:{keyword}");

        let output = match Command::new(&self.binary)
            .arg(&query)
            .arg("--dump-json")
            .arg("--no-warnings")
            .output()
            .await
        {
            Ok(output) => output,
            Err(source) => {
                warn!(error = %source, "Search tool could not be invoked");
                return Vec::new();
            }
        };

        if !output.status.success() {
            // The tool can exit non-zero after emitting valid records
            // (e.g. one unavailable video in the pool), so stdout is
            // still parsed.
            warn!(status = %output.status, "Search tool exited with an error");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let candidates = parse_search_output(&stdout);
        debug!(candidates = candidates.len(), "Search complete");
        candidates
    }
}

/// Parses one metadata record per line, skipping lines that are not valid
/// records.
fn parse_search_output(stdout: &str) -> Vec<VideoCandidate> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match serde_json::from_str::<SearchRecord>(line) {
                Ok(record) => Some(VideoCandidate::from(record)),
                Err(error) => {
                    debug!(%error, "Skipping unparsable search record");
                    None
                }
            }
        })
        .collect()
}
