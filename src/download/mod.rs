//! Single-video download through the external media tool.
//!
//! One `yt-dlp` process is spawned per attempted download. The video and
//! audio tracks selected by the quality tier are merged into an mp4 named
//! after the video's title inside the configured output directory.
//! Identically-titled videos collide on the same path; the last write wins.
//!
//! Progress percentages are streamed to a caller-supplied function while
//! the transfer is in flight. A failed download is reported as an
//! unsuccessful outcome, never as a session-fatal error.

mod error;
mod format;
mod progress;

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

pub use error::DownloadError;
pub use format::QualityTier;

use progress::parse_progress_line;

/// One attempted download: a link plus the quality it should be fetched at.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Canonical page URL of the video.
    pub link: String,
    /// Quality tier controlling format selection.
    pub quality: QualityTier,
}

/// Progress observer invoked with percentages in `0.0..=100.0`.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Download seam between the session and the external tool.
#[async_trait]
pub trait VideoDownloader {
    /// Attempts one download, reporting progress through `on_progress`.
    ///
    /// Returns whether the download succeeded. Failures are logged by the
    /// implementation; they never propagate.
    async fn download(&self, request: &DownloadRequest, on_progress: ProgressFn<'_>) -> bool;
}

/// [`VideoDownloader`] implementation invoking the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    binary: PathBuf,
    output_dir: PathBuf,
}

impl YtDlpDownloader {
    /// Creates a downloader writing into `output_dir`, created on first use.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            output_dir: output_dir.into(),
        }
    }

    async fn try_download(
        &self,
        request: &DownloadRequest,
        on_progress: ProgressFn<'_>,
    ) -> Result<(), DownloadError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| DownloadError::OutputDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let output_template = self.output_dir.join("%(title)s.%(ext)s");

        let mut child = Command::new(&self.binary)
            .arg(&request.link)
            .arg("-f")
            .arg(request.quality.format_expr())
            .arg("-o")
            .arg(&output_template)
            .arg("--merge-output-format")
            .arg("mp4")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("--newline")
            .arg("--progress-template")
            .arg("download:%(progress._percent_str)s")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| DownloadError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        // stderr is drained on its own task so a chatty tool cannot fill
        // the pipe and stall the transfer while stdout is being read.
        let stderr_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut last_line = String::new();
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if !line.trim().is_empty() {
                        last_line = line;
                    }
                }
                last_line
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(percent) = parse_progress_line(&line) {
                    on_progress(percent);
                }
            }
        }

        let status = child.wait().await.map_err(|source| DownloadError::Wait {
            binary: self.binary.display().to_string(),
            source,
        })?;

        let detail = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            debug!(link = %request.link, "Download finished");
            Ok(())
        } else {
            Err(DownloadError::ToolFailure {
                link: request.link.clone(),
                status,
                detail,
            })
        }
    }
}

#[async_trait]
impl VideoDownloader for YtDlpDownloader {
    #[instrument(skip(self, on_progress), fields(link = %request.link, quality = %request.quality))]
    async fn download(&self, request: &DownloadRequest, on_progress: ProgressFn<'_>) -> bool {
        match self.try_download(request, on_progress).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "Download failed");
                false
            }
        }
    }
}
