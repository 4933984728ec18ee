//! Error types for the download module.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while downloading a single video.
///
/// Every variant is recovered at the per-video scope: the session logs the
/// failure and moves on to the next candidate.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The download tool process could not be started.
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        /// The binary that failed to start.
        binary: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the download tool process failed.
    #[error("failed waiting for {binary}: {source}")]
    Wait {
        /// The binary being waited on.
        binary: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tool exited unsuccessfully (network error, unavailable format,
    /// tool crash).
    #[error("download tool exited with {status} for {link}: {detail}")]
    ToolFailure {
        /// The link being downloaded.
        link: String,
        /// The process exit status.
        status: ExitStatus,
        /// Last diagnostic line from the tool, if any.
        detail: String,
    },
}
