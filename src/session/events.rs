//! Typed events emitted by the session worker.
//!
//! The worker never touches display state. It pushes these events over a
//! channel; the presentation layer drains the channel on its own schedule
//! and owns all rendering.

use tokio::sync::mpsc;

/// Final accounting for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Downloads the session aimed for.
    pub requested: u32,
    /// Downloads that succeeded.
    pub downloaded: u32,
    /// Candidates skipped because their link was already recorded.
    pub skipped_known: u32,
    /// Candidates skipped because they exceeded the duration limit.
    pub skipped_duration: u32,
    /// Download attempts that failed.
    pub failed: u32,
    /// Links downloaded this session, in download order.
    pub new_links: Vec<String>,
}

impl SessionSummary {
    /// Whether the session reached its target count.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.downloaded >= self.requested
    }
}

/// One message from the session worker to the presentation layer.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user-facing log line.
    Log(String),
    /// Overall session progress as a percentage of the target count,
    /// capped at 100.
    OverallProgress(f64),
    /// In-flight transfer progress for the named video.
    DownloadProgress {
        /// Title of the video being downloaded.
        title: String,
        /// Transfer progress in `0.0..=100.0`.
        percent: f64,
    },
    /// Terminal summary; the last event of a session that ran to
    /// completion.
    Finished(SessionSummary),
}

/// Sending half of the session event channel.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half of the session event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Creates the event channel connecting worker and presentation.
#[must_use]
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
