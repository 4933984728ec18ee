//! Quality tiers and their format-selection expressions.

use std::fmt;

/// Named quality preset for a download.
///
/// Each tier maps to a fixed format-selection expression capping the
/// vertical resolution and merging separate audio/video tracks into a
/// single mp4 container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    /// 480p cap.
    #[default]
    Low,
    /// 720p cap.
    Medium,
    /// 1080p cap.
    High,
}

impl QualityTier {
    /// Maps a user-supplied label to a tier.
    ///
    /// Accepts the resolution labels (`480p`, `720p`, `1080p`) and the
    /// tier names (`low`, `medium`, `high`), case-insensitively.
    /// Unrecognized labels fall back to the lowest tier.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "720p" | "medium" => Self::Medium,
            "1080p" | "high" => Self::High,
            _ => Self::Low,
        }
    }

    /// Returns the format-selection expression passed to the download tool.
    #[must_use]
    pub fn format_expr(self) -> &'static str {
        match self {
            Self::Low => {
                "bestvideo[ext=mp4][height<=480]+bestaudio[ext=m4a]/best[ext=mp4][height<=480]"
            }
            Self::Medium => {
                "bestvideo[ext=mp4][height<=720]+bestaudio[ext=m4a]/best[ext=mp4][height<=720]"
            }
            Self::High => {
                "bestvideo[ext=mp4][height<=1080]+bestaudio[ext=m4a]/best[ext=mp4][height<=1080]"
            }
        }
    }

    /// Returns the stable resolution label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "480p",
            Self::Medium => "720p",
            Self::High => "1080p",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
