//! Validated per-session parameters.

use thiserror::Error;

use crate::download::QualityTier;

/// How many search results are requested per desired download.
///
/// The pool is oversized to absorb filtering losses (already-recorded
/// links, over-duration videos) without a second search round-trip.
pub const SEARCH_POOL_MULTIPLIER: u32 = 5;

/// Rejected session input. The session never starts when construction
/// fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The search keyword was empty or whitespace.
    #[error("search keyword must not be empty")]
    EmptyKeyword,

    /// The desired download count was zero.
    #[error("download count must be a positive integer")]
    ZeroTargetCount,

    /// The duration limit was zero.
    #[error("duration limit must be a positive number of minutes")]
    ZeroDurationLimit,
}

/// Parameters supplied once per run.
///
/// Fields are private so a value of this type always satisfies the session
/// invariants: non-empty keyword, positive target count, positive duration
/// limit.
#[derive(Debug, Clone)]
pub struct SessionParameters {
    keyword: String,
    target_count: u32,
    max_duration_minutes: u32,
    quality: QualityTier,
}

impl SessionParameters {
    /// Validates and constructs session parameters.
    ///
    /// The keyword is trimmed; surrounding whitespace never reaches the
    /// search tool.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty keyword or a zero count or
    /// duration limit.
    pub fn new(
        keyword: &str,
        target_count: u32,
        max_duration_minutes: u32,
        quality: QualityTier,
    ) -> Result<Self, ValidationError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }
        if target_count == 0 {
            return Err(ValidationError::ZeroTargetCount);
        }
        if max_duration_minutes == 0 {
            return Err(ValidationError::ZeroDurationLimit);
        }
        Ok(Self {
            keyword: keyword.to_string(),
            target_count,
            max_duration_minutes,
            quality,
        })
    }

    /// The search keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Number of successful downloads this session aims for.
    #[must_use]
    pub fn target_count(&self) -> u32 {
        self.target_count
    }

    /// Duration limit in minutes.
    #[must_use]
    pub fn max_duration_minutes(&self) -> u32 {
        self.max_duration_minutes
    }

    /// Duration limit converted to seconds, for candidate filtering.
    #[must_use]
    pub fn max_duration_secs(&self) -> u64 {
        u64::from(self.max_duration_minutes) * 60
    }

    /// Quality tier for every download in the session.
    #[must_use]
    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    /// Size of the candidate pool requested from the search tool.
    #[must_use]
    pub fn search_pool_size(&self) -> usize {
        self.target_count.saturating_mul(SEARCH_POOL_MULTIPLIER) as usize
    }
}
