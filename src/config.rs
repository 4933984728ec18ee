//! Defaults and environment overrides.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default number of videos to download per session.
pub const DEFAULT_TARGET_COUNT: u32 = 2;

/// Default duration limit in minutes.
pub const DEFAULT_MAX_DURATION_MINUTES: u32 = 10;

/// Default directory downloaded videos are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Default ledger file recording downloaded links.
pub const DEFAULT_LEDGER_FILE: &str = "videos.csv";

/// Environment variable overriding the media tool binary.
pub const YTDLP_ENV_VAR: &str = "YTGRAB_YTDLP";

/// Name the media tool is looked up by on `PATH` when no override is given.
pub const YTDLP_DEFAULT_BINARY: &str = "yt-dlp";

/// Resolves the media tool binary path.
///
/// Priority: CLI flag > `YTGRAB_YTDLP` environment variable > `yt-dlp`
/// on `PATH`.
#[must_use]
pub fn resolve_ytdlp_binary(cli_override: Option<&Path>) -> PathBuf {
    resolve_ytdlp_binary_from(cli_override, env::var_os(YTDLP_ENV_VAR))
}

fn resolve_ytdlp_binary_from(cli_override: Option<&Path>, env_value: Option<OsString>) -> PathBuf {
    if let Some(path) = cli_override {
        return path.to_path_buf();
    }
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return PathBuf::from(value);
    }
    PathBuf::from(YTDLP_DEFAULT_BINARY)
}
