//! CLI argument definitions using clap derive macros.

use std::convert::Infallible;
use std::path::PathBuf;

use clap::Parser;

use ytgrab_core::QualityTier;
use ytgrab_core::config::{
    DEFAULT_LEDGER_FILE, DEFAULT_MAX_DURATION_MINUTES, DEFAULT_OUTPUT_DIR, DEFAULT_TARGET_COUNT,
};

/// Search a video platform by keyword and batch download matching videos.
///
/// ytgrab asks the external media tool for a pool of search results,
/// skips videos that are over the duration limit or already recorded in
/// the link ledger, downloads the rest sequentially at the chosen quality,
/// and appends the newly downloaded links to the ledger.
#[derive(Parser, Debug)]
#[command(name = "ytgrab")]
#[command(author, version, about)]
pub struct Args {
    /// Search keyword
    pub keyword: String,

    /// Number of videos to download
    #[arg(short = 'n', long = "count", default_value_t = DEFAULT_TARGET_COUNT, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Maximum video duration in minutes
    #[arg(short = 'd', long = "max-duration", default_value_t = DEFAULT_MAX_DURATION_MINUTES, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_duration: u32,

    /// Video quality: 480p, 720p, or 1080p (unknown labels fall back to 480p)
    #[arg(short = 'q', long, default_value = "480p", value_parser = parse_quality)]
    pub quality: QualityTier,

    /// Directory downloaded videos are written to
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Ledger file recording downloaded links
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,

    /// Path to the yt-dlp binary (overrides YTGRAB_YTDLP)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub ytdlp: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,
}

fn parse_quality(raw: &str) -> Result<QualityTier, Infallible> {
    Ok(QualityTier::from_label(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["ytgrab", "lofi"]).unwrap();
        assert_eq!(args.keyword, "lofi");
        assert_eq!(args.count, 2); // DEFAULT_TARGET_COUNT
        assert_eq!(args.max_duration, 10); // DEFAULT_MAX_DURATION_MINUTES
        assert_eq!(args.quality, QualityTier::Low);
        assert_eq!(args.output_dir, PathBuf::from("downloads"));
        assert_eq!(args.ledger, PathBuf::from("videos.csv"));
        assert!(args.ytdlp.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_keyword_is_required() {
        let result = Args::try_parse_from(["ytgrab"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_count_short_flag() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "-n", "5"]).unwrap();
        assert_eq!(args.count, 5);
    }

    #[test]
    fn test_cli_count_long_flag() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "--count", "7"]).unwrap();
        assert_eq!(args.count, 7);
    }

    #[test]
    fn test_cli_count_zero_rejected() {
        let result = Args::try_parse_from(["ytgrab", "lofi", "-n", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_count_non_numeric_rejected() {
        let result = Args::try_parse_from(["ytgrab", "lofi", "-n", "two"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_max_duration_short_flag() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "-d", "15"]).unwrap();
        assert_eq!(args.max_duration, 15);
    }

    #[test]
    fn test_cli_max_duration_zero_rejected() {
        let result = Args::try_parse_from(["ytgrab", "lofi", "-d", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_quality_labels() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "-q", "720p"]).unwrap();
        assert_eq!(args.quality, QualityTier::Medium);

        let args = Args::try_parse_from(["ytgrab", "lofi", "--quality", "1080p"]).unwrap();
        assert_eq!(args.quality, QualityTier::High);
    }

    #[test]
    fn test_cli_unknown_quality_falls_back_to_lowest() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "-q", "4k"]).unwrap();
        assert_eq!(args.quality, QualityTier::Low);
    }

    #[test]
    fn test_cli_output_dir_and_ledger_overrides() {
        let args = Args::try_parse_from([
            "ytgrab",
            "lofi",
            "-o",
            "/tmp/videos",
            "--ledger",
            "/tmp/seen.csv",
        ])
        .unwrap();
        assert_eq!(args.output_dir, PathBuf::from("/tmp/videos"));
        assert_eq!(args.ledger, PathBuf::from("/tmp/seen.csv"));
    }

    #[test]
    fn test_cli_ytdlp_override() {
        let args =
            Args::try_parse_from(["ytgrab", "lofi", "--yt-dlp", "/opt/yt-dlp"]).unwrap();
        assert_eq!(args.ytdlp, Some(PathBuf::from("/opt/yt-dlp")));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["ytgrab", "lofi", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["ytgrab", "lofi", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["ytgrab", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["ytgrab", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["ytgrab", "lofi", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_combined_flags() {
        let args = Args::try_parse_from([
            "ytgrab",
            "lofi hip hop",
            "-n",
            "3",
            "-d",
            "20",
            "-q",
            "720p",
        ])
        .unwrap();
        assert_eq!(args.keyword, "lofi hip hop");
        assert_eq!(args.count, 3);
        assert_eq!(args.max_duration, 20);
        assert_eq!(args.quality, QualityTier::Medium);
    }
}
