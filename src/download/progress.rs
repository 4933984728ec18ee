//! Parsing of progress lines emitted by the download tool.
//!
//! The downloader is invoked with
//! `--progress-template "download:%(progress._percent_str)s"` and
//! `--newline`, so in-flight transfers print lines like `download:  42.3%`.
//! Everything else on stdout is ignored.

/// Extracts the percentage from one progress-template line.
///
/// Returns `None` for lines that are not progress updates.
pub(crate) fn parse_progress_line(line: &str) -> Option<f64> {
    let rest = line.trim().strip_prefix("download:")?;
    let token = rest.trim().strip_suffix('%')?;
    token.trim().parse::<f64>().ok()
}
