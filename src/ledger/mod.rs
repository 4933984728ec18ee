//! Append-only ledger of downloaded video links.
//!
//! The ledger is a CSV file with a single `Video Link` column, one link per
//! row. It is read once when a session starts to build the known-link set,
//! and appended to once when the session ends. Existing rows are never
//! rewritten; the file is created with its header on first use.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

/// Header written to column A of a freshly created ledger file.
pub const LEDGER_HEADER: &str = "Video Link";

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Filesystem error opening or flushing the ledger file.
    #[error("I/O error accessing ledger {path}: {source}")]
    Io {
        /// The ledger file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV-level error reading or writing ledger records.
    #[error("malformed ledger {path}: {source}")]
    Csv {
        /// The ledger file path.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Persistence seam for the known-link set.
///
/// The production implementation is [`CsvLedger`]; tests substitute
/// in-memory fakes.
pub trait Ledger {
    /// Reads every previously recorded link.
    ///
    /// Returns an empty set when no persisted state exists (first run).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the backing store exists but cannot
    /// be read.
    fn load_known_links(&self) -> Result<HashSet<String>, LedgerError>;

    /// Appends each link as a new record, preserving existing rows.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the backing store cannot be written.
    fn append_links(&self, links: &[String]) -> Result<(), LedgerError>;
}

/// CSV-file-backed [`Ledger`].
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    /// Creates a ledger backed by the CSV file at `path`.
    ///
    /// The file itself is not touched until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> LedgerError {
        LedgerError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

impl Ledger for CsvLedger {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load_known_links(&self) -> Result<HashSet<String>, LedgerError> {
        if !self.path.exists() {
            debug!("Ledger file absent, starting with empty known-link set");
            return Ok(HashSet::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|source| self.csv_error(source))?;

        let mut links = HashSet::new();
        for record in reader.records() {
            let record = record.map_err(|source| self.csv_error(source))?;
            if let Some(link) = record.get(0)
                && !link.is_empty()
            {
                links.insert(link.to_string());
            }
        }

        debug!(known = links.len(), "Loaded known links");
        Ok(links)
    }

    #[instrument(skip(self, links), fields(path = %self.path.display(), count = links.len()))]
    fn append_links(&self, links: &[String]) -> Result<(), LedgerError> {
        // Zero-length files also need the header row, not just missing ones.
        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record([LEDGER_HEADER])
                .map_err(|source| self.csv_error(source))?;
        }
        for link in links {
            writer
                .write_record([link.as_str()])
                .map_err(|source| self.csv_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))?;

        debug!("Appended links to ledger");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_in(dir: &TempDir) -> CsvLedger {
        CsvLedger::new(dir.path().join("videos.csv"))
    }

    #[test]
    fn load_returns_empty_set_when_file_absent() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        let links = ledger.load_known_links().unwrap();

        assert!(links.is_empty());
    }

    #[test]
    fn append_creates_file_with_header_row() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        ledger
            .append_links(&["https://example.com/watch?v=a".to_string()])
            .unwrap();

        let raw = fs::read_to_string(ledger.path()).unwrap();
        let mut lines = raw.lines();
        assert_eq!(lines.next(), Some(LEDGER_HEADER));
        assert_eq!(lines.next(), Some("https://example.com/watch?v=a"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn append_preserves_existing_rows_and_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        ledger
            .append_links(&["https://example.com/watch?v=a".to_string()])
            .unwrap();
        ledger
            .append_links(&[
                "https://example.com/watch?v=b".to_string(),
                "https://example.com/watch?v=c".to_string(),
            ])
            .unwrap();

        let raw = fs::read_to_string(ledger.path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(
            lines,
            vec![
                LEDGER_HEADER,
                "https://example.com/watch?v=a",
                "https://example.com/watch?v=b",
                "https://example.com/watch?v=c",
            ]
        );
    }

    #[test]
    fn load_roundtrips_appended_links_excluding_header() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);

        let appended = vec![
            "https://example.com/watch?v=a".to_string(),
            "https://example.com/watch?v=b".to_string(),
        ];
        ledger.append_links(&appended).unwrap();

        let links = ledger.load_known_links().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.contains("https://example.com/watch?v=a"));
        assert!(links.contains("https://example.com/watch?v=b"));
        assert!(!links.contains(LEDGER_HEADER));
    }

    #[test]
    fn append_writes_header_to_existing_empty_file() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(ledger.path(), "").unwrap();

        ledger
            .append_links(&["https://example.com/watch?v=a".to_string()])
            .unwrap();

        let raw = fs::read_to_string(ledger.path()).unwrap();
        assert!(raw.starts_with(LEDGER_HEADER));
    }

    #[test]
    fn load_surfaces_io_failure_for_unreadable_path() {
        let dir = TempDir::new().unwrap();
        // A directory where a file is expected forces a read failure.
        let path = dir.path().join("ledger-as-dir");
        fs::create_dir(&path).unwrap();
        let ledger = CsvLedger::new(&path);

        let err = ledger.load_known_links().unwrap_err();
        assert!(matches!(err, LedgerError::Csv { .. } | LedgerError::Io { .. }));
    }

    #[test]
    fn append_surfaces_io_failure_for_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger-as-dir");
        fs::create_dir(&path).unwrap();
        let ledger = CsvLedger::new(&path);

        let err = ledger
            .append_links(&["https://example.com/watch?v=a".to_string()])
            .unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
    }
}
