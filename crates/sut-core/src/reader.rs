//! Reading per-day activity logs from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::LogRow;

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed log header: {0}")]
    Csv(#[from] csv::Error),
}

impl LogError {
    /// Whether the log file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Locates and reads the `YYYY-MM-DD.csv` logs in one directory.
#[derive(Debug, Clone)]
pub struct LogReader {
    logs_dir: PathBuf,
}

impl LogReader {
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
        }
    }

    /// Path of the log for `date`.
    pub fn log_path(&self, date: NaiveDate) -> PathBuf {
        self.logs_dir.join(format!("{}.csv", date.format("%Y-%m-%d")))
    }

    /// Reads every row of the log for `date`, in file order.
    pub fn read_day(&self, date: NaiveDate) -> Result<Vec<LogRow>, LogError> {
        read_rows(&self.log_path(date))
    }
}

/// Reads a whole log file and parses its rows.
///
/// The file is read in one go so the handle is released before any
/// parsing starts.
pub fn read_rows(path: &Path) -> Result<Vec<LogRow>, LogError> {
    let bytes = fs::read(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(&String::from_utf8_lossy(&bytes))
}

/// Parses CSV content with a header row into log rows.
///
/// A leading byte-order mark is ignored. Columns are matched by header name;
/// missing columns and short rows read as empty. Rows that fail to decode are
/// skipped, only an unreadable header is an error.
pub fn parse_rows(content: &str) -> Result<Vec<LogRow>, LogError> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());
    let columns = Columns::from_headers(reader.headers()?);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(columns.row(&record)),
            Err(err) => tracing::trace!(row = index + 1, error = %err, "skipping undecodable row"),
        }
    }
    Ok(rows)
}

/// Positions of the known columns within the header row.
#[derive(Debug, Default)]
struct Columns {
    start: Option<usize>,
    end: Option<usize>,
    duration_sec: Option<usize>,
    process: Option<usize>,
    title: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|header| header == name);
        Self {
            start: position("start"),
            end: position("end"),
            duration_sec: position("duration_sec"),
            process: position("process"),
            title: position("title"),
        }
    }

    fn row(&self, record: &csv::StringRecord) -> LogRow {
        let field = |column: Option<usize>| {
            column
                .and_then(|index| record.get(index))
                .unwrap_or_default()
                .to_string()
        };
        LogRow {
            start: field(self.start),
            end: field(self.end),
            duration_sec: field(self.duration_sec),
            process: field(self.process),
            title: field(self.title),
        }
    }
}
