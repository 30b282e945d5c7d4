//! Append-only CSV audit log of recognition events.
//!
//! Schema is fixed: `timestamp,name,confidence,image_filename`. The header
//! is written exactly once, when the file is first created. Every append is
//! one complete row in a single write, so a concurrent reader sees whole
//! rows or nothing.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column header, written once at file creation.
pub const CSV_HEADER: &str = "timestamp,name,confidence,image_filename";

/// Number of raw lines [`AuditLog::tail`] callers show by default.
pub const DEFAULT_TAIL_LINES: usize = 10;

/// Timestamp format used in log rows.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log I/O at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed audit row ({fields} field(s)): {line}")]
    MalformedRow { line: String, fields: usize },
}

/// One audit row.
///
/// Fields hold the exact strings that go to disk, so append → parse
/// round-trips byte-for-byte and confidence stays at its fixed two-decimal
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    /// Identity name, or "Unknown".
    pub name: String,
    /// Match confidence, two decimals (may be negative).
    pub confidence: String,
    /// Evidence image filename this row refers to.
    pub image_filename: String,
}

impl LogRecord {
    /// Build a record for `name` at `confidence`, stamped at `time`.
    pub fn new(time: &DateTime<Local>, name: &str, confidence: f32, image_filename: &str) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            name: name.to_string(),
            confidence: format!("{confidence:.2}"),
            image_filename: image_filename.to_string(),
        }
    }

    /// Render as one CSV row (no trailing newline).
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{}",
            csv_escape(&self.timestamp),
            csv_escape(&self.name),
            csv_escape(&self.confidence),
            csv_escape(&self.image_filename),
        )
    }

    /// Parse one data row produced by [`to_csv_row`](Self::to_csv_row).
    pub fn parse_line(line: &str) -> Result<Self, AuditError> {
        let fields = split_csv_line(line);
        let count = fields.len();
        let [timestamp, name, confidence, image_filename]: [String; 4] =
            fields.try_into().map_err(|_| AuditError::MalformedRow {
                line: line.to_string(),
                fields: count,
            })?;
        Ok(Self { timestamp, name, confidence, image_filename })
    }
}

/// Handle to the CSV audit log file.
///
/// Holds only the path. Every append opens, writes one row, flushes, and
/// closes, so no handle outlives a tick and an interrupted process never
/// leaves a partially buffered record.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Open the log at `path`, creating it with the header row if absent.
    ///
    /// Opening an existing log never truncates it and never writes a second
    /// header.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| AuditError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(format!("{CSV_HEADER}\n").as_bytes())
                    .and_then(|()| file.flush())
                    .map_err(|source| io_err(&path, source))?;
                tracing::info!(path = %path.display(), "created audit log");
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(source) => return Err(io_err(&path, source)),
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single complete row.
    pub fn append(&self, record: &LogRecord) -> Result<(), AuditError> {
        let row = format!("{}\n", record.to_csv_row());
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|source| io_err(&self.path, source))?;
        file.write_all(row.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| io_err(&self.path, source))?;
        tracing::debug!(name = %record.name, confidence = %record.confidence, "appended audit row");
        Ok(())
    }

    /// Last `n` raw lines, oldest first. The header counts as a line when it
    /// is within range; no parsing is applied.
    pub fn tail(&self, n: usize) -> Result<Vec<String>, AuditError> {
        let text =
            std::fs::read_to_string(&self.path).map_err(|source| io_err(&self.path, source))?;
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|s| s.to_string()).collect())
    }

    /// The whole log as raw bytes (download surface).
    pub fn export(&self) -> Result<Vec<u8>, AuditError> {
        std::fs::read(&self.path).map_err(|source| io_err(&self.path, source))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> AuditError {
    AuditError::Io { path: path.display().to_string(), source }
}

/// Minimal CSV field escaping (wraps in quotes if needed).
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Split one CSV line into fields, honoring quoted fields with doubled quotes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
