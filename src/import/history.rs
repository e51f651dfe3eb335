//! The append-only import log.
//!
//! One line per copied file:
//! `<YYYY-MM-DD HH:MM:SS> | <absolute source> -> <absolute target>`.
//! The file is opened, appended and closed for every entry and is never
//! rewritten.

use crate::constants::LOG_TIMESTAMP_FORMAT;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLogEntry {
    pub timestamp: NaiveDateTime,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl ImportLogEntry {
    /// Entry stamped with the current local time. Relative paths are made absolute.
    pub fn now(source: &Path, target: &Path) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            source: absolute(source),
            target: absolute(target),
        }
    }

    pub fn parse_line(line: &str) -> Option<Self> {
        let (timestamp, paths) = line.split_once(" | ")?;
        let (source, target) = paths.split_once(" -> ")?;
        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), LOG_TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            timestamp,
            source: PathBuf::from(source),
            target: PathBuf::from(target.trim_end_matches(['\r', '\n'])),
        })
    }
}

impl fmt::Display for ImportLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} -> {}",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.source.display(),
            self.target.display()
        )
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Debug, Clone)]
pub struct ImportLog {
    path: PathBuf,
}

impl ImportLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &ImportLogEntry) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{entry}")
    }

    /// All well-formed entries in file order. A missing log has no entries.
    pub fn read_entries(&self) -> io::Result<Vec<ImportLogEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(contents
            .lines()
            .filter_map(|line| {
                let entry = ImportLogEntry::parse_line(line);
                if entry.is_none() && !line.trim().is_empty() {
                    log::debug!("Skipping malformed import log line: {line}");
                }
                entry
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_line_format() {
        let entry = ImportLogEntry {
            timestamp: NaiveDateTime::parse_from_str("2024-05-01 12:30:00", LOG_TIMESTAMP_FORMAT)
                .unwrap(),
            source: PathBuf::from("/in/a.mp3"),
            target: PathBuf::from("/lib/A - B - 01 - C.mp3"),
        };
        assert_eq!(
            entry.to_string(),
            "2024-05-01 12:30:00 | /in/a.mp3 -> /lib/A - B - 01 - C.mp3"
        );
        assert_eq!(ImportLogEntry::parse_line(&entry.to_string()), Some(entry));
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        assert!(ImportLogEntry::parse_line("").is_none());
        assert!(ImportLogEntry::parse_line("not a log line").is_none());
        assert!(ImportLogEntry::parse_line("yesterday | /a -> /b").is_none());
    }

    #[test]
    fn test_append_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let log = ImportLog::new(temp_dir.path().join("nested").join("import.log"));
        assert!(log.read_entries().unwrap().is_empty());

        log.append(&ImportLogEntry::now(Path::new("/in/1.mp3"), Path::new("/out/1.mp3")))
            .unwrap();
        log.append(&ImportLogEntry::now(Path::new("/in/2.mp3"), Path::new("/out/2.mp3")))
            .unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.ends_with('\n'));

        let entries = log.read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].source, PathBuf::from("/in/2.mp3"));
        assert_eq!(entries[1].target, PathBuf::from("/out/2.mp3"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let entry = ImportLogEntry::now(Path::new("rel/a.mp3"), Path::new("/abs/b.mp3"));
        assert!(entry.source.is_absolute());
    }
}
