//! In-memory record store with flat-file persistence
//!
//! Records are kept in ordered buckets: one per [`Category`] for the
//! stopwatch history (seeded in declaration order), a single uncategorised
//! bucket for the Pomodoro history. Files are read and written wholesale.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;

use super::format::{is_writer_phase_line, parse_line, serialize_line};
use super::{is_valid_label, Bucket, Category, Record, StoreKind};
use crate::prompt::{Answer, Prompter};

/// Default number of replacement labels requested before giving up
pub const DEFAULT_MAX_LABEL_ATTEMPTS: u32 = 3;

/// Error type for record store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Label must be between 1 and 10 characters and cannot contain '|'.")]
    InvalidLabel,
    #[error("Duplicate label, please try again.")]
    DuplicateRecord,
    #[error("Cannot save empty list.")]
    EmptySave,
    #[error("No useful records found on file.")]
    NoUsefulRecords,
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("{bucket:?} records do not belong in the {kind} history")]
    WrongBucket { bucket: Bucket, kind: &'static str },
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("could not access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// Short heading for an error dialog
    pub fn title(&self) -> &'static str {
        match self {
            StoreError::InvalidLabel => "Invalid label",
            StoreError::DuplicateRecord => "Duplicate label",
            StoreError::EmptySave => "Empty save",
            StoreError::NoUsefulRecords | StoreError::FileNotFound { .. } => "Error",
            StoreError::WrongBucket { .. } | StoreError::RecordNotFound(_) => "Error",
            StoreError::Io { .. } => "File error",
        }
    }

    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result of an interactive add
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The record (possibly relabelled) was stored
    Added(Record),
    /// The user cancelled the replacement-label prompt
    Cancelled,
}

/// Summary of a file import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines that became records
    pub imported: usize,
    /// Lines rejected as invalid, duplicate or uncategorised
    pub skipped: usize,
    /// Skipped Pomodoro lines in the `Focus`/`Break` form the timer writes
    pub writer_phase_lines: usize,
}

/// Records for one timer, grouped into buckets
#[derive(Debug, Clone)]
pub struct RecordStore {
    kind: StoreKind,
    buckets: IndexMap<Bucket, Vec<Record>>,
    max_label_attempts: u32,
}

impl RecordStore {
    /// Create an empty store with its buckets seeded in display order
    pub fn new(kind: StoreKind) -> Self {
        let mut buckets = IndexMap::new();
        match kind {
            StoreKind::Stopwatch => {
                for category in Category::ALL {
                    buckets.insert(Bucket::Category(category), Vec::new());
                }
            }
            StoreKind::Pomodoro => {
                buckets.insert(Bucket::Uncategorised, Vec::new());
            }
        }
        Self {
            kind,
            buckets,
            max_label_attempts: DEFAULT_MAX_LABEL_ATTEMPTS,
        }
    }

    /// Set how many replacement labels [`RecordStore::add`] asks for
    pub fn with_max_label_attempts(mut self, attempts: u32) -> Self {
        self.max_label_attempts = attempts.max(1);
        self
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    /// Total number of records across buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Records in one bucket, in insertion order
    pub fn bucket(&self, bucket: Bucket) -> &[Record] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in display order, including empty ones
    pub fn buckets(&self) -> impl Iterator<Item = (Bucket, &[Record])> {
        self.buckets.iter().map(|(b, records)| (*b, records.as_slice()))
    }

    /// Every record with its bucket, in file order
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &Record)> {
        self.buckets
            .iter()
            .flat_map(|(b, records)| records.iter().map(move |r| (*b, r)))
    }

    /// Record at a position in file order
    pub fn nth(&self, index: usize) -> Option<(Bucket, &Record)> {
        self.iter().nth(index)
    }

    /// Whether `bucket` can hold records of this store's kind
    pub fn accepts(&self, bucket: Bucket) -> bool {
        self.buckets.contains_key(&bucket)
    }

    /// True iff the exact formatted record already exists in `bucket`
    ///
    /// Pomodoro stores never report duplicates: every phase completed on
    /// the same day formats identically.
    pub fn is_duplicate(&self, record: &Record, bucket: Bucket) -> bool {
        if self.kind == StoreKind::Pomodoro {
            return false;
        }
        let formatted = record.formatted();
        self.bucket(bucket).iter().any(|r| r.formatted() == formatted)
    }

    /// Append a record without asking the user anything
    pub fn insert(&mut self, record: Record, bucket: Bucket) -> Result<(), StoreError> {
        self.check_bucket(bucket)?;
        if self.is_duplicate(&record, bucket) {
            return Err(StoreError::DuplicateRecord);
        }
        self.push(record, bucket);
        Ok(())
    }

    /// Append a record, asking for a replacement label while it duplicates
    /// an existing one
    ///
    /// Empty, over-long and still-duplicate labels are rejected. After
    /// `max_label_attempts` rejected labels the add fails with
    /// [`StoreError::DuplicateRecord`].
    pub fn add(
        &mut self,
        record: Record,
        bucket: Bucket,
        prompter: &mut dyn Prompter,
    ) -> Result<AddOutcome, StoreError> {
        self.check_bucket(bucket)?;
        if !self.is_duplicate(&record, bucket) {
            self.push(record.clone(), bucket);
            return Ok(AddOutcome::Added(record));
        }

        tracing::debug!("Duplicate {} record: {}", self.kind.display_name(), record);
        prompter.show_error(
            StoreError::DuplicateRecord.title(),
            &StoreError::DuplicateRecord.to_string(),
        );

        for _ in 0..self.max_label_attempts {
            let label = match prompter.ask_text("New label", "Please enter new label:") {
                Answer::Given(label) => label,
                Answer::Cancelled => return Ok(AddOutcome::Cancelled),
            };

            if !is_valid_label(&label) {
                let err = StoreError::InvalidLabel;
                prompter.show_error(err.title(), &err.to_string());
                continue;
            }

            let candidate = record.with_label(label);
            if self.is_duplicate(&candidate, bucket) {
                let err = StoreError::DuplicateRecord;
                prompter.show_error(err.title(), &err.to_string());
                continue;
            }

            self.push(candidate.clone(), bucket);
            return Ok(AddOutcome::Added(candidate));
        }

        tracing::warn!(
            "Gave up relabelling duplicate record after {} attempts",
            self.max_label_attempts
        );
        Err(StoreError::DuplicateRecord)
    }

    /// Remove a record from its bucket
    ///
    /// Returns whether the store is now empty.
    pub fn delete(&mut self, record: &Record, bucket: Bucket) -> Result<bool, StoreError> {
        let records = self
            .buckets
            .get_mut(&bucket)
            .ok_or_else(|| StoreError::RecordNotFound(record.formatted()))?;
        let pos = records
            .iter()
            .position(|r| r == record)
            .ok_or_else(|| StoreError::RecordNotFound(record.formatted()))?;
        records.remove(pos);
        tracing::debug!("Deleted {} record: {}", self.kind.display_name(), record);
        Ok(self.is_empty())
    }

    /// Import records from a history file
    ///
    /// A line is imported when it parses, names a known category (stopwatch)
    /// and is not a duplicate. Importing nothing is reported as
    /// [`StoreError::NoUsefulRecords`]; the records already in the store are
    /// untouched either way.
    pub fn load(&mut self, path: &Path) -> Result<LoadReport, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::from_io(path, e))?;
        let mut report = LoadReport::default();

        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            match parse_line(self.kind, line) {
                Ok((record, bucket)) if !self.is_duplicate(&record, bucket) => {
                    self.push(record, bucket);
                    report.imported += 1;
                }
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    if self.kind == StoreKind::Pomodoro && is_writer_phase_line(line) {
                        report.writer_phase_lines += 1;
                    }
                    tracing::debug!("Skipping history line {:?}: {}", line, e);
                    report.skipped += 1;
                }
            }
        }

        if report.writer_phase_lines > 0 {
            tracing::warn!(
                "Skipped {} pomodoro lines written as Focus/Break in {}; the loader only accepts work/break",
                report.writer_phase_lines,
                path.display()
            );
        }

        tracing::info!(
            "Loaded {} {} records from {} ({} skipped)",
            report.imported,
            self.kind.display_name(),
            path.display(),
            report.skipped
        );

        if report.imported == 0 {
            return Err(StoreError::NoUsefulRecords);
        }
        Ok(report)
    }

    /// Write every record to `path`, replacing the file atomically
    ///
    /// Returns the number of records written.
    pub fn save(&self, path: &Path) -> Result<usize, StoreError> {
        if self.is_empty() {
            return Err(StoreError::EmptySave);
        }

        let mut content = String::new();
        for (bucket, record) in self.iter() {
            content.push_str(&serialize_line(record, bucket));
            content.push('\n');
        }

        atomic_write(path, content.as_bytes()).map_err(|e| StoreError::from_io(path, e))?;

        let count = self.len();
        tracing::info!(
            "Saved {} {} records to {}",
            count,
            self.kind.display_name(),
            path.display()
        );
        Ok(count)
    }

    fn check_bucket(&self, bucket: Bucket) -> Result<(), StoreError> {
        if self.accepts(bucket) {
            Ok(())
        } else {
            Err(StoreError::WrongBucket {
                bucket,
                kind: self.kind.display_name(),
            })
        }
    }

    fn push(&mut self, record: Record, bucket: Bucket) {
        self.buckets.entry(bucket).or_default().push(record);
    }
}

/// Write `content` to `path` atomically using a temp file + rename
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
