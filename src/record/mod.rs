//! History records
//!
//! A record is one line of history: a stopwatch run (`date | duration | label`)
//! or a completed Pomodoro phase (`date | Focus`). Stopwatch records are filed
//! under a [`Category`]; Pomodoro records are not.

pub mod format;
pub mod store;

pub use format::{is_valid_line, parse_line, LineError};
pub use store::{AddOutcome, LoadReport, RecordStore, StoreError};

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest label accepted on a stopwatch record, in characters
pub const MAX_LABEL_CHARS: usize = 10;

/// Separator between the fields of a formatted record
pub const FIELD_SEPARATOR: &str = " | ";

/// Date format used in history files (DD/MM/YYYY)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Stopwatch record category
///
/// The set is closed; declaration order is the order categories are shown
/// and written to history files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Work,
    Study,
    Exercise,
    Other,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 4] = [
        Category::Work,
        Category::Study,
        Category::Exercise,
        Category::Other,
    ];

    /// Name as written to history files
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Exercise => "Exercise",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not one of [`Category::ALL`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Key of one ordered sequence of records inside a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Stopwatch records filed under a category
    Category(Category),
    /// Pomodoro phase records
    Uncategorised,
}

impl Bucket {
    /// Category for this bucket, if it has one
    pub fn category(self) -> Option<Category> {
        match self {
            Bucket::Category(c) => Some(c),
            Bucket::Uncategorised => None,
        }
    }
}

impl From<Category> for Bucket {
    fn from(c: Category) -> Self {
        Bucket::Category(c)
    }
}

/// Which timer a store (and its history file) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `date | duration | label<TAB>category`, one bucket per category,
    /// duplicates rejected
    Stopwatch,
    /// `date | phase`, a single bucket, repeats allowed
    Pomodoro,
}

impl StoreKind {
    /// Human-readable name for dialogs and logs
    pub fn display_name(self) -> &'static str {
        match self {
            StoreKind::Stopwatch => "stopwatch",
            StoreKind::Pomodoro => "pomodoro",
        }
    }
}

/// Pomodoro phase label as written by the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLabel {
    Focus,
    Break,
}

impl PhaseLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseLabel::Focus => "Focus",
            PhaseLabel::Break => "Break",
        }
    }
}

/// One history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Calendar date in DD/MM/YYYY form
    pub date: String,
    /// Run length in HH:MM:SS form (stopwatch records only)
    pub duration: Option<String>,
    /// Free-text label (stopwatch) or phase name (Pomodoro)
    pub label: String,
}

impl Record {
    /// Build a stopwatch record
    pub fn stopwatch(
        date: impl Into<String>,
        duration: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            duration: Some(duration.into()),
            label: label.into(),
        }
    }

    /// Build a Pomodoro phase record
    pub fn phase(date: impl Into<String>, phase: PhaseLabel) -> Self {
        Self {
            date: date.into(),
            duration: None,
            label: phase.as_str().to_string(),
        }
    }

    /// Same record with a different label
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            date: self.date.clone(),
            duration: self.duration.clone(),
            label: label.into(),
        }
    }

    /// Formatted form used for display, duplicate detection and files
    pub fn formatted(&self) -> String {
        match &self.duration {
            Some(duration) => [self.date.as_str(), duration.as_str(), self.label.as_str()]
                .join(FIELD_SEPARATOR),
            None => [self.date.as_str(), self.label.as_str()].join(FIELD_SEPARATOR),
        }
    }

    /// Parsed calendar date, if the date field is a real date
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Today's date in history-file form
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Whether a label has between 1 and [`MAX_LABEL_CHARS`] characters and
/// none of the characters the line format splits on
pub fn is_valid_label(label: &str) -> bool {
    let count = label.chars().count();
    (1..=MAX_LABEL_CHARS).contains(&count) && !label.contains(&['|', '\n', '\r', '\t'][..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("work".parse::<Category>().is_err());
        assert!("Leisure".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert_eq!(Category::ALL[0], Category::Work);
    }

    #[test]
    fn test_record_formatted() {
        let record = Record::stopwatch("05/03/2024", "00:25:00", "coding");
        assert_eq!(record.formatted(), "05/03/2024 | 00:25:00 | coding");

        let phase = Record::phase("05/03/2024", PhaseLabel::Focus);
        assert_eq!(phase.to_string(), "05/03/2024 | Focus");
    }

    #[test]
    fn test_record_with_label_keeps_other_fields() {
        let record = Record::stopwatch("05/03/2024", "00:25:00", "coding");
        let renamed = record.with_label("reading");
        assert_eq!(renamed.date, record.date);
        assert_eq!(renamed.duration, record.duration);
        assert_eq!(renamed.label, "reading");
    }

    #[test]
    fn test_is_valid_label() {
        assert!(is_valid_label("a"));
        assert!(is_valid_label("0123456789"));
        assert!(is_valid_label("éééééééééé"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("01234567890"));
        assert!(!is_valid_label("tab\there"));
        assert!(!is_valid_label("a | b"));
        assert!(!is_valid_label("a|b"));
    }

    #[test]
    fn test_today_matches_date_format() {
        let date = today();
        assert!(NaiveDate::parse_from_str(&date, DATE_FORMAT).is_ok());
        assert_eq!(date.len(), 10);
    }

    #[test]
    fn test_naive_date() {
        let record = Record::stopwatch("31/12/2023", "00:00:01", "x");
        assert_eq!(record.naive_date(), NaiveDate::from_ymd_opt(2023, 12, 31));
        let bogus = Record::stopwatch("99/99/9999", "00:00:01", "x");
        assert_eq!(bogus.naive_date(), None);
    }
}
