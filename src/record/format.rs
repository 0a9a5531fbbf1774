//! History file line grammar
//!
//! Stopwatch lines: `DD/MM/YYYY | HH:MM:SS | label<TAB>Category`
//! Pomodoro lines:  `DD/MM/YYYY | work` or `DD/MM/YYYY | break`
//!
//! The Pomodoro timer itself writes `Focus`/`Break`, which this grammar does
//! not accept. [`is_writer_phase_line`] recognises those lines so the loader
//! can report how many it skipped.

use std::sync::OnceLock;

use regex::Regex;

use super::{Bucket, Category, PhaseLabel, Record, StoreKind, FIELD_SEPARATOR};

/// Why a history line was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected {expected} fields separated by \" | \", found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid date: {0}")]
    Date(String),
    #[error("invalid duration: {0}")]
    Duration(String),
    #[error("invalid label: {0}")]
    Label(String),
    #[error("missing tab-separated category")]
    MissingCategory,
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("date pattern is valid"))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("duration pattern is valid"))
}

fn stopwatch_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.{1,10}$").expect("label pattern is valid"))
}

fn phase_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(break|work)$").expect("phase pattern is valid"))
}

/// Parse the formatted part of a line (everything before the TAB)
pub fn parse_record(kind: StoreKind, formatted: &str) -> Result<Record, LineError> {
    let fields: Vec<&str> = formatted.split(FIELD_SEPARATOR).collect();
    let expected = match kind {
        StoreKind::Stopwatch => 3,
        StoreKind::Pomodoro => 2,
    };
    if fields.len() != expected {
        return Err(LineError::FieldCount {
            expected,
            found: fields.len(),
        });
    }

    let date = fields[0];
    if !date_re().is_match(date) {
        return Err(LineError::Date(date.to_string()));
    }

    match kind {
        StoreKind::Stopwatch => {
            let (duration, label) = (fields[1], fields[2]);
            if !duration_re().is_match(duration) {
                return Err(LineError::Duration(duration.to_string()));
            }
            if !stopwatch_label_re().is_match(label) {
                return Err(LineError::Label(label.to_string()));
            }
            Ok(Record::stopwatch(date, duration, label))
        }
        StoreKind::Pomodoro => {
            let label = fields[1];
            if !phase_label_re().is_match(label) {
                return Err(LineError::Label(label.to_string()));
            }
            Ok(Record {
                date: date.to_string(),
                duration: None,
                label: label.to_string(),
            })
        }
    }
}

/// Whether the formatted part of a line satisfies the grammar for `kind`
pub fn is_valid_line(kind: StoreKind, formatted: &str) -> bool {
    parse_record(kind, formatted).is_ok()
}

/// Parse one full history-file line into a record and the bucket it
/// belongs in
pub fn parse_line(kind: StoreKind, line: &str) -> Result<(Record, Bucket), LineError> {
    match kind {
        StoreKind::Stopwatch => {
            let (formatted, category) = line.split_once('\t').ok_or(LineError::MissingCategory)?;
            let record = parse_record(kind, formatted)?;
            let category: Category = category
                .parse()
                .map_err(|_| LineError::UnknownCategory(category.to_string()))?;
            Ok((record, Bucket::Category(category)))
        }
        StoreKind::Pomodoro => Ok((parse_record(kind, line)?, Bucket::Uncategorised)),
    }
}

/// Serialize a record for its history file (no trailing newline)
pub fn serialize_line(record: &Record, bucket: Bucket) -> String {
    match bucket {
        Bucket::Category(category) => format!("{}\t{}", record.formatted(), category),
        Bucket::Uncategorised => record.formatted(),
    }
}

/// Whether a Pomodoro line was written by the timer (`Focus`/`Break`)
/// rather than in the loadable `work`/`break` form
pub fn is_writer_phase_line(line: &str) -> bool {
    match line.split_once(FIELD_SEPARATOR) {
        Some((date, label)) => {
            date_re().is_match(date)
                && (label == PhaseLabel::Focus.as_str() || label == PhaseLabel::Break.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_stopwatch_lines() {
        assert!(is_valid_line(StoreKind::Stopwatch, "05/03/2024 | 00:25:00 | coding"));
        assert!(is_valid_line(StoreKind::Stopwatch, "05/03/2024 | 99:59:59 | 0123456789"));
    }

    #[test]
    fn test_invalid_stopwatch_lines() {
        let kind = StoreKind::Stopwatch;
        assert!(!is_valid_line(kind, "05/03/2024 | 00:25:00"));
        assert!(!is_valid_line(kind, "5/3/2024 | 00:25:00 | coding"));
        assert!(!is_valid_line(kind, "05/03/2024 | 0:25:00 | coding"));
        assert!(!is_valid_line(kind, "05/03/2024 | 00:25:00 | "));
        assert!(!is_valid_line(kind, "05/03/2024 | 00:25:00 | 01234567890"));
        assert!(!is_valid_line(kind, "05/03/2024 | 00:25:00 | a | b"));
    }

    #[test]
    fn test_pomodoro_grammar() {
        let kind = StoreKind::Pomodoro;
        assert!(is_valid_line(kind, "05/03/2024 | work"));
        assert!(is_valid_line(kind, "05/03/2024 | break"));
        assert!(!is_valid_line(kind, "05/03/2024 | Focus"));
        assert!(!is_valid_line(kind, "05/03/2024 | Break"));
        assert!(!is_valid_line(kind, "05/03/2024 | work | extra"));
    }

    #[test]
    fn test_field_count_error() {
        assert_eq!(
            parse_record(StoreKind::Stopwatch, "05/03/2024 | coding"),
            Err(LineError::FieldCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_parse_line_with_category() {
        let (record, bucket) =
            parse_line(StoreKind::Stopwatch, "05/03/2024 | 00:10:00 | run\tExercise").unwrap();
        assert_eq!(record, Record::stopwatch("05/03/2024", "00:10:00", "run"));
        assert_eq!(bucket, Bucket::Category(Category::Exercise));
    }

    #[test]
    fn test_parse_line_missing_tab() {
        assert_eq!(
            parse_line(StoreKind::Stopwatch, "05/03/2024 | 00:10:00 | run Exercise"),
            Err(LineError::MissingCategory)
        );
    }

    #[test]
    fn test_parse_line_unknown_category() {
        assert_eq!(
            parse_line(StoreKind::Stopwatch, "05/03/2024 | 00:10:00 | run\tLeisure"),
            Err(LineError::UnknownCategory("Leisure".to_string()))
        );
    }

    #[test]
    fn test_serialize_line() {
        let record = Record::stopwatch("05/03/2024", "00:25:00", "coding");
        assert_eq!(
            serialize_line(&record, Bucket::Category(Category::Work)),
            "05/03/2024 | 00:25:00 | coding\tWork"
        );

        let phase = Record::phase("05/03/2024", PhaseLabel::Break);
        assert_eq!(serialize_line(&phase, Bucket::Uncategorised), "05/03/2024 | Break");
    }

    #[test]
    fn test_is_writer_phase_line() {
        assert!(is_writer_phase_line("05/03/2024 | Focus"));
        assert!(is_writer_phase_line("05/03/2024 | Break"));
        assert!(!is_writer_phase_line("05/03/2024 | work"));
        assert!(!is_writer_phase_line("garbage"));
    }
}
