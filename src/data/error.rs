use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or validating the observation snapshot
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv record: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: unparseable date {value:?} (expected day-first)")]
    BadDate { line: u64, value: String },
    #[error("duplicate observation for {country} on {date}")]
    Duplicate { country: String, date: NaiveDate },
    #[error("dataset needs at least two distinct dates, found {0}")]
    TooFewDates(usize),
}
