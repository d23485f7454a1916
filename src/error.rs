use chrono::NaiveDate;
use serde_json::Error as SerdeJsonError;
use std::io;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Invariant violations detected while building calendars, periods or options.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("working rate {rate} for '{user_id}' must be between 0 and 1")]
    InvalidWorkingRate { user_id: String, rate: f64 },

    #[error("standard working hours must be positive (got {0})")]
    InvalidStandardHours(f64),

    #[error("period end {end} precedes its start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("hour total must be a non-negative number (got {0})")]
    InvalidHours(f64),

    #[error("max scan days must be at least 1")]
    InvalidScanHorizon,

    #[error("invalid calculation options: {0}")]
    Config(#[from] SerdeJsonError),
}

pub type CalendarResult<T> = Result<T, CalendarError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("export produced invalid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
