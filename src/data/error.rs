use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the load → clean → filter → aggregate → summarize
/// pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The source is missing, unreadable or malformed. Fatal for a load.
    #[error("cannot read {}: {reason}", path.display())]
    SourceRead { path: PathBuf, reason: String },

    #[error("date range is reversed: {low} is after {high}")]
    InvalidRange { low: NaiveDate, high: NaiveDate },

    /// A national mean was requested for a date with no records.
    #[error("no records to average for {0}")]
    EmptyGroup(NaiveDate),

    /// The selection contains no records. Recoverable: shown to the user.
    #[error("no data for selection")]
    EmptySeries,
}

// ---------------------------------------------------------------------------
// Row rejections (absorbed by the cleaner)
// ---------------------------------------------------------------------------

/// Why the cleaner dropped a source row.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    #[error("'{field}' is negative ({value})")]
    NegativeBenefit { field: &'static str, value: f64 },

    #[error("no calendar month for year {year:?}, month {monthno:?}")]
    InvalidDate {
        year: Option<i64>,
        monthno: Option<i64>,
    },
}

impl Rejection {
    /// Short stable label used to bucket drop counts.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::MissingField(_) => "missing field",
            Rejection::NegativeBenefit { .. } => "negative benefit",
            Rejection::InvalidDate { .. } => "invalid date",
        }
    }
}
