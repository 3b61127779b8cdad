use chrono::NaiveDate;

use super::error::PipelineError;
use super::model::{FilteredSeries, Table};

// ---------------------------------------------------------------------------
// DateRange – inclusive month interval
// ---------------------------------------------------------------------------

/// Inclusive `[low, high]` date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    low: NaiveDate,
    high: NaiveDate,
}

impl DateRange {
    pub fn new(low: NaiveDate, high: NaiveDate) -> Result<Self, PipelineError> {
        if low > high {
            return Err(PipelineError::InvalidRange { low, high });
        }
        Ok(DateRange { low, high })
    }

    /// The whole span of `table`, `None` when it has no records.
    pub fn full(table: &Table) -> Option<Self> {
        table
            .date_bounds()
            .map(|(low, high)| DateRange { low, high })
    }

    pub fn low(&self) -> NaiveDate {
        self.low
    }

    pub fn high(&self) -> NaiveDate {
        self.high
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.low <= date && date <= self.high
    }
}

// ---------------------------------------------------------------------------
// State filter
// ---------------------------------------------------------------------------

/// Records of `state` whose month lies in `range`, ascending by date.
///
/// An unknown state yields an empty series. Records sharing a date keep
/// their source order.
pub fn filter_state<'a>(table: &'a Table, state: &str, range: &DateRange) -> FilteredSeries<'a> {
    let mut records: Vec<_> = table
        .records()
        .iter()
        .filter(|r| r.state.as_deref() == Some(state) && range.contains(r.date))
        .collect();
    records.sort_by_key(|r| r.date);

    FilteredSeries {
        state: state.to_string(),
        records,
    }
}
