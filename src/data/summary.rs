use super::aggregate::aggregate_national;
use super::error::PipelineError;
use super::filter::{filter_state, DateRange};
use super::model::{BenefitPoint, Table};

/// Percent change from `start` to `end`.
///
/// A zero `start` yields `0.0`. This is a deliberate reporting policy, not a
/// missing value.
pub fn pct_change(start: f64, end: f64) -> f64 {
    if start != 0.0 {
        (end - start) / start * 100.0
    } else {
        0.0
    }
}

/// First value, last value and percent change of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Change {
    pub start: f64,
    pub end: f64,
    pub pct_change: f64,
}

impl Change {
    pub fn new(start: f64, end: f64) -> Self {
        Change {
            start,
            end,
            pct_change: pct_change(start, end),
        }
    }
}

/// Household and person changes over one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub household: Change,
    pub person: Change,
}

/// Summarize a series using its earliest and latest points by date.
///
/// Ties on the earliest date resolve to the first such point, ties on the
/// latest to the last, so a date-sorted series uses its ends.
pub fn summarize<P: BenefitPoint>(series: &[P]) -> Result<SeriesSummary, PipelineError> {
    let first = series
        .iter()
        .min_by_key(|p| p.date())
        .ok_or(PipelineError::EmptySeries)?;
    let last = series
        .iter()
        .max_by_key(|p| p.date())
        .ok_or(PipelineError::EmptySeries)?;

    Ok(SeriesSummary {
        household: Change::new(first.benperhh(), last.benperhh()),
        person: Change::new(first.benperp(), last.benperp()),
    })
}

// ---------------------------------------------------------------------------
// Comparison – everything the dashboard shows for one selection
// ---------------------------------------------------------------------------

/// State and national summaries for one selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonSummary {
    pub state: SeriesSummary,
    pub national: SeriesSummary,
}

/// Plot-ready series plus summaries for a state over a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub state: String,
    pub range: DateRange,
    /// `(date, benperhh, benperp)` of the selected state.
    pub state_series: Vec<(chrono::NaiveDate, f64, f64)>,
    /// `(date, mean benperhh, mean benperp)` across all states.
    pub national_series: Vec<(chrono::NaiveDate, f64, f64)>,
    /// Months whose national mean covers fewer states than the best-covered
    /// month in range.
    pub partial_months: usize,
    /// `Err(EmptySeries)` when the state has no data in the range.
    pub summary: Result<ComparisonSummary, PipelineError>,
}

fn tuples<P: BenefitPoint>(series: &[P]) -> Vec<(chrono::NaiveDate, f64, f64)> {
    series
        .iter()
        .map(|p| (p.date(), p.benperhh(), p.benperp()))
        .collect()
}

impl Comparison {
    /// Run filter, aggregation and both summaries for one selection.
    pub fn build(table: &Table, state: &str, range: &DateRange) -> Result<Self, PipelineError> {
        let filtered = filter_state(table, state, range);
        let national = aggregate_national(table, range)?;

        // The state series gates the summary: with no state data there is
        // nothing to compare against.
        let summary = summarize(&filtered.records).and_then(|state_summary| {
            Ok(ComparisonSummary {
                state: state_summary,
                national: summarize(&national)?,
            })
        });
        if summary.is_err() {
            log::warn!(
                "No data for {state} between {} and {}",
                range.low(),
                range.high()
            );
        }

        let most = national.iter().map(|p| p.count).max().unwrap_or(0);
        let partial_months = national.iter().filter(|p| p.count < most).count();

        Ok(Comparison {
            state: filtered.state.clone(),
            range: *range,
            state_series: tuples(&filtered.records),
            national_series: tuples(&national),
            partial_months,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::model::tests::{date, raw};
    use crate::data::model::NationalPoint;

    fn scenario() -> Table {
        clean(&[
            raw("AL", 2020, 1, 100.0, 50.0),
            raw("AL", 2020, 2, 110.0, 55.0),
            raw("GA", 2020, 1, 200.0, 90.0),
            raw("GA", 2020, 2, 190.0, 85.0),
        ])
    }

    #[test]
    fn pct_change_policy() {
        assert_eq!(pct_change(100.0, 150.0), 50.0);
        assert_eq!(pct_change(200.0, 150.0), -25.0);
        for end in [0.0, 1.0, -3.5, 1e9] {
            assert_eq!(pct_change(0.0, end), 0.0);
        }
    }

    #[test]
    fn state_and_national_summaries() {
        let table = scenario();
        let range = DateRange::full(&table).unwrap();
        let cmp = Comparison::build(&table, "AL", &range).unwrap();
        let summary = cmp.summary.unwrap();

        assert!((summary.state.household.pct_change - 10.0).abs() < 1e-9);
        assert!((summary.state.person.pct_change - 10.0).abs() < 1e-9);
        assert_eq!(summary.state.household.start, 100.0);
        assert_eq!(summary.state.household.end, 110.0);
        assert_eq!(summary.national.household.pct_change, 0.0);
        assert_eq!(summary.national.person.pct_change, 0.0);

        assert_eq!(
            cmp.state_series,
            vec![(date(2020, 1), 100.0, 50.0), (date(2020, 2), 110.0, 55.0)]
        );
        assert_eq!(
            cmp.national_series,
            vec![(date(2020, 1), 150.0, 70.0), (date(2020, 2), 150.0, 70.0)]
        );
        assert_eq!(cmp.partial_months, 0);
    }

    #[test]
    fn counts_partially_covered_months() {
        let table = clean(&[
            raw("AL", 2020, 1, 100.0, 50.0),
            raw("GA", 2020, 1, 200.0, 90.0),
            raw("AL", 2020, 2, 110.0, 55.0),
        ]);
        let range = DateRange::full(&table).unwrap();
        let cmp = Comparison::build(&table, "GA", &range).unwrap();
        assert_eq!(cmp.partial_months, 1);
        assert_eq!(cmp.national_series[1], (date(2020, 2), 110.0, 55.0));
    }

    #[test]
    fn unknown_state_signals_empty_series() {
        let table = scenario();
        let range = DateRange::full(&table).unwrap();
        let cmp = Comparison::build(&table, "ZZ", &range).unwrap();
        assert!(cmp.state_series.is_empty());
        assert_eq!(cmp.national_series.len(), 2);
        assert_eq!(cmp.summary, Err(PipelineError::EmptySeries));

        let empty: [NationalPoint; 0] = [];
        assert_eq!(summarize(&empty), Err(PipelineError::EmptySeries));
    }

    #[test]
    fn endpoints_follow_date_not_position() {
        let points = vec![
            NationalPoint {
                date: date(2020, 3),
                benperhh: 300.0,
                benperp: 30.0,
                count: 1,
            },
            NationalPoint {
                date: date(2020, 1),
                benperhh: 100.0,
                benperp: 10.0,
                count: 1,
            },
        ];
        let s = summarize(&points).unwrap();
        assert_eq!(s.household, Change::new(100.0, 300.0));
        assert_eq!(s.person.pct_change, 200.0);
    }

    #[test]
    fn single_point_has_no_change() {
        let table = clean(&[raw("AL", 2020, 1, 100.0, 50.0)]);
        let range = DateRange::full(&table).unwrap();
        let summary = Comparison::build(&table, "AL", &range)
            .unwrap()
            .summary
            .unwrap();
        assert_eq!(summary.state.household, Change::new(100.0, 100.0));
        assert_eq!(summary.state.household.pct_change, 0.0);
    }
}
