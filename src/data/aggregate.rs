use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::PipelineError;
use super::filter::DateRange;
use super::model::{NationalPoint, NationalSeries, Table};

#[derive(Default)]
struct Sums {
    benperhh: f64,
    benperp: f64,
    count: usize,
}

fn mean(sum: f64, count: usize, date: NaiveDate) -> Result<f64, PipelineError> {
    if count == 0 {
        return Err(PipelineError::EmptyGroup(date));
    }
    Ok(sum / count as f64)
}

/// Per-month mean of both benefits across every state in `range`.
///
/// Months without records are absent rather than zero. A month covered by
/// only some states is averaged over the records present.
pub fn aggregate_national(table: &Table, range: &DateRange) -> Result<NationalSeries, PipelineError> {
    let mut groups: BTreeMap<NaiveDate, Sums> = BTreeMap::new();
    for rec in table.records().iter().filter(|r| range.contains(r.date)) {
        let sums = groups.entry(rec.date).or_default();
        sums.benperhh += rec.benperhh;
        sums.benperp += rec.benperp;
        sums.count += 1;
    }

    groups
        .into_iter()
        .map(|(date, sums)| {
            Ok(NationalPoint {
                date,
                benperhh: mean(sums.benperhh, sums.count, date)?,
                benperp: mean(sums.benperp, sums.count, date)?,
                count: sums.count,
            })
        })
        .collect()
}
