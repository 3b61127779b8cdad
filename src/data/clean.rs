use std::collections::BTreeMap;

use super::model::{RawRecord, Record, Table};

/// Outcome counts of one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub kept: usize,
    /// Rejection kind → number of rows dropped for it.
    pub dropped: BTreeMap<&'static str, usize>,
}

impl CleanReport {
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}

/// Drop rows with missing required fields, negative benefits or no valid
/// month, keeping source order.
pub fn clean(rows: &[RawRecord]) -> Table {
    clean_with_report(rows).0
}

/// [`clean`], also reporting what was dropped and why.
pub fn clean_with_report(rows: &[RawRecord]) -> (Table, CleanReport) {
    let mut report = CleanReport::default();
    let mut records = Vec::with_capacity(rows.len());

    for (row_no, raw) in rows.iter().enumerate() {
        match Record::try_from(raw.clone()) {
            Ok(rec) => records.push(rec),
            Err(rejection) => {
                log::debug!("Dropping row {row_no}: {rejection}");
                *report.dropped.entry(rejection.kind()).or_default() += 1;
            }
        }
    }
    report.kept = records.len();

    if report.total_dropped() > 0 {
        log::info!(
            "Cleaning kept {} of {} rows, dropped {:?}",
            report.kept,
            rows.len(),
            report.dropped
        );
    }

    (Table::new(records), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::raw;

    fn dirty_rows() -> Vec<RawRecord> {
        let mut no_region = raw("GA", 2020, 1, 200.0, 90.0);
        no_region.region = None;
        let mut no_pop = raw("GA", 2020, 2, 190.0, 85.0);
        no_pop.totpop_2010 = None;
        vec![
            raw("AL", 2020, 1, 100.0, 50.0),
            raw("AL", 2020, 2, -5.0, 50.0),
            no_region,
            raw("AL", 2020, 13, 100.0, 50.0),
            no_pop,
            raw("AL", 2020, 3, 120.0, 60.0),
        ]
    }

    #[test]
    fn drops_invalid_rows_in_order() {
        let (table, report) = clean_with_report(&dirty_rows());
        let kept: Vec<_> = table.records().iter().map(|r| r.monthno).collect();
        assert_eq!(kept, vec![1, 3]);
        assert_eq!(report.kept, 2);
        assert_eq!(report.dropped.get("missing field"), Some(&2));
        assert_eq!(report.dropped.get("negative benefit"), Some(&1));
        assert_eq!(report.dropped.get("invalid date"), Some(&1));
        assert_eq!(report.total_dropped(), 4);
    }

    #[test]
    fn negative_household_benefit_never_survives() {
        let table = clean(&dirty_rows());
        assert!(table.records().iter().all(|r| r.benperhh >= 0.0 && r.benperp >= 0.0));
        assert!(!table.records().iter().any(|r| r.benperhh == -5.0));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let once = clean(&dirty_rows());
        let twice = clean(&once.to_raw());
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let (table, report) = clean_with_report(&[]);
        assert!(table.is_empty());
        assert_eq!(report, CleanReport::default());
    }
}
