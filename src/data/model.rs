use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use super::error::Rejection;

/// Every column the loader requires in the source header.
pub const COLUMNS: [&str; 14] = [
    "state",
    "region",
    "region_name",
    "divis",
    "divis_name",
    "year",
    "monthno",
    "benperhh",
    "benperp",
    "pop_urban_2010",
    "pop_rural_2010",
    "totpop_2010",
    "pct_pop_urban_2010",
    "pct_pop_rural_2010",
];

// ---------------------------------------------------------------------------
// RawRecord – one source row before cleaning
// ---------------------------------------------------------------------------

/// A source row exactly as read. Every column may be missing; the cleaner
/// decides which absences disqualify the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub state: Option<String>,
    pub region: Option<String>,
    pub region_name: Option<String>,
    pub divis: Option<String>,
    pub divis_name: Option<String>,
    pub year: Option<i64>,
    pub monthno: Option<i64>,
    pub benperhh: Option<f64>,
    pub benperp: Option<f64>,
    pub pop_urban_2010: Option<f64>,
    pub pop_rural_2010: Option<f64>,
    pub totpop_2010: Option<f64>,
    pub pct_pop_urban_2010: Option<f64>,
    pub pct_pop_rural_2010: Option<f64>,
}

/// Rows as loaded, in source order.
pub type RawTable = Vec<RawRecord>;

// ---------------------------------------------------------------------------
// Record – one cleaned state-month observation
// ---------------------------------------------------------------------------

/// A row that passed cleaning: required fields present, benefits
/// non-negative, `date` the first day of its month.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Not part of the required set; rows without a state are kept but can
    /// never be selected.
    pub state: Option<String>,
    pub region: String,
    pub region_name: String,
    pub divis: String,
    pub divis_name: String,
    pub year: i32,
    pub monthno: u32,
    pub benperhh: f64,
    pub benperp: f64,
    pub pop_urban_2010: f64,
    pub pop_rural_2010: f64,
    pub totpop_2010: f64,
    pub pct_pop_urban_2010: f64,
    pub pct_pop_rural_2010: f64,
    pub date: NaiveDate,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, Rejection> {
    value.ok_or(Rejection::MissingField(field))
}

/// NaN counts as missing, the way pandas treats it.
fn required_real(value: Option<f64>, field: &'static str) -> Result<f64, Rejection> {
    required(value.filter(|v| !v.is_nan()), field)
}

fn benefit(value: Option<f64>, field: &'static str) -> Result<f64, Rejection> {
    // NaN never satisfies `>= 0`, so it is treated like a missing value.
    let value = value
        .filter(|v| !v.is_nan())
        .ok_or(Rejection::MissingField(field))?;
    if value < 0.0 {
        return Err(Rejection::NegativeBenefit { field, value });
    }
    Ok(value)
}

/// First calendar day of (`year`, `monthno`).
pub fn month_start(year: Option<i64>, monthno: Option<i64>) -> Result<NaiveDate, Rejection> {
    let invalid = || Rejection::InvalidDate { year, monthno };
    let (y, m) = year.zip(monthno).ok_or_else(invalid)?;
    let y = i32::try_from(y).map_err(|_| invalid())?;
    let m = u32::try_from(m).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(invalid)
}

impl TryFrom<RawRecord> for Record {
    type Error = Rejection;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let pop_urban_2010 = required_real(raw.pop_urban_2010, "pop_urban_2010")?;
        let pop_rural_2010 = required_real(raw.pop_rural_2010, "pop_rural_2010")?;
        let totpop_2010 = required_real(raw.totpop_2010, "totpop_2010")?;
        let pct_pop_urban_2010 = required_real(raw.pct_pop_urban_2010, "pct_pop_urban_2010")?;
        let pct_pop_rural_2010 = required_real(raw.pct_pop_rural_2010, "pct_pop_rural_2010")?;
        let region = required(raw.region, "region")?;
        let region_name = required(raw.region_name, "region_name")?;
        let divis = required(raw.divis, "divis")?;
        let divis_name = required(raw.divis_name, "divis_name")?;

        let benperhh = benefit(raw.benperhh, "benperhh")?;
        let benperp = benefit(raw.benperp, "benperp")?;

        let date = month_start(raw.year, raw.monthno)?;

        Ok(Record {
            state: raw.state,
            region,
            region_name,
            divis,
            divis_name,
            year: date.year(),
            monthno: date.month(),
            benperhh,
            benperp,
            pop_urban_2010,
            pop_rural_2010,
            totpop_2010,
            pct_pop_urban_2010,
            pct_pop_rural_2010,
            date,
        })
    }
}

impl From<Record> for RawRecord {
    fn from(r: Record) -> Self {
        RawRecord {
            state: r.state,
            region: Some(r.region),
            region_name: Some(r.region_name),
            divis: Some(r.divis),
            divis_name: Some(r.divis_name),
            year: Some(i64::from(r.year)),
            monthno: Some(i64::from(r.monthno)),
            benperhh: Some(r.benperhh),
            benperp: Some(r.benperp),
            pop_urban_2010: Some(r.pop_urban_2010),
            pop_rural_2010: Some(r.pop_rural_2010),
            totpop_2010: Some(r.totpop_2010),
            pct_pop_urban_2010: Some(r.pct_pop_urban_2010),
            pct_pop_rural_2010: Some(r.pct_pop_rural_2010),
        }
    }
}

// ---------------------------------------------------------------------------
// Series points
// ---------------------------------------------------------------------------

/// A dated pair of benefit values, shared by state and national series.
pub trait BenefitPoint {
    fn date(&self) -> NaiveDate;
    fn benperhh(&self) -> f64;
    fn benperp(&self) -> f64;
}

impl BenefitPoint for Record {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn benperhh(&self) -> f64 {
        self.benperhh
    }
    fn benperp(&self) -> f64 {
        self.benperp
    }
}

impl<T: BenefitPoint + ?Sized> BenefitPoint for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
    fn benperhh(&self) -> f64 {
        (**self).benperhh()
    }
    fn benperp(&self) -> f64 {
        (**self).benperp()
    }
}

/// Cross-state mean for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct NationalPoint {
    pub date: NaiveDate,
    pub benperhh: f64,
    pub benperp: f64,
    /// Number of state records averaged for this month.
    pub count: usize,
}

impl BenefitPoint for NationalPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn benperhh(&self) -> f64 {
        self.benperhh
    }
    fn benperp(&self) -> f64 {
        self.benperp
    }
}

/// One state's records inside a date range, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries<'a> {
    pub state: String,
    pub records: Vec<&'a Record>,
}

/// One point per month with data, ascending by date.
pub type NationalSeries = Vec<NationalPoint>;

// ---------------------------------------------------------------------------
// Table – the cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset in source order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct state identifiers, sorted.
    pub fn states(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct months, ascending.
    pub fn months(&self) -> Vec<NaiveDate> {
        self.records
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest month, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Raw form of every record, for re-running the cleaner.
    pub fn to_raw(&self) -> RawTable {
        self.records.iter().cloned().map(RawRecord::from).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A fully populated raw row for `state` in `year`-`monthno`.
    pub(crate) fn raw(state: &str, year: i64, monthno: i64, hh: f64, p: f64) -> RawRecord {
        RawRecord {
            state: Some(state.to_string()),
            region: Some("3".to_string()),
            region_name: Some("South".to_string()),
            divis: Some("6".to_string()),
            divis_name: Some("East South Central".to_string()),
            year: Some(year),
            monthno: Some(monthno),
            benperhh: Some(hh),
            benperp: Some(p),
            pop_urban_2010: Some(2_821_804.0),
            pop_rural_2010: Some(1_957_932.0),
            totpop_2010: Some(4_779_736.0),
            pct_pop_urban_2010: Some(59.04),
            pct_pop_rural_2010: Some(40.96),
        }
    }

    pub(crate) fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn record_date_is_first_of_month() {
        let rec = Record::try_from(raw("AL", 2020, 2, 100.0, 50.0)).unwrap();
        assert_eq!(rec.date, date(2020, 2));
        assert_eq!((rec.year, rec.monthno), (2020, 2));
    }

    #[test]
    fn month_outside_calendar_is_rejected() {
        for m in [0, 13, -1] {
            let err = Record::try_from(raw("AL", 2020, m, 100.0, 50.0)).unwrap_err();
            assert_eq!(err.kind(), "invalid date");
        }
        let mut no_year = raw("AL", 2020, 1, 100.0, 50.0);
        no_year.year = None;
        assert!(matches!(
            Record::try_from(no_year),
            Err(Rejection::InvalidDate { year: None, .. })
        ));
    }

    #[test]
    fn negative_and_nan_benefits_are_rejected() {
        let err = Record::try_from(raw("AL", 2020, 1, -5.0, 50.0)).unwrap_err();
        assert_eq!(
            err,
            Rejection::NegativeBenefit {
                field: "benperhh",
                value: -5.0
            }
        );
        let err = Record::try_from(raw("AL", 2020, 1, 100.0, f64::NAN)).unwrap_err();
        assert_eq!(err, Rejection::MissingField("benperp"));
    }

    #[test]
    fn nan_population_counts_as_missing() {
        let mut r = raw("AL", 2020, 1, 100.0, 50.0);
        r.totpop_2010 = Some(f64::NAN);
        assert_eq!(
            Record::try_from(r),
            Err(Rejection::MissingField("totpop_2010"))
        );
    }

    #[test]
    fn zero_benefit_is_kept() {
        assert!(Record::try_from(raw("AL", 2020, 1, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn missing_state_is_not_a_rejection() {
        let mut r = raw("AL", 2020, 1, 1.0, 1.0);
        r.state = None;
        let rec = Record::try_from(r).unwrap();
        assert_eq!(rec.state, None);
        assert!(Table::new(vec![rec]).states().is_empty());
    }

    #[test]
    fn table_indices() {
        let rows = [
            raw("GA", 2020, 2, 1.0, 1.0),
            raw("AL", 2020, 1, 1.0, 1.0),
            raw("AL", 2019, 12, 1.0, 1.0),
        ];
        let table = Table::new(
            rows.into_iter()
                .map(|r| Record::try_from(r).unwrap())
                .collect(),
        );
        assert_eq!(table.states(), vec!["AL".to_string(), "GA".to_string()]);
        assert_eq!(
            table.months(),
            vec![date(2019, 12), date(2020, 1), date(2020, 2)]
        );
        assert_eq!(table.date_bounds(), Some((date(2019, 12), date(2020, 2))));
        assert_eq!(Table::default().date_bounds(), None);
    }
}
