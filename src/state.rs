use std::path::Path;

use chrono::NaiveDate;

use crate::data::dataset::Dataset;
use crate::data::filter::DateRange;
use crate::data::summary::Comparison;

/// Shown when a table loads but cleaning drops every row.
pub const NO_RECORDS_MESSAGE: &str = "No records left after cleaning.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a table loads).
    pub dataset: Option<Dataset>,

    /// Sorted states of the loaded table.
    pub states: Vec<String>,

    /// Sorted distinct months of the loaded table; the range sliders index
    /// into this.
    pub months: Vec<NaiveDate>,

    pub selected_state: Option<String>,
    pub start_idx: usize,
    pub end_idx: usize,

    /// State to select after a load, if the table has it.
    pub preferred_state: Option<String>,

    /// Series and summaries for the current selection (cached).
    pub comparison: Option<Comparison>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(preferred_state: Option<String>) -> Self {
        Self {
            preferred_state,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset, reset the selection and recompute.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.states = dataset.table().states();
        self.months = dataset.table().months();

        let keep = [&self.selected_state, &self.preferred_state]
            .into_iter()
            .flatten()
            .find(|s| self.states.contains(s))
            .cloned();
        self.selected_state = keep.or_else(|| self.states.first().cloned());
        self.start_idx = 0;
        self.end_idx = self.months.len().saturating_sub(1);

        self.status_message = dataset.table().is_empty().then(|| {
            log::warn!("No records left after cleaning {}", dataset.source().display());
            NO_RECORDS_MESSAGE.to_string()
        });
        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Load `path` and make it the current dataset. On failure the current
    /// dataset stays and the error is shown.
    pub fn open(&mut self, path: &Path) {
        match Dataset::load(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current source.
    pub fn reload(&mut self) {
        let Some(mut dataset) = self.dataset.take() else {
            return;
        };
        let result = dataset.reload();
        match result {
            Ok(()) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.dataset = Some(dataset);
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Inclusive range selected by the sliders.
    pub fn selected_range(&self) -> Option<DateRange> {
        let low = *self.months.get(self.start_idx)?;
        let high = *self.months.get(self.end_idx)?;
        DateRange::new(low, high).ok()
    }

    pub fn select_state(&mut self, state: String) {
        if self.selected_state.as_ref() != Some(&state) {
            self.selected_state = Some(state);
            self.refresh();
        }
    }

    /// Move the range start; the end follows if it would fall before it.
    pub fn set_start(&mut self, idx: usize) {
        let last = self.months.len().saturating_sub(1);
        self.start_idx = idx.min(last);
        self.end_idx = self.end_idx.max(self.start_idx);
        self.refresh();
    }

    /// Move the range end; the start follows if it would fall after it.
    pub fn set_end(&mut self, idx: usize) {
        let last = self.months.len().saturating_sub(1);
        self.end_idx = idx.min(last);
        self.start_idx = self.start_idx.min(self.end_idx);
        self.refresh();
    }

    /// Recompute `comparison` after a selection change.
    pub fn refresh(&mut self) {
        self.comparison = None;
        let (Some(ds), Some(state), Some(range)) = (
            &self.dataset,
            self.selected_state.as_deref(),
            self.selected_range(),
        ) else {
            return;
        };
        match Comparison::build(ds.table(), state, &range) {
            Ok(cmp) => self.comparison = Some(cmp),
            Err(e) => {
                log::error!("Failed to summarize {state}: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::clean;
    use crate::data::error::PipelineError;
    use crate::data::model::tests::{date, raw};

    fn dataset() -> Dataset {
        let table = clean(&[
            raw("GA", 2020, 1, 200.0, 90.0),
            raw("GA", 2020, 2, 190.0, 85.0),
            raw("AL", 2020, 1, 100.0, 50.0),
            raw("AL", 2020, 2, 110.0, 55.0),
            raw("GA", 2020, 3, 180.0, 80.0),
        ]);
        Dataset::from_table("memory.csv".into(), table)
    }

    #[test]
    fn defaults_to_first_state_and_full_range() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.selected_state.as_deref(), Some("AL"));
        let range = state.selected_range().unwrap();
        assert_eq!((range.low(), range.high()), (date(2020, 1), date(2020, 3)));

        let cmp = state.comparison.as_ref().unwrap();
        assert_eq!(cmp.state_series.len(), 2);
        assert_eq!(cmp.national_series.len(), 3);
    }

    #[test]
    fn preferred_state_used_when_present() {
        let mut state = AppState::new(Some("GA".to_string()));
        state.set_dataset(dataset());
        assert_eq!(state.selected_state.as_deref(), Some("GA"));

        let mut state = AppState::new(Some("ZZ".to_string()));
        state.set_dataset(dataset());
        assert_eq!(state.selected_state.as_deref(), Some("AL"));
    }

    #[test]
    fn missing_selection_falls_back_to_preferred_state() {
        let mut state = AppState::new(Some("GA".to_string()));
        state.set_dataset(dataset());
        state.select_state("AL".to_string());

        // A reload without AL keeps the preferred GA rather than the first state.
        let table = clean(&[
            raw("AK", 2020, 1, 300.0, 120.0),
            raw("GA", 2020, 1, 200.0, 90.0),
        ]);
        state.set_dataset(Dataset::from_table("memory.csv".into(), table));
        assert_eq!(state.selected_state.as_deref(), Some("GA"));
    }

    #[test]
    fn fully_dropped_table_explains_itself() {
        let mut state = AppState::default();
        let table = clean(&[raw("AL", 2020, 1, -1.0, 50.0)]);
        state.set_dataset(Dataset::from_table("memory.csv".into(), table));
        assert!(state.dataset.is_some());
        assert!(state.comparison.is_none());
        assert_eq!(state.status_message.as_deref(), Some(NO_RECORDS_MESSAGE));

        state.set_dataset(dataset());
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn range_ends_never_cross() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_end(0);
        state.set_start(2);
        assert_eq!((state.start_idx, state.end_idx), (2, 2));
        state.set_end(1);
        assert_eq!((state.start_idx, state.end_idx), (1, 1));
        state.set_start(99);
        assert_eq!((state.start_idx, state.end_idx), (2, 2));
    }

    #[test]
    fn empty_selection_reports_no_data() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        // AL has no record in March.
        state.set_start(2);
        let cmp = state.comparison.as_ref().unwrap();
        assert!(cmp.state_series.is_empty());
        assert_eq!(cmp.summary, Err(PipelineError::EmptySeries));
    }

    #[test]
    fn failed_open_keeps_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.open(Path::new("/nonexistent/snap.csv"));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
