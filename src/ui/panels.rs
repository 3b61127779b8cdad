use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::state::AppState;

/// `Jan 2020`-style label for a month.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // ---- State selector ----
    ui.strong("Select a State");
    let current = state.selected_state.clone().unwrap_or_default();
    let mut picked = None;
    egui::ComboBox::from_id_salt("state_select")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for s in &state.states {
                if ui.selectable_label(current == *s, s).clicked() {
                    picked = Some(s.clone());
                }
            }
        });
    if let Some(s) = picked {
        state.select_state(s);
    }
    ui.separator();

    // ---- Date range ----
    ui.strong("Select Date Range");
    if state.months.is_empty() {
        ui.label("Table has no months.");
        return;
    }
    let last = state.months.len() - 1;
    let months = state.months.clone();
    let fmt = move |v: f64, _: std::ops::RangeInclusive<usize>| {
        months
            .get(v.round() as usize)
            .copied()
            .map(month_label)
            .unwrap_or_default()
    };

    let mut start = state.start_idx;
    ui.label("From");
    if ui
        .add(Slider::new(&mut start, 0..=last).custom_formatter(fmt.clone()))
        .changed()
    {
        state.set_start(start);
    }

    let mut end = state.end_idx;
    ui.label("To");
    if ui
        .add(Slider::new(&mut end, 0..=last).custom_formatter(fmt))
        .changed()
    {
        state.set_end(end);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let shown = state
                .comparison
                .as_ref()
                .map(|c| c.state_series.len())
                .unwrap_or(0);
            let name = ds
                .source()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} records, {} states, {} shown",
                ds.table().len(),
                state.states.len(),
                shown
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open SNAP benefit data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
