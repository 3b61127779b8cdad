use eframe::egui;

use crate::color::SeriesColors;
use crate::state::{AppState, NO_RECORDS_MESSAGE};
use crate::ui::{panels, plot, summary};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SnapTrendsApp {
    pub state: AppState,
    pub colors: SeriesColors,
}

impl SnapTrendsApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            colors: SeriesColors::default(),
        }
    }
}

impl eframe::App for SnapTrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plots and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(cmp) = &self.state.comparison else {
                let hint = match &self.state.dataset {
                    Some(_) => NO_RECORDS_MESSAGE,
                    None => "Open a SNAP table to begin  (File → Open…)",
                };
                ui.centered_and_justified(|ui| {
                    ui.heading(hint);
                });
                return;
            };

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("📊 SNAP Benefit Trends");
                ui.label(format!(
                    "Explore how {}'s SNAP benefits per household and per person \
                     compare to the national average.",
                    cmp.state
                ));
                ui.weak(format!(
                    "{} – {}",
                    panels::month_label(cmp.range.low()),
                    panels::month_label(cmp.range.high())
                ));
                ui.add_space(8.0);
                plot::benefit_plots(ui, cmp, &self.colors);
                summary::summary_table(ui, cmp);
            });
        });
    }
}
