use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::change_color;
use crate::data::error::PipelineError;
use crate::data::summary::{Change, Comparison};

/// Warning shown when the selected state has no records in range.
pub const NO_DATA_MESSAGE: &str = "No data for selected date range.";

/// `+12.3%` style percent label.
pub fn format_pct(pct: f64) -> String {
    format!("{pct:+.1}%")
}

/// The four summary rows: label and change.
pub fn summary_rows(cmp: &Comparison) -> Result<[(String, Change); 4], PipelineError> {
    let s = cmp.summary.clone()?;
    Ok([
        (format!("{} – per household", cmp.state), s.state.household),
        (format!("{} – per person", cmp.state), s.state.person),
        ("National Average – per household".to_string(), s.national.household),
        ("National Average – per person".to_string(), s.national.person),
    ])
}

/// Render the percent-change table, or the no-data warning.
pub fn summary_table(ui: &mut Ui, cmp: &Comparison) {
    ui.heading("📈 Summary");

    let rows = match summary_rows(cmp) {
        Ok(rows) => rows,
        Err(PipelineError::EmptySeries) => {
            ui.colored_label(ui.visuals().warn_fg_color, NO_DATA_MESSAGE);
            return;
        }
        Err(e) => {
            ui.colored_label(ui.visuals().error_fg_color, e.to_string());
            return;
        }
    };

    if cmp.partial_months > 0 {
        ui.weak(format!(
            "{} month(s) in range average over fewer states than the rest.",
            cmp.partial_months
        ));
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(220.0))
        .columns(Column::auto().at_least(80.0), 3)
        .header(20.0, |mut header| {
            for title in ["Series", "Start ($)", "End ($)", "Change"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (label, change) in &rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(label.as_str());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", change.start));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", change.end));
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(format_pct(change.pct_change))
                                .strong()
                                .color(change_color(change.pct_change)),
                        );
                    });
                });
            }
        });
}
