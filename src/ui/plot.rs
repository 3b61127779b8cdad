use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};

use crate::color::SeriesColors;
use crate::data::summary::Comparison;

/// Fractional year used as the plot x coordinate.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.year() as f64 + date.month0() as f64 / 12.0
}

/// Which benefit a plot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Household,
    Person,
}

impl Metric {
    fn title(self) -> &'static str {
        match self {
            Metric::Household => "SNAP Benefit per Household",
            Metric::Person => "SNAP Benefit per Person",
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            Metric::Household => "Benefit per Household ($)",
            Metric::Person => "Benefit per Person ($)",
        }
    }

    fn pick(self, (date, hh, p): (NaiveDate, f64, f64)) -> [f64; 2] {
        let y = match self {
            Metric::Household => hh,
            Metric::Person => p,
        };
        [date_to_x(date), y]
    }
}

fn line(
    series: &[(NaiveDate, f64, f64)],
    metric: Metric,
    name: &str,
    color: Color32,
) -> Line<'static> {
    let points: PlotPoints = series.iter().map(|&t| metric.pick(t)).collect();
    Line::new(points).name(name).color(color)
}

// ---------------------------------------------------------------------------
// Benefit plots (central panel)
// ---------------------------------------------------------------------------

/// Render the household and person plots stacked, x axes linked.
pub fn benefit_plots(ui: &mut Ui, cmp: &Comparison, colors: &SeriesColors) {
    let height = (ui.available_height() * 0.35).max(160.0);
    for metric in [Metric::Household, Metric::Person] {
        ui.strong(metric.title());
        Plot::new(("benefit_plot", metric as u8))
            .height(height)
            .legend(Legend::default())
            .link_axis("benefit_x", [true, false])
            .x_axis_label("Date")
            .y_axis_label(metric.axis_label())
            .x_axis_formatter(|mark, _range| {
                // Only whole years get a label.
                if (mark.value - mark.value.round()).abs() < 1e-6 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(line(&cmp.state_series, metric, &cmp.state, colors.state).width(2.0));
                plot_ui.line(
                    line(&cmp.national_series, metric, "National Avg", colors.national)
                        .style(LineStyle::dashed_loose()),
                );
            });
        ui.add_space(6.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_map_inside_their_year() {
        let jan = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let dec = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
        assert_eq!(date_to_x(jan), 2020.0);
        assert!(date_to_x(dec) > 2020.9 && date_to_x(dec) < 2021.0);
        assert_eq!(Metric::Person.pick((jan, 10.0, 4.0)), [2020.0, 4.0]);
    }

    #[test]
    fn lines_outlive_their_inputs() {
        let built = {
            let series = vec![(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 10.0, 4.0)];
            let name = String::from("AL");
            line(&series, Metric::Household, &name, Color32::RED)
        };
        let _owned: Line<'static> = built;
    }
}
