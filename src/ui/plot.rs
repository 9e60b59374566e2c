use ad_insights::data::metrics::{MetricSelection, aggregate};
use ad_insights::data::model::Dataset;
use ad_insights::data::scatter::{RATE_VIEWS, RatePoint, rate_points};
use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{self, MetricColors};

// ---------------------------------------------------------------------------
// Trend chart
// ---------------------------------------------------------------------------

/// Label of the week sitting at an axis position, if the position is on one.
fn week_at(weeks: &[String], x: f64) -> Option<&str> {
    let rounded = x.round();
    if (x - rounded).abs() > 0.25 || rounded < 0.0 {
        return None;
    }
    weeks.get(rounded as usize).map(String::as_str)
}

/// Mean per week of each selected metric as a line with points.  The x axis
/// is the chronological week position, labelled with the week.
pub fn trend_chart(ui: &mut Ui, dataset: &Dataset, selected: &MetricSelection, colors: &MetricColors) {
    let series = match aggregate(dataset, selected) {
        Ok(series) => series,
        Err(e) => {
            ui.label(RichText::new(format!("⚠ {e}")).color(Color32::YELLOW));
            return;
        }
    };

    let weeks: Vec<String> = dataset.weeks().iter().map(|w| w.label.clone()).collect();
    let axis_weeks = weeks.clone();

    Plot::new("trend_plot")
        .legend(Legend::default())
        .height(600.0)
        .x_axis_label("Week")
        .y_axis_label("Value")
        .x_axis_formatter(move |mark: GridMark, _range| {
            week_at(&axis_weeks, mark.value)
                .map(str::to_string)
                .unwrap_or_default()
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            match week_at(&weeks, value.x) {
                Some(week) if !name.is_empty() => {
                    format!("Week: {week}\nMetric: {name}\nValue: {:.2}", value.y)
                }
                _ => String::new(),
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for &metric in selected {
                let coords: Vec<[f64; 2]> = series
                    .iter()
                    .filter(|p| p.metric == metric)
                    .filter_map(|p| Some([dataset.week_position(&p.week)? as f64, p.value]))
                    .collect();
                let color = colors.color_for(metric);

                let line_points: PlotPoints = coords.iter().copied().collect();
                plot_ui.line(
                    Line::new(line_points)
                        .name(metric.title())
                        .color(color)
                        .width(2.0),
                );

                let dot_points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(dot_points)
                        .name(metric.title())
                        .color(color)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Rate scatter plots
// ---------------------------------------------------------------------------

/// The two rate relationships side by side. Records with a missing rate are
/// left out of the plot.
pub fn rate_scatters(ui: &mut Ui, dataset: &Dataset) {
    ui.columns(RATE_VIEWS.len(), |cols: &mut [Ui]| {
        for (i, (col, &(x, y))) in cols.iter_mut().zip(RATE_VIEWS.iter()).enumerate() {
            let title = format!("{} vs {}", x.title(), y.title());
            col.label(RichText::new(&title).strong());

            let points = rate_points(dataset, x, y);
            let hover_points = points.clone();
            let (x_title, y_title) = (x.title(), y.title());

            Plot::new(("rate_scatter", i))
                .height(400.0)
                .x_axis_label(x_title)
                .y_axis_label(y_title)
                .label_formatter(move |_name: &str, value: &PlotPoint| {
                    query_at(&hover_points, value)
                        .map(|q| {
                            format!(
                                "Search Query: {q}\n{x_title}: {:.2}\n{y_title}: {:.2}",
                                value.x, value.y
                            )
                        })
                        .unwrap_or_default()
                })
                .show(col, |plot_ui| {
                    let coords: PlotPoints = points.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(coords)
                            .name(&title)
                            .color(color::SCATTER.gamma_multiply(0.7))
                            .filled(true)
                            .radius(5.0),
                    );
                });
        }
    });
}

fn query_at<'a>(points: &'a [RatePoint], value: &PlotPoint) -> Option<&'a str> {
    points
        .iter()
        .find(|p| p.x == value.x && p.y == value.y)
        .map(|p| p.search_query.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_positions_map_to_weeks() {
        let weeks = vec!["W1".to_string(), "W2".to_string()];
        assert_eq!(week_at(&weeks, 0.0), Some("W1"));
        assert_eq!(week_at(&weeks, 1.1), Some("W2"));
        assert_eq!(week_at(&weeks, 0.5), None);
        assert_eq!(week_at(&weeks, -1.0), None);
        assert_eq!(week_at(&weeks, 2.0), None);
    }
}
