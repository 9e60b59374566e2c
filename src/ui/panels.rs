use ad_insights::data::filter::{WeekFilter, filter_rows, filter_volume};
use ad_insights::data::metrics::Metric;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::{plot, table, thousands};
use crate::color;
use crate::state::{AppState, Tab};

const PAGE_TITLE: &str = "Analysis of Amazon Advertising Performance";
const INTRO: &str = "Analysis of Amazon Advertising Performance Metrics offers a detailed analysis \
of the efficiency and impact of advertising campaigns conducted by sellers on Amazon. By analyzing \
Amazon advertising performance metrics, users can gain valuable insights into the effectiveness of \
advertising strategy.";

const IMPRESSION_TERM: (&str, &str) = (
    "Impression total count",
    "The total number of times the advertisement was displayed to customers in search results or on product pages.",
);
const CLICK_TERM: (&str, &str) = (
    "Click total count",
    "The total number of times customers clicked on the advertisement.",
);
const CART_TERM: (&str, &str) = (
    "Cart total count",
    "The total number of times customers added a product to their cart after clicking on the advertisement.",
);
const PURCHASE_TERM: (&str, &str) = (
    "Purchase total count",
    "The total number of times customers made a purchase after clicking on the advertisement.",
);
const WEEK_TERM: (&str, &str) = ("Week", "Week period in which data was collected.");
const QUERY_TERM: (&str, &str) = (
    "Search query",
    "Specific keywords or phrases used by customers when searching for products on Amazon.",
);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, tab switch and load status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open records…").clicked() {
                open_records_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open totals…").clicked() {
                open_totals_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Trend, "Trend Analysis");
        ui.selectable_value(&mut state.tab, Tab::SearchQuery, "Search Query Analysis");

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} rows, {} weeks", ds.len(), ds.weeks().len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// Page body
// ---------------------------------------------------------------------------

/// Render the active tab, or the load error when no dataset is available.
pub fn page(ui: &mut Ui, state: &mut AppState) {
    ui.heading(PAGE_TITLE);
    ui.label(INTRO);
    ui.add_space(8.0);

    if let Some(err) = &state.load_error {
        ui.label(RichText::new(err).color(Color32::RED).strong());
        return;
    }
    if state.dataset.is_none() {
        ui.label("Open a record file to begin  (File → Open records…)");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Trend => trend_tab(ui, state),
            Tab::SearchQuery => search_query_tab(ui, state),
        });
}

fn trend_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Time Series");

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Select Performance Metrics:");
        for metric in Metric::ALL {
            let selected = state.selected_metrics.contains(&metric);
            let text = RichText::new(metric.option_label()).color(state.metric_colors.color_for(metric));
            if ui
                .selectable_label(selected, text)
                .on_hover_text(format!("Mean of {} per week", metric.column()))
                .clicked()
            {
                state.toggle_metric(metric);
            }
        }
    });

    let Some(dataset) = &state.dataset else {
        return;
    };

    plot::trend_chart(ui, dataset, &state.selected_metrics, &state.metric_colors);

    ui.add_space(12.0);
    ui.heading("Relationship Between Click Rate, Purchase Rate, and Cart Add Rate");
    plot::rate_scatters(ui, dataset);

    if let Some(totals) = &state.totals {
        egui::CollapsingHeader::new(RichText::new("Total Count Summary").strong())
            .id_salt("totals_summary")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                table::raw_table(ui, "totals_table", totals);
            });
    }

    glossary(
        ui,
        "trend_glossary",
        &[
            WEEK_TERM,
            QUERY_TERM,
            IMPRESSION_TERM,
            CLICK_TERM,
            CART_TERM,
            PURCHASE_TERM,
            (
                "Click rate",
                "The percentage of times the advertisement was clicked on relative to the number of times it was displayed.",
            ),
            (
                "Cart add rate",
                "The percentage of times the advertisement resulted in a product being added to a customer's cart.",
            ),
            (
                "Purchase rate",
                "The percentage of times the advertisement resulted in a customer making a purchase.",
            ),
        ],
    );
}

fn search_query_tab(ui: &mut Ui, state: &mut AppState) {
    // ---- Query performance ----
    ui.heading("Search Query Performance");

    ui.horizontal(|ui: &mut Ui| {
        week_selector(ui, "week_select_1", &state.week_options, &mut state.performance_filter.week);
        ui.label("Search in search query:");
        ui.text_edit_singleline(&mut state.performance_filter.substring);
    });

    let Some(dataset) = &state.dataset else {
        return;
    };

    let performance = filter_rows(dataset, &state.performance_filter);
    ui.label(format!("Showing {} rows", performance.row_count()));
    table::performance_table(ui, &performance);

    ui.add_space(8.0);
    ui.columns(3, |cols: &mut [Ui]| {
        let totals = performance.totals;
        for (col, (label, value)) in cols.iter_mut().zip([
            ("Total of Impression Count", totals.impressions),
            ("Total of Cart Add Count", totals.cart_adds),
            ("Total of Purchase Count", totals.purchases),
        ]) {
            total_metric(col, label, value);
        }
    });

    // ---- Search volume ----
    ui.add_space(12.0);
    ui.heading("Identifying Popular Search Query");

    state.sync_volume_week();
    let mut volume_week = state.volume_filter.week.clone();
    let picked = ui
        .horizontal(|ui: &mut Ui| {
            let picked = week_selector(ui, "week_select_2", &state.week_options, &mut volume_week);
            ui.label("Search in search query:");
            ui.add(egui::TextEdit::singleline(&mut state.volume_filter.substring).id_salt("search_query_2"));
            picked
        })
        .inner;
    // Any pick pins the week, even re-selecting the mirrored value.
    if picked {
        state.set_volume_week(volume_week);
    }

    let Some(dataset) = &state.dataset else {
        return;
    };
    let volume = filter_volume(dataset, &state.volume_filter);
    ui.label(format!("Showing {} rows", volume.row_count()));
    table::volume_table(ui, &volume);
    total_metric(ui, "Total of Search Query Volume", volume.total_volume);

    glossary(
        ui,
        "search_glossary",
        &[
            WEEK_TERM,
            QUERY_TERM,
            (
                "Search Query Volume",
                "The number of times a particular search query was used by customers during the given time period.",
            ),
            IMPRESSION_TERM,
            CLICK_TERM,
            CART_TERM,
            PURCHASE_TERM,
        ],
    );
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// Returns `true` when the user picked an option this frame.
fn week_selector(ui: &mut Ui, id: &str, options: &[WeekFilter], current: &mut WeekFilter) -> bool {
    ui.label("Select Week:");
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            let mut picked = false;
            for option in options {
                picked |= ui.selectable_value(current, option.clone(), option.to_string()).clicked();
            }
            picked
        })
        .inner
        .unwrap_or(false)
}

fn total_metric(ui: &mut Ui, label: &str, value: u128) {
    ui.label(RichText::new(label).strong());
    ui.label(RichText::new(thousands(value)).color(color::TOTAL).strong());
}

fn glossary(ui: &mut Ui, id: &str, terms: &[(&str, &str)]) {
    egui::CollapsingHeader::new("See Glossary")
        .id_salt(id)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for (i, (term, meaning)) in terms.iter().enumerate() {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.label(format!("{}.", i + 1));
                    ui.label(RichText::new(*term).color(color::GLOSSARY_TERM).strong());
                    ui.label(format!(": {meaning}"));
                });
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

const TABLE_FILTERS: &[&str] = &["csv", "parquet", "pq"];

pub fn open_records_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open weekly search-query records")
        .add_filter("Supported files", TABLE_FILTERS)
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_records(&path);
    }
}

pub fn open_totals_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open total-count summary")
        .add_filter("Supported files", TABLE_FILTERS)
        .pick_file();

    if let Some(path) = file {
        state.status_message = None;
        state.load_totals(&path);
    }
}
