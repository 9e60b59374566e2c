use ad_insights::data::filter::{QueryPerformance, SearchVolume};
use ad_insights::data::model::RawTable;
use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use super::thousands;

const ROW_HEIGHT: f32 = 20.0;
const MAX_HEIGHT: f32 = 400.0;

// ---------------------------------------------------------------------------
// Tabular views
// ---------------------------------------------------------------------------

/// Week / query / four funnel counts.
pub fn performance_table(ui: &mut Ui, view: &QueryPerformance) {
    ui.push_id("performance_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_HEIGHT)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(90.0))
            .column(Column::initial(260.0).at_least(120.0).clip(true))
            .columns(Column::auto().at_least(110.0), 4)
            .header(ROW_HEIGHT, |mut header| {
                for title in [
                    "Week",
                    "Search Query",
                    "Impression Count",
                    "Click Count",
                    "Cart Add Count",
                    "Purchase Count",
                ] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                    let r = &view.rows[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(r.week.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.search_query.as_str());
                    });
                    for count in [
                        r.impression_count,
                        r.click_count,
                        r.cart_add_count,
                        r.purchase_count,
                    ] {
                        row.col(|ui: &mut Ui| {
                            ui.label(thousands(u128::from(count)));
                        });
                    }
                });
            });
    });
}

/// Week / query / search volume.
pub fn volume_table(ui: &mut Ui, view: &SearchVolume) {
    ui.push_id("volume_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_HEIGHT)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(90.0))
            .column(Column::initial(260.0).at_least(120.0).clip(true))
            .column(Column::auto().at_least(140.0))
            .header(ROW_HEIGHT, |mut header| {
                for title in ["Week", "Search Query", "Search Query Volume"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                    let r = &view.rows[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(r.week.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.search_query.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(thousands(u128::from(r.search_query_volume)));
                    });
                });
            });
    });
}

/// Any raw table, columns in file order.
pub fn raw_table(ui: &mut Ui, id: &str, table: &RawTable) {
    if table.headers.is_empty() {
        ui.label("Empty table.");
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_HEIGHT)
            .columns(Column::auto().at_least(80.0), table.headers.len())
            .header(ROW_HEIGHT, |mut header| {
                for title in &table.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title.as_str());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for i in 0..table.headers.len() {
                        let text = cells.get(i).map(|c| c.to_string()).unwrap_or_default();
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
