mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::AdInsightsApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

/// Dashboard over weekly advertising funnel and search-query data.
#[derive(Parser, Debug)]
#[command(name = "ad-insights", version, about)]
struct Args {
    /// Per-(week, search query) record file (.csv or .parquet).
    #[arg(long, default_value = "week_data_cleaned.csv")]
    records: PathBuf,

    /// Optional total-count summary file.
    #[arg(long)]
    totals: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new();
    state.load_records(&args.records);
    if let Some(totals) = &args.totals {
        state.load_totals(totals);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Analysis of Amazon Advertising Performance",
        options,
        Box::new(move |_cc| Ok(Box::new(AdInsightsApp::new(state)))),
    )
}
