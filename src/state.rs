use std::path::Path;

use ad_insights::data::filter::{QueryFilter, WeekFilter, week_options};
use ad_insights::data::loader;
use ad_insights::data::metrics::{Metric, MetricSelection, default_selection};
use ad_insights::data::model::{Dataset, RawTable};
use anyhow::Context;

use crate::color::MetricColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Trend,
    SearchQuery,
}

/// The full UI state, independent of rendering. Views are recomputed from
/// `dataset` and the inputs on every frame.
#[derive(Default)]
pub struct AppState {
    /// Loaded record set (None until a file loads).
    pub dataset: Option<Dataset>,

    /// Optional total-count summary, shown as-is.
    pub totals: Option<RawTable>,

    /// `All` plus every week, chronological.
    pub week_options: Vec<WeekFilter>,

    pub tab: Tab,

    pub selected_metrics: MetricSelection,
    pub metric_colors: MetricColors,

    pub performance_filter: QueryFilter,
    pub volume_filter: QueryFilter,

    /// Set once the user picks a week in the volume panel. Until then the
    /// volume week follows the performance week.
    pub volume_week_pinned: bool,

    /// Fatal load failure; replaces the page content.
    pub load_error: Option<String>,

    /// Non-fatal notice shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            selected_metrics: default_selection(),
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset and reset every filter.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.week_options = week_options(&dataset);
        self.performance_filter = QueryFilter::default();
        self.volume_filter = QueryFilter::default();
        self.volume_week_pinned = false;
        self.dataset = Some(dataset);
        self.load_error = None;
    }

    pub fn load_records(&mut self, path: &Path) {
        let result = loader::load_records(path)
            .with_context(|| format!("loading records from {}", path.display()));
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load records: {e:#}");
                self.dataset = None;
                self.week_options.clear();
                self.load_error = Some(format!("{e:#}"));
            }
        }
    }

    /// A missing or unreadable totals file only produces a notice.
    pub fn load_totals(&mut self, path: &Path) {
        let result = loader::load_table(path)
            .with_context(|| format!("loading totals from {}", path.display()));
        match result {
            Ok(table) => {
                log::info!("Loaded {} total-count rows from {}", table.len(), path.display());
                self.totals = Some(table);
            }
            Err(e) => {
                log::warn!("Continuing without totals: {e:#}");
                self.status_message = Some(format!("Totals unavailable: {e:#}"));
            }
        }
    }

    pub fn toggle_metric(&mut self, metric: Metric) {
        if !self.selected_metrics.remove(&metric) {
            self.selected_metrics.insert(metric);
        }
    }

    /// Called right before the volume week selector is drawn.
    pub fn sync_volume_week(&mut self) {
        if !self.volume_week_pinned {
            self.volume_filter.week = self.performance_filter.week.clone();
        }
    }

    pub fn set_volume_week(&mut self, week: WeekFilter) {
        self.volume_filter.week = week;
        self.volume_week_pinned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_every_metric_selected() {
        let state = AppState::new();
        assert_eq!(state.selected_metrics, default_selection());
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let mut state = AppState::new();
        state.toggle_metric(Metric::Click);
        assert!(!state.selected_metrics.contains(&Metric::Click));
        state.toggle_metric(Metric::Click);
        assert!(state.selected_metrics.contains(&Metric::Click));
    }

    #[test]
    fn volume_week_follows_until_pinned() {
        let mut state = AppState::new();
        state.performance_filter.week = WeekFilter::Week("W3".into());
        state.sync_volume_week();
        assert_eq!(state.volume_filter.week, WeekFilter::Week("W3".into()));

        state.set_volume_week(WeekFilter::All);
        state.performance_filter.week = WeekFilter::Week("W4".into());
        state.sync_volume_week();
        assert_eq!(state.volume_filter.week, WeekFilter::All);
    }

    #[test]
    fn picking_the_mirrored_week_still_pins_it() {
        let mut state = AppState::new();
        state.performance_filter.week = WeekFilter::Week("W3".into());
        state.sync_volume_week();

        state.set_volume_week(state.volume_filter.week.clone());
        state.performance_filter.week = WeekFilter::Week("W4".into());
        state.sync_volume_week();
        assert_eq!(state.volume_filter.week, WeekFilter::Week("W3".into()));
    }

    #[test]
    fn missing_records_file_sets_fatal_error() {
        let mut state = AppState::new();
        state.load_records(Path::new("no/such/records.csv"));
        assert!(state.dataset.is_none());
        assert!(state.load_error.as_deref().unwrap_or_default().contains("unavailable"));
    }

    #[test]
    fn missing_totals_file_is_not_fatal() {
        let mut state = AppState::new();
        state.load_totals(Path::new("no/such/totals.csv"));
        assert!(state.totals.is_none());
        assert!(state.load_error.is_none());
        assert!(state.status_message.is_some());
    }
}
