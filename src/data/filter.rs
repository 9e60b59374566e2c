use std::fmt;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: week + search-query substring
// ---------------------------------------------------------------------------

/// Week selector value: every week, or a single week label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum WeekFilter {
    #[default]
    All,
    Week(String),
}

impl fmt::Display for WeekFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekFilter::All => f.write_str("All"),
            WeekFilter::Week(label) => f.write_str(label),
        }
    }
}

/// The options offered by a week selector: `All`, then each week in
/// chronological order.
pub fn week_options(dataset: &Dataset) -> Vec<WeekFilter> {
    std::iter::once(WeekFilter::All)
        .chain(
            dataset
                .weeks()
                .iter()
                .map(|w| WeekFilter::Week(w.label.clone())),
        )
        .collect()
}

/// Inputs of one filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub week: WeekFilter,
    /// Case-insensitive substring of `search_query`. Empty means no
    /// constraint.
    pub substring: String,
}

impl QueryFilter {
    pub fn new(week: WeekFilter, substring: impl Into<String>) -> Self {
        Self {
            week,
            substring: substring.into(),
        }
    }

    /// Compile the predicate once per call so the needle is lowercased once.
    fn matcher(&self) -> impl Fn(&Record) -> bool + '_ {
        let needle = self.substring.to_lowercase();
        move |rec: &Record| {
            let week_ok = match &self.week {
                WeekFilter::All => true,
                WeekFilter::Week(label) => rec.week == *label,
            };
            week_ok && (needle.is_empty() || rec.search_query.to_lowercase().contains(&needle))
        }
    }
}

/// Return indices of records that pass the filter, in load order.
pub fn filtered_indices(dataset: &Dataset, filter: &QueryFilter) -> Vec<usize> {
    let matches = filter.matcher();
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(*rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Query performance view
// ---------------------------------------------------------------------------

/// Projection of a record shown in the performance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRow {
    pub week: String,
    pub search_query: String,
    pub impression_count: u64,
    pub click_count: u64,
    pub cart_add_count: u64,
    pub purchase_count: u64,
}

impl From<&Record> for PerformanceRow {
    fn from(rec: &Record) -> Self {
        Self {
            week: rec.week.clone(),
            search_query: rec.search_query.clone(),
            impression_count: rec.impression_count,
            click_count: rec.click_count,
            cart_add_count: rec.cart_add_count,
            purchase_count: rec.purchase_count,
        }
    }
}

/// Sums over the retained performance rows. Widened to `u128` so that
/// totals of large per-row counts cannot wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunnelTotals {
    pub impressions: u128,
    pub cart_adds: u128,
    pub purchases: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPerformance {
    pub rows: Vec<PerformanceRow>,
    pub totals: FunnelTotals,
}

impl QueryPerformance {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Filter the records and total impressions, cart adds and purchases.
pub fn filter_rows(dataset: &Dataset, filter: &QueryFilter) -> QueryPerformance {
    let records = dataset.records();
    let mut totals = FunnelTotals::default();
    let rows = filtered_indices(dataset, filter)
        .into_iter()
        .map(|i| {
            let rec = &records[i];
            totals.impressions += u128::from(rec.impression_count);
            totals.cart_adds += u128::from(rec.cart_add_count);
            totals.purchases += u128::from(rec.purchase_count);
            PerformanceRow::from(rec)
        })
        .collect();

    QueryPerformance { rows, totals }
}

// ---------------------------------------------------------------------------
// Search volume view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRow {
    pub week: String,
    pub search_query: String,
    pub search_query_volume: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchVolume {
    pub rows: Vec<VolumeRow>,
    pub total_volume: u128,
}

impl SearchVolume {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Filter the records down to the (week, query, volume) projection.
pub fn filter_volume(dataset: &Dataset, filter: &QueryFilter) -> SearchVolume {
    let records = dataset.records();
    let rows: Vec<VolumeRow> = filtered_indices(dataset, filter)
        .into_iter()
        .map(|i| {
            let rec = &records[i];
            VolumeRow {
                week: rec.week.clone(),
                search_query: rec.search_query.clone(),
                search_query_volume: rec.search_query_volume,
            }
        })
        .collect();
    let total_volume = rows.iter().map(|r| u128::from(r.search_query_volume)).sum();

    SearchVolume { rows, total_volume }
}
