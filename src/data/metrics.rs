use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::loader;
use super::model::{Dataset, Record};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Metric catalogue
// ---------------------------------------------------------------------------

/// The funnel counters that can be charted over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Impression,
    Click,
    CartAdd,
    Purchase,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Impression,
        Metric::Click,
        Metric::CartAdd,
        Metric::Purchase,
    ];

    /// Label shown in the metric multi-select.
    pub fn option_label(self) -> &'static str {
        match self {
            Metric::Impression => "Impression (total count)",
            Metric::Click => "Click (total count)",
            Metric::CartAdd => "Cart Add (total count)",
            Metric::Purchase => "Purchase (total count)",
        }
    }

    /// Series name used in the chart legend and tooltips.
    pub fn title(self) -> &'static str {
        match self {
            Metric::Impression => "Impression Count",
            Metric::Click => "Click Count",
            Metric::CartAdd => "Cart Add Count",
            Metric::Purchase => "Purchase Count",
        }
    }

    /// Source column in the record file.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Impression => loader::IMPRESSION_COUNT,
            Metric::Click => loader::CLICK_COUNT,
            Metric::CartAdd => loader::CART_ADD_COUNT,
            Metric::Purchase => loader::PURCHASE_COUNT,
        }
    }

    pub fn value(self, record: &Record) -> u64 {
        match self {
            Metric::Impression => record.impression_count,
            Metric::Click => record.click_count,
            Metric::CartAdd => record.cart_add_count,
            Metric::Purchase => record.purchase_count,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Multi-select state. Defaults to every metric.
pub type MetricSelection = BTreeSet<Metric>;

pub fn default_selection() -> MetricSelection {
    Metric::ALL.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// One point of the long-form trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub week: String,
    pub week_number: i64,
    pub metric: Metric,
    /// Mean of the metric over the records of `week`.
    pub value: f64,
}

/// Mean of each selected metric per week, reshaped into one long series.
///
/// Points of the same metric are contiguous, in [`Metric`] order, and each
/// metric's points follow the chronological week order. Only weeks present
/// in the data appear.
pub fn aggregate(
    dataset: &Dataset,
    selected: &MetricSelection,
) -> Result<Vec<SeriesPoint>, DataError> {
    if selected.is_empty() {
        return Err(DataError::NoMetricSelected);
    }

    // week label → (sum per metric, record count)
    let mut groups: BTreeMap<&str, ([u128; 4], u64)> = BTreeMap::new();
    for rec in dataset.records() {
        let (sums, count) = groups.entry(rec.week.as_str()).or_default();
        for metric in Metric::ALL {
            sums[metric as usize] += u128::from(metric.value(rec));
        }
        *count += 1;
    }

    let mut series = Vec::with_capacity(selected.len() * dataset.weeks().len());
    for &metric in selected {
        for week in dataset.weeks() {
            let Some((sums, count)) = groups.get(week.label.as_str()) else {
                continue;
            };
            series.push(SeriesPoint {
                week: week.label.clone(),
                week_number: week.number,
                metric,
                value: sums[metric as usize] as f64 / *count as f64,
            });
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("W2", 2, "a", [100, 10, 4, 1]),
            record("W2", 2, "b", [200, 20, 0, 0]),
            record("W1", 1, "a", [30, 3, 1, 1]),
        ])
    }

    #[test]
    fn mean_per_week() {
        let selected = MetricSelection::from([Metric::Impression]);
        let series = aggregate(&dataset(), &selected).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].week, "W1");
        assert_eq!(series[0].value, 30.0);
        assert_eq!(series[1].week, "W2");
        assert_eq!(series[1].value, 150.0);
    }

    #[test]
    fn metrics_are_grouped_together() {
        let series = aggregate(&dataset(), &default_selection()).unwrap();
        assert_eq!(series.len(), 8);
        let order: Vec<Metric> = series.iter().map(|p| p.metric).collect();
        let mut deduped = order.clone();
        deduped.dedup();
        assert_eq!(deduped, Metric::ALL);

        let cart: Vec<f64> = series
            .iter()
            .filter(|p| p.metric == Metric::CartAdd)
            .map(|p| p.value)
            .collect();
        assert_eq!(cart, [1.0, 2.0]);
    }

    #[test]
    fn only_weeks_in_the_data_appear() {
        let series = aggregate(&dataset(), &MetricSelection::from([Metric::Click])).unwrap();
        for point in &series {
            assert!(dataset().weeks().iter().any(|w| w.label == point.week));
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = aggregate(&dataset(), &MetricSelection::new()).unwrap_err();
        assert!(matches!(err, DataError::NoMetricSelected));
    }

    #[test]
    fn large_counts_do_not_wrap_the_weekly_sum() {
        let big = 10_000_000_000_000_000_000;
        let ds = Dataset::from_records(vec![
            record("W1", 1, "a", [big, 0, 0, 0]),
            record("W1", 1, "b", [big, 0, 0, 0]),
        ]);
        let series = aggregate(&ds, &MetricSelection::from([Metric::Impression])).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].value, 1e19);
    }

    #[test]
    fn empty_dataset_yields_empty_series() {
        let series = aggregate(&Dataset::default(), &default_selection()).unwrap();
        assert!(series.is_empty());
    }
}
