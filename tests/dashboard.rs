use std::path::{Path, PathBuf};
use std::sync::Arc;

use ad_insights::DataError;
use ad_insights::data::filter::{
    FunnelTotals, QueryFilter, WeekFilter, filter_rows, filter_volume, filtered_indices,
    week_options,
};
use ad_insights::data::loader::{load_records, load_table};
use ad_insights::data::metrics::{Metric, MetricSelection, aggregate, default_selection};
use ad_insights::data::model::{CellValue, Dataset};
use ad_insights::data::scatter::{RateField, rate_points};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn dataset() -> Dataset {
    load_records(&fixture("week_data.csv")).expect("fixture loads")
}

fn week(label: &str) -> WeekFilter {
    WeekFilter::Week(label.to_string())
}

#[test]
fn incomplete_rows_are_dropped_and_weeks_are_chronological() {
    let ds = dataset();
    assert_eq!(ds.len(), 6);
    let labels: Vec<&str> = ds.weeks().iter().map(|w| w.label.as_str()).collect();
    assert_eq!(labels, ["Wk 9", "Wk 10", "Wk 11"]);
    assert_eq!(
        week_options(&ds),
        [WeekFilter::All, week("Wk 9"), week("Wk 10"), week("Wk 11")]
    );
}

#[test]
fn unfiltered_view_returns_every_record() {
    let ds = dataset();
    let view = filter_rows(&ds, &QueryFilter::default());
    assert_eq!(view.row_count(), ds.len());
    assert_eq!(
        view.totals,
        FunnelTotals {
            impressions: 1200,
            cart_adds: 25,
            purchases: 11
        }
    );
}

#[test]
fn week_and_query_filter_with_totals() {
    let view = filter_rows(&dataset(), &QueryFilter::new(week("Wk 9"), "shoe"));
    let queries: Vec<&str> = view.rows.iter().map(|r| r.search_query.as_str()).collect();
    assert_eq!(queries, ["blue shoe", "Running Shoes"]);
    assert_eq!(
        view.totals,
        FunnelTotals {
            impressions: 400,
            cart_adds: 11,
            purchases: 4
        }
    );
}

#[test]
fn case_of_the_needle_does_not_matter() {
    let ds = dataset();
    for w in week_options(&ds) {
        let lower = filter_rows(&ds, &QueryFilter::new(w.clone(), "shoe"));
        let upper = filter_rows(&ds, &QueryFilter::new(w, "SHOE"));
        assert_eq!(lower, upper);
    }
}

#[test]
fn filtering_a_filtered_set_changes_nothing() {
    let ds = dataset();
    let filter = QueryFilter::new(WeekFilter::All, "hat");
    let once: Vec<_> = filtered_indices(&ds, &filter)
        .into_iter()
        .map(|i| ds.records()[i].clone())
        .collect();
    let narrowed = Dataset::from_records(once.clone());
    let twice = filter_rows(&narrowed, &filter);
    assert_eq!(twice.row_count(), once.len());
    assert_eq!(filter_rows(&narrowed, &filter), filter_rows(&ds, &filter));
}

#[test]
fn malformed_rate_keeps_the_row() {
    let ds = dataset();
    let view = filter_rows(&ds, &QueryFilter::new(WeekFilter::All, "wool"));
    assert_eq!(view.row_count(), 1);

    let wool = ds
        .records()
        .iter()
        .find(|r| r.search_query == "wool hat")
        .expect("wool hat survives the drop");
    assert_eq!(wool.purchase_rate, None);
    assert_eq!(wool.cart_add_rate, Some(25.0));

    assert_eq!(rate_points(&ds, RateField::Purchase, RateField::CartAdd).len(), 5);
    assert_eq!(rate_points(&ds, RateField::Click, RateField::CartAdd).len(), 6);
}

#[test]
fn weekly_means_per_metric() {
    let ds = dataset();
    let series = aggregate(&ds, &MetricSelection::from([Metric::Impression])).unwrap();
    let got: Vec<(&str, f64)> = series.iter().map(|p| (p.week.as_str(), p.value)).collect();
    assert_eq!(got, [("Wk 9", 150.0), ("Wk 10", 300.0), ("Wk 11", 150.0)]);

    let all = aggregate(&ds, &default_selection()).unwrap();
    assert_eq!(all.len(), 4 * ds.weeks().len());
    for point in &all {
        let values: Vec<u64> = ds
            .records()
            .iter()
            .filter(|r| r.week == point.week)
            .map(|r| point.metric.value(r))
            .collect();
        let mean = values.iter().sum::<u64>() as f64 / values.len() as f64;
        assert_eq!(point.value, mean);
    }
}

#[test]
fn no_metric_selected_is_a_warning_not_a_panic() {
    let err = aggregate(&dataset(), &MetricSelection::new()).unwrap_err();
    assert!(matches!(err, DataError::NoMetricSelected));
    assert!(err.to_string().contains("at least one metric"));
}

#[test]
fn volume_view_is_independent_of_performance_columns() {
    let ds = dataset();
    let hats = filter_volume(&ds, &QueryFilter::new(WeekFilter::All, "hat"));
    assert_eq!(hats.row_count(), 2);
    assert_eq!(hats.total_volume, 200);

    let everything = filter_volume(&ds, &QueryFilter::default());
    assert_eq!(everything.total_volume, 2250);

    let empty = filter_volume(&ds, &QueryFilter::new(week("Wk 11"), "hat"));
    assert_eq!(empty.row_count(), 0);
    assert_eq!(empty.total_volume, 0);
}

#[test]
fn totals_summary_loads_as_raw_table() {
    let table = load_table(&fixture("total_data.csv")).unwrap();
    assert_eq!(table.headers.len(), 6);
    assert_eq!(table.len(), 3);
    assert_eq!(table.rows[1][0], CellValue::String("Wk 10".into()));
}

#[test]
fn missing_file_is_data_unavailable() {
    let err = load_records(&fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DataError::DataUnavailable { .. }));
}

#[test]
fn parquet_records_follow_the_same_rules() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("week", DataType::Utf8, false),
        Field::new("week_number", DataType::Int64, false),
        Field::new("search_query", DataType::Utf8, true),
        Field::new("imp_total_count", DataType::Int64, false),
        Field::new("clk_total_count", DataType::Int64, false),
        Field::new("cart_total_count", DataType::Int64, false),
        Field::new("pur_total_count", DataType::Int64, false),
        Field::new("clk_click_rate", DataType::Float64, false),
        Field::new("cart_add_rate", DataType::Float64, false),
        Field::new("pur_purchase_rate", DataType::Utf8, false),
        Field::new("search_quey_volume", DataType::Int64, false),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec!["W2", "W1", "W1"])),
        Arc::new(Int64Array::from(vec![2, 1, 1])),
        Arc::new(StringArray::from(vec![Some("shoe"), None, Some("hat")])),
        Arc::new(Int64Array::from(vec![10, 20, 30])),
        Arc::new(Int64Array::from(vec![1, 2, 3])),
        Arc::new(Int64Array::from(vec![1, 1, 1])),
        Arc::new(Int64Array::from(vec![0, 1, 0])),
        Arc::new(Float64Array::from(vec![10.0, 10.0, 10.0])),
        Arc::new(Float64Array::from(vec![100.0, 50.0, 33.3])),
        Arc::new(StringArray::from(vec!["0.0", "50.0", "bad"])),
        Arc::new(Int64Array::from(vec![5, 6, 7])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

    let path = std::env::temp_dir().join(format!("ad_insights_{}.parquet", std::process::id()));
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_records(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(ds.len(), 2);
    assert_eq!(ds.weeks()[0].label, "W1");
    let hat = &ds.records()[1];
    assert_eq!(hat.search_query, "hat");
    assert_eq!(hat.purchase_rate, None);
    assert_eq!(hat.cart_add_rate, Some(33.3));
}
