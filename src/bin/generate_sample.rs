use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const RECORDS_CSV: &str = "week_data_cleaned.csv";
const RECORDS_PARQUET: &str = "week_data_cleaned.parquet";
const TOTALS_CSV: &str = "total_data.csv";

const QUERIES: &[(&str, f64)] = &[
    ("running shoes", 1.0),
    ("trail running shoes women", 0.45),
    ("blue suede shoe", 0.2),
    ("wool beanie hat", 0.6),
    ("red baseball hat", 0.35),
    ("waterproof hiking boots", 0.5),
    ("kids rain boots", 0.3),
    ("gym socks 6 pack", 0.8),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One output row. `None` cells are written blank so the loader drops them.
struct SampleRow {
    week: String,
    week_number: i64,
    search_query: Option<String>,
    counts: [Option<u64>; 4],
    rates: [String; 3],
    volume: u64,
}

fn rate(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        "0.0".to_string()
    } else {
        format!("{:.2}", numerator as f64 * 100.0 / denominator as f64)
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for week_number in 1..=12i64 {
        let season = 1.0 + 0.3 * (week_number as f64 / 2.0).sin();
        for (q, &(query, popularity)) in QUERIES.iter().enumerate() {
            let volume = (rng.between(800.0, 1500.0) * popularity * season) as u64;
            let impressions = (volume as f64 * rng.between(2.0, 6.0)) as u64;
            let clicks = (impressions as f64 * rng.between(0.01, 0.06)) as u64;
            let cart_adds = (clicks as f64 * rng.between(0.05, 0.3)) as u64;
            let purchases = (cart_adds as f64 * rng.between(0.2, 0.7)) as u64;

            let mut row = SampleRow {
                week: format!("2024-W{week_number:02}"),
                week_number,
                search_query: Some(query.to_string()),
                counts: [Some(impressions), Some(clicks), Some(cart_adds), Some(purchases)],
                rates: [
                    rate(clicks, impressions),
                    rate(cart_adds, clicks),
                    rate(purchases, cart_adds),
                ],
                volume,
            };

            // A few imperfect rows: a blank query, a blank count and an
            // unparsable rate.
            match (week_number, q) {
                (3, 1) => row.search_query = None,
                (5, 4) => row.counts[2] = None,
                (7, 2) | (10, 6) => row.rates[2] = "--".to_string(),
                _ => {}
            }
            rows.push(row);
        }
    }
    rows
}

fn write_csv(rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(RECORDS_CSV).context("creating records CSV")?;
    writer.write_record([
        "week",
        "week_number",
        "search_query",
        "imp_total_count",
        "clk_total_count",
        "cart_total_count",
        "pur_total_count",
        "clk_click_rate",
        "cart_add_rate",
        "pur_purchase_rate",
        "search_quey_volume",
    ])?;
    let cell = |c: Option<u64>| c.map(|v| v.to_string()).unwrap_or_default();
    for row in rows {
        writer.write_record([
            row.week.clone(),
            row.week_number.to_string(),
            row.search_query.clone().unwrap_or_default(),
            cell(row.counts[0]),
            cell(row.counts[1]),
            cell(row.counts[2]),
            cell(row.counts[3]),
            row.rates[0].clone(),
            row.rates[1].clone(),
            row.rates[2].clone(),
            row.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow]) -> Result<()> {
    let count_col = |i: usize| -> ArrayRef {
        Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| r.counts[i].map(|v| v as i64))
                .collect::<Vec<_>>(),
        ))
    };
    let rate_col = |i: usize| -> ArrayRef {
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.rates[i].as_str()).collect::<Vec<_>>(),
        ))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("week", DataType::Utf8, false),
        Field::new("week_number", DataType::Int64, false),
        Field::new("search_query", DataType::Utf8, true),
        Field::new("imp_total_count", DataType::Int64, true),
        Field::new("clk_total_count", DataType::Int64, true),
        Field::new("cart_total_count", DataType::Int64, true),
        Field::new("pur_total_count", DataType::Int64, true),
        Field::new("clk_click_rate", DataType::Utf8, false),
        Field::new("cart_add_rate", DataType::Utf8, false),
        Field::new("pur_purchase_rate", DataType::Utf8, false),
        Field::new("search_quey_volume", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.week.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.week_number).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter()
                .map(|r| r.search_query.as_deref())
                .collect::<Vec<_>>(),
        )),
        count_col(0),
        count_col(1),
        count_col(2),
        count_col(3),
        rate_col(0),
        rate_col(1),
        rate_col(2),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.volume as i64).collect::<Vec<_>>(),
        )),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(RECORDS_PARQUET).context("creating records parquet")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Per-week sums over complete rows.
fn write_totals(rows: &[SampleRow]) -> Result<()> {
    let mut per_week: BTreeMap<i64, (String, [u64; 4])> = BTreeMap::new();
    for row in rows {
        let entry = per_week
            .entry(row.week_number)
            .or_insert_with(|| (row.week.clone(), [0; 4]));
        for (sum, count) in entry.1.iter_mut().zip(row.counts) {
            *sum += count.unwrap_or(0);
        }
    }

    let mut writer = csv::Writer::from_path(TOTALS_CSV).context("creating totals CSV")?;
    writer.write_record([
        "week",
        "week_number",
        "imp_total_count",
        "clk_total_count",
        "cart_total_count",
        "pur_total_count",
    ])?;
    for (week_number, (week, sums)) in &per_week {
        let mut record = vec![week.clone(), week_number.to_string()];
        record.extend(sums.iter().map(u64::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;
    write_totals(&rows)?;

    log::info!("Wrote {} rows to {RECORDS_CSV}, {RECORDS_PARQUET} and {TOTALS_CSV}", rows.len());
    println!("Wrote {} rows ({} queries x 12 weeks)", rows.len(), QUERIES.len());
    Ok(())
}
