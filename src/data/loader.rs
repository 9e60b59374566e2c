use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, Dataset, RawTable, Record};
use crate::error::DataError;

type Result<T> = std::result::Result<T, DataError>;

// ---------------------------------------------------------------------------
// Record file columns
// ---------------------------------------------------------------------------

pub const WEEK: &str = "week";
pub const WEEK_NUMBER: &str = "week_number";
pub const SEARCH_QUERY: &str = "search_query";
pub const IMPRESSION_COUNT: &str = "imp_total_count";
pub const CLICK_COUNT: &str = "clk_total_count";
pub const CART_ADD_COUNT: &str = "cart_total_count";
pub const PURCHASE_COUNT: &str = "pur_total_count";
pub const CLICK_RATE: &str = "clk_click_rate";
pub const CART_ADD_RATE: &str = "cart_add_rate";
pub const PURCHASE_RATE: &str = "pur_purchase_rate";
/// The upstream export misspells this column.
pub const SEARCH_QUERY_VOLUME: &str = "search_quey_volume";
const SEARCH_QUERY_VOLUME_ALIAS: &str = "search_query_volume";

/// Tokens read as missing, matching the pandas CSV defaults.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the record file and build the session dataset.
pub fn load_records(path: &Path) -> Result<Dataset> {
    let table = load_table(path)?;
    let dataset = dataset_from_table(&table)?;
    log::info!(
        "Loaded {} of {} rows from {} ({} weeks)",
        dataset.len(),
        table.len(),
        path.display(),
        dataset.weeks().len()
    );
    Ok(dataset)
}

/// Load any supported table file without typing its columns.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one line per row
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv_source(path, open(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedFormat(other.to_string())),
    }
}

/// Directories open fine on some platforms; they are still unreadable.
fn open(path: &Path) -> Result<File> {
    let file = File::open(path).map_err(|source| unavailable(path, source))?;
    let meta = file.metadata().map_err(|source| unavailable(path, source))?;
    if meta.is_dir() {
        return Err(unavailable(path, std::io::Error::other("is a directory")));
    }
    Ok(file)
}

fn unavailable(path: &Path, source: std::io::Error) -> DataError {
    DataError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// Row typing: RawTable → Dataset
// ---------------------------------------------------------------------------

/// Positions of the record columns inside a [`RawTable`].
struct Columns {
    week: usize,
    week_number: usize,
    search_query: usize,
    impression_count: usize,
    click_count: usize,
    cart_add_count: usize,
    purchase_count: usize,
    click_rate: usize,
    cart_add_rate: usize,
    purchase_rate: usize,
    search_query_volume: usize,
}

impl Columns {
    fn resolve(table: &RawTable) -> Result<Self> {
        let find = |name: &'static str| table.column_index(name).ok_or(DataError::MissingColumn(name));
        Ok(Columns {
            week: find(WEEK)?,
            week_number: find(WEEK_NUMBER)?,
            search_query: find(SEARCH_QUERY)?,
            impression_count: find(IMPRESSION_COUNT)?,
            click_count: find(CLICK_COUNT)?,
            cart_add_count: find(CART_ADD_COUNT)?,
            purchase_count: find(PURCHASE_COUNT)?,
            click_rate: find(CLICK_RATE)?,
            cart_add_rate: find(CART_ADD_RATE)?,
            purchase_rate: find(PURCHASE_RATE)?,
            search_query_volume: find(SEARCH_QUERY_VOLUME)
                .or_else(|_| find(SEARCH_QUERY_VOLUME_ALIAS))?,
        })
    }

    /// Type one complete row. `None` when a count or the week number is not
    /// a non-negative integer.
    fn record(&self, row_no: usize, row: &[CellValue]) -> Option<Record> {
        let week_number = row[self.week_number].to_count()?;
        Some(Record {
            week: row[self.week].to_label()?,
            week_number: i64::try_from(week_number).ok()?,
            search_query: row[self.search_query].to_label()?,
            impression_count: row[self.impression_count].to_count()?,
            click_count: row[self.click_count].to_count()?,
            cart_add_count: row[self.cart_add_count].to_count()?,
            purchase_count: row[self.purchase_count].to_count()?,
            click_rate: rate(row_no, CLICK_RATE, &row[self.click_rate]),
            cart_add_rate: rate(row_no, CART_ADD_RATE, &row[self.cart_add_rate]),
            purchase_rate: rate(row_no, PURCHASE_RATE, &row[self.purchase_rate]),
            search_query_volume: row[self.search_query_volume].to_count()?,
        })
    }
}

fn rate(row_no: usize, column: &str, cell: &CellValue) -> Option<f64> {
    let value = cell.to_numeric();
    if value.is_none() {
        log::debug!("Row {row_no}: malformed numeric field {column} = '{cell}', treated as missing");
    }
    value
}

/// Drop incomplete rows, then type the survivors.
///
/// The whole-row drop looks at every column, typed or not. Rate columns are
/// coerced afterwards, so an unparsable rate leaves the row in place with a
/// missing value.
pub fn dataset_from_table(table: &RawTable) -> Result<Dataset> {
    let columns = Columns::resolve(table)?;

    let mut records = Vec::with_capacity(table.len());
    let mut incomplete = 0usize;

    for (row_no, row) in table.rows.iter().enumerate() {
        if row.len() < table.headers.len() || row.iter().any(CellValue::is_null) {
            incomplete += 1;
            continue;
        }
        match columns.record(row_no, row) {
            Some(record) => records.push(record),
            None => log::warn!("Row {row_no}: count or week number is not a non-negative integer, dropping"),
        }
    }

    if incomplete > 0 {
        log::warn!("Dropped {incomplete} rows with missing values");
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read a headed CSV table. Short rows are padded with nulls.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    Ok(csv_table(reader)?)
}

/// Like [`read_csv`], but read failures of the underlying file count as an
/// unavailable source rather than a malformed one.
fn read_csv_source<R: Read>(path: &Path, reader: R) -> Result<RawTable> {
    csv_table(reader).map_err(|err| {
        if !matches!(err.kind(), csv::ErrorKind::Io(_)) {
            return DataError::from(err);
        }
        match err.into_kind() {
            csv::ErrorKind::Io(source) => unavailable(path, source),
            other => DataError::Malformed(format!("{other:?}")),
        }
    })
}

fn csv_table<R: Read>(reader: R) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<CellValue> = record.iter().take(headers.len()).map(csv_cell).collect();
        row.resize(headers.len(), CellValue::Null);
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// CSV cells stay textual and untrimmed so labels such as ` 007 ` are kept
/// verbatim. Whitespace only matters for the NA check and number parsing.
fn csv_cell(s: &str) -> CellValue {
    if NA_TOKENS.contains(&s.trim()) {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nulls and float NaNs read as missing.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col, row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null),
    }
}

fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}
