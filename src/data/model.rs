use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell in a source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV or Parquet, before the
/// record columns are given their real types.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion: numbers pass through, text is parsed, everything
    /// else (and non-finite results) is missing.
    pub fn to_numeric(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Interpret the cell as a non-negative integer. Integral floats such as
    /// `12.0` are accepted.
    pub fn to_count(&self) -> Option<u64> {
        match self {
            CellValue::Integer(i) => u64::try_from(*i).ok(),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral_u64))
            }
            CellValue::Float(v) => integral_u64(*v),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Text form of the cell, used for label columns.
    pub fn to_label(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn integral_u64(v: f64) -> Option<u64> {
    (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}

// ---------------------------------------------------------------------------
// RawTable – header + untyped rows
// ---------------------------------------------------------------------------

/// A source table with its original header order. Used as the intermediate
/// form of the record file and as the final form of the totals summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one week × search query
// ---------------------------------------------------------------------------

/// One aggregated row of the record file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub week: String,
    /// Chronological sort key for `week`.
    pub week_number: i64,
    pub search_query: String,
    pub impression_count: u64,
    pub click_count: u64,
    pub cart_add_count: u64,
    pub purchase_count: u64,
    /// Rates are `None` when the source cell could not be read as a number.
    pub click_rate: Option<f64>,
    pub cart_add_rate: Option<f64>,
    pub purchase_rate: Option<f64>,
    pub search_query_volume: u64,
}

/// A distinct week label together with its chronological key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub number: i64,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded record set
// ---------------------------------------------------------------------------

/// The immutable record set of a session, plus the chronological week index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    weeks: Vec<WeekKey>,
}

impl Dataset {
    /// Build the week index from the loaded records.
    ///
    /// A week label seen with several `week_number`s is keyed by the
    /// smallest one so the ordering stays total.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut by_label: BTreeMap<&str, i64> = BTreeMap::new();
        for rec in &records {
            by_label
                .entry(rec.week.as_str())
                .and_modify(|n| *n = (*n).min(rec.week_number))
                .or_insert(rec.week_number);
        }
        let mut weeks: Vec<WeekKey> = by_label
            .into_iter()
            .map(|(label, number)| WeekKey {
                number,
                label: label.to_string(),
            })
            .collect();
        weeks.sort();

        Dataset { records, weeks }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct weeks in chronological order.
    pub fn weeks(&self) -> &[WeekKey] {
        &self.weeks
    }

    /// Position of a week label on the chronological axis.
    pub fn week_position(&self, label: &str) -> Option<usize> {
        self.weeks.iter().position(|w| w.label == label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
