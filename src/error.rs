use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source could not be read at all. Fatal for the session.
    #[error("data source '{}' is unavailable: {source}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("source is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("malformed source: {0}")]
    Malformed(String),
    /// The metric multi-select is empty; the trend chart is skipped.
    #[error("please select at least one metric to display")]
    NoMetricSelected,
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Malformed(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for DataError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        DataError::Malformed(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for DataError {
    fn from(err: arrow::error::ArrowError) -> Self {
        DataError::Malformed(err.to_string())
    }
}
