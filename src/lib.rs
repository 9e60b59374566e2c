//! Weekly advertising-performance analytics.
//!
//! The [`data`] module holds everything that does not depend on a UI: loading
//! the record file, the per-week metric aggregation, and the query-level
//! filters. The desktop binary only renders what these functions return.

pub mod data;
pub mod error;

pub use error::DataError;
