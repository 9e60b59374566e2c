/// Data layer: core types, loading, aggregation and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → drop incomplete rows → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  Vec<Record>, chronological week index (immutable)
///   └──────────┘
///        │
///        ├──────────────┬───────────────┬──────────────┐
///        ▼              ▼               ▼              ▼
///   ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌─────────┐
///   │ metrics │   │  filter  │   │  filter  │   │ scatter │
///   │ (mean/  │   │ (query   │   │ (search  │   │ (rate   │
///   │  week)  │   │  perf.)  │   │  volume) │   │  pairs) │
///   └─────────┘   └──────────┘   └──────────┘   └─────────┘
/// ```
///
/// Every function downstream of the loader is a pure function of the
/// dataset and its inputs.

pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod scatter;
