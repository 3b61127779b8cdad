/// Data layer: loading, cleaning, filtering, aggregation and summaries.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop incomplete / negative / undated rows → Table
///   └──────────┘
///        │
///        ├──────────────────┐
///        ▼                  ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │      │ aggregate  │  per-month national mean
///   └──────────┘      └───────────┘
///        │                  │
///        └────────┬─────────┘
///                 ▼
///           ┌──────────┐
///           │ summary   │  first → last percent change
///           └──────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
