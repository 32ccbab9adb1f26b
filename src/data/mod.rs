/// Data layer: canonical records, loading, and the query pipeline.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌───────────┐
///   │  loader    │  parse file → raw rows
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  raw rows → Dataset (ContentRecord | UserRecord)
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │  filter    │  criteria + title search
///   └───────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ sort / dedupe  │  order configured per screen
///   └───────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │ paginate  │   │ aggregate  │  KPIs, groups, histogram, top-N
///   └──────────┘   └───────────┘
/// ```

pub mod aggregate;
pub mod dedupe;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod paginate;
pub mod pipeline;
pub mod sort;
