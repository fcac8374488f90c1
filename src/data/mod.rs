/// Data layer: core types, loading, minima extraction and aggregation.
///
/// Architecture:
/// ```text
///  {"pae": [[...], ...]}
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse payload → ErrorMatrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  minima   │  row / column minima over [L, N) → forward + reciprocal
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  label with residue num / identity / file id
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  outer join across files → CombinedTable ×2
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod minima;
pub mod model;
pub mod summary;
