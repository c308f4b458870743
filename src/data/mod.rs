/// Data layer: core types, parsing, fusion and statistics.
///
/// Architecture:
/// ```text
///  .csv          .json / .geojson
///    │                 │
///    ▼                 ▼
///   ┌──────────────────────┐
///   │        loader        │  parse text → Vec<Record> / FeatureCollection
///   └──────────────────────┘
///    │                 │
///    │                 ▼
///    │           ┌──────────┐
///    ├──────────▶│   fuse   │  join records onto features by shared key
///    │           └──────────┘
///    ▼                 │
///   ┌──────────┐       ▼
///   │  stats   │   crate::color  (choropleth per feature)
///   └──────────┘
/// ```

pub mod error;
pub mod fuse;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod stats;
