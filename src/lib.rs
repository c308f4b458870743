//! Election data explorer core: parse tabular and GeoJSON inputs, join them,
//! grade features on a numeric metric and summarise columns.

pub mod color;
pub mod data;
pub mod state;
