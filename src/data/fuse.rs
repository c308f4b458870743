use std::collections::HashMap;

use log::{debug, info};

use super::model::{Feature, FeatureCollection, Record, Value};

// ---------------------------------------------------------------------------
// Join key inference
// ---------------------------------------------------------------------------

/// The first attribute of the first feature (in insertion order) that also
/// appears in the first tabular record.
///
/// This is a heuristic: nothing checks that the key is unique in either set.
/// Callers that know their key should use [`fuse_on`].
pub fn infer_join_key(geo: &FeatureCollection, tabular: &[Record]) -> Option<String> {
    let geo_attrs = &geo.features.first()?.properties;
    let first_row = tabular.first()?;
    geo_attrs
        .keys()
        .find(|k| first_row.contains_key(k.as_str()))
        .cloned()
}

// ---------------------------------------------------------------------------
// Fusion
// ---------------------------------------------------------------------------

/// Join tabular records onto geo features using the inferred key.
///
/// Without a common key the geo collection is returned as-is; the map still
/// renders with geo-only attributes.
pub fn fuse(geo: &FeatureCollection, tabular: &[Record]) -> FeatureCollection {
    match infer_join_key(geo, tabular) {
        Some(key) => fuse_on(geo, tabular, &key),
        None => {
            debug!("No common join key between geo attributes and tabular columns");
            geo.clone()
        }
    }
}

/// Join tabular records onto geo features on `key`.
///
/// * Matching is type-exact: `Number(7)` never matches `Text("7")`.
/// * When several records share a key value the last one wins.
/// * Matched features keep all their attributes; tabular values overwrite
///   on collision. Unmatched features pass through unchanged.
/// * Output order and length always equal the input geo collection's.
pub fn fuse_on(geo: &FeatureCollection, tabular: &[Record], key: &str) -> FeatureCollection {
    // Later inserts replace earlier ones, so duplicates resolve to the last row.
    let lookup: HashMap<&Value, &Record> = tabular
        .iter()
        .filter_map(|row| row.get(key).map(|v| (v, row)))
        .collect();

    let mut matched = 0usize;
    let features = geo
        .features
        .iter()
        .map(|feature| {
            let row = feature.properties.get(key).and_then(|v| lookup.get(v));
            match row {
                Some(row) => {
                    matched += 1;
                    merge(feature, row)
                }
                None => feature.clone(),
            }
        })
        .collect();

    info!(
        "Fused on '{key}': {matched} of {} features matched {} records",
        geo.len(),
        tabular.len()
    );
    FeatureCollection { features }
}

fn merge(feature: &Feature, row: &Record) -> Feature {
    let mut properties = feature.properties.clone();
    for (k, v) in row {
        properties.insert(k.clone(), v.clone());
    }
    Feature {
        geometry: feature.geometry.clone(),
        properties,
    }
}
