use serde_json::Value as JsonValue;

/// A closed outline as `[x, y]` (longitude, latitude) pairs.
pub type Ring = Vec<[f64; 2]>;

/// Outer and inner rings of a `Polygon` or `MultiPolygon` geometry.
///
/// Other geometry kinds and malformed coordinates yield no rings; positions
/// with fewer than two numbers are skipped.
pub fn polygon_rings(geometry: &JsonValue) -> Vec<Ring> {
    let coords = geometry.get("coordinates");
    match geometry.get("type").and_then(|t| t.as_str()) {
        Some("Polygon") => coords.map(rings_of_polygon).unwrap_or_default(),
        Some("MultiPolygon") => coords
            .and_then(|c| c.as_array())
            .map(|polys| polys.iter().flat_map(rings_of_polygon).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn rings_of_polygon(polygon: &JsonValue) -> Vec<Ring> {
    polygon
        .as_array()
        .map(|rings| {
            rings
                .iter()
                .filter_map(|ring| ring.as_array())
                .map(|ring| ring.iter().filter_map(position).collect::<Ring>())
                .filter(|ring| ring.len() >= 3)
                .collect()
        })
        .unwrap_or_default()
}

fn position(pos: &JsonValue) -> Option<[f64; 2]> {
    let pos = pos.as_array()?;
    Some([pos.first()?.as_f64()?, pos.get(1)?.as_f64()?])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_polygon() {
        let g = json!({ "type": "Polygon", "coordinates": [
            [[0, 0], [4, 0], [4, 4], [0, 0]],
            [[1, 1], [2, 1], [2, 2], [1, 1]]
        ]});
        let rings = polygon_rings(&g);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], [4.0, 0.0]);
    }

    #[test]
    fn test_multipolygon() {
        let g = json!({ "type": "MultiPolygon", "coordinates": [
            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            [[[5, 5], [6, 5], [6, 6], [5, 5]]]
        ]});
        let rings = polygon_rings(&g);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], [5.0, 5.0]);
    }

    #[test]
    fn test_other_geometries_have_no_rings() {
        assert!(polygon_rings(&json!({ "type": "Point", "coordinates": [1, 2] })).is_empty());
        assert!(polygon_rings(&json!({ "type": "Polygon" })).is_empty());
        assert!(polygon_rings(&json!({ "type": "Polygon", "coordinates": [[[0, 0], ["x", 1]]] }))
            .is_empty());
    }
}
