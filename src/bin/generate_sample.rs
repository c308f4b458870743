//! Writes a synthetic election dataset: a grid of district polygons as
//! GeoJSON plus a results CSV keyed on the same `district_id`.

use anyhow::{Context, Result};
use serde_json::{json, Value as JsonValue};

const COLS: usize = 6;
const ROWS: usize = 4;
const PARTIES: [&str; 3] = ["Red", "Blue", "Green"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// A unit square at grid cell (`col`, `row`), offset to a plausible lon/lat.
fn district_polygon(col: usize, row: usize) -> JsonValue {
    let (x0, y0) = (-5.0 + col as f64 * 0.5, 50.0 + row as f64 * 0.5);
    let (x1, y1) = (x0 + 0.5, y0 + 0.5);
    json!({
        "type": "Polygon",
        "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
    })
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut features = Vec::new();
    let mut results = csv::Writer::from_path("sample_results.csv")
        .context("creating sample_results.csv")?;
    results.write_record(["district_id", "party", "turnout", "votes_red", "votes_blue", "votes_green"])?;

    for row in 0..ROWS {
        for col in 0..COLS {
            let n = row * COLS + col + 1;
            let id = format!("D{n:02}");
            let registered = rng.range(8_000.0, 40_000.0).round();

            features.push(json!({
                "type": "Feature",
                "geometry": district_polygon(col, row),
                "properties": {
                    "district_id": &id,
                    "name": format!("District {n}"),
                    "registered_voters": registered,
                }
            }));

            let turnout = rng.range(0.45, 0.85);
            let shares: Vec<f64> = PARTIES.iter().map(|_| rng.range(0.1, 1.0)).collect();
            let total: f64 = shares.iter().sum();
            let votes: Vec<f64> = shares
                .iter()
                .map(|s| (registered * turnout * s / total).round())
                .collect();
            let winner = votes
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| PARTIES[i])
                .unwrap_or_default();

            results.write_record([
                id,
                winner.to_string(),
                format!("{turnout:.3}"),
                votes[0].to_string(),
                votes[1].to_string(),
                votes[2].to_string(),
            ])?;
        }
    }
    results.flush().context("writing sample_results.csv")?;

    let collection = json!({ "type": "FeatureCollection", "features": features });
    let text = serde_json::to_string_pretty(&collection)?;
    std::fs::write("sample_districts.geojson", text).context("writing sample_districts.geojson")?;

    println!(
        "Wrote {} districts to sample_districts.geojson and sample_results.csv",
        ROWS * COLS
    );
    Ok(())
}
