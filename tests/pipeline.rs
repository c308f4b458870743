use electoral_lens::color::{self, interpolate, BASELINE};
use electoral_lens::data::fuse::{fuse, infer_join_key};
use electoral_lens::data::loader::{load_str, parse_geo, parse_tabular, FileFormat};
use electoral_lens::data::model::Value;
use electoral_lens::data::stats::compute_statistics;
use electoral_lens::state::{Action, AppState};

const DISTRICTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature",
      "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] },
      "properties": { "district_id": "D01", "name": "North" } },
    { "type": "Feature",
      "geometry": { "type": "Polygon", "coordinates": [[[1,0],[2,0],[2,1],[1,1],[1,0]]] },
      "properties": { "district_id": "D02", "name": "South" } },
    { "type": "Feature",
      "geometry": { "type": "Polygon", "coordinates": [[[2,0],[3,0],[3,1],[2,1],[2,0]]] },
      "properties": { "district_id": "D03", "name": "East" } }
  ]
}"#;

const RESULTS: &str = "\
district_id,party,turnout,votes
D01,Red,0.50,1000
D02,Blue,0.75,
D04,Green,0.90,400
";

#[test]
fn parse_fuse_scale_and_summarise() {
    let geo = parse_geo(DISTRICTS).unwrap();
    let rows = parse_tabular(RESULTS, FileFormat::Csv).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(infer_join_key(&geo, &rows).as_deref(), Some("district_id"));
    let merged = fuse(&geo, &rows);
    assert_eq!(merged.len(), geo.len());
    assert_eq!(merged.features[0].properties["party"], Value::from("Red"));
    assert_eq!(merged.features[1].properties["votes"], Value::Null);
    assert!(!merged.features[2].properties.contains_key("turnout"));

    // D04 has no polygon, so the domain is [0.5, 0.75].
    let colors = color::scale(&merged, "turnout");
    let baseline: color::Color = BASELINE.into_format();
    assert_eq!(colors, vec![interpolate(0.0), interpolate(1.0), baseline]);

    let stats = compute_statistics(&rows);
    let turnout = &stats["turnout"];
    assert_eq!(turnout.min, Some(0.5));
    assert_eq!(turnout.max, Some(0.9));
    assert_eq!(stats["votes"].mean, Some(700.0));
    assert_eq!(stats["party"].mode, Some(Value::from("Red")));
    assert!(stats["party"].mean.is_none());
}

#[test]
fn reducer_drives_the_whole_pipeline() {
    let dataset = load_str("districts.geojson", DISTRICTS).unwrap();
    let state = AppState::default()
        .reduce(Action::LoadStarted { file_name: dataset.file_name.clone() })
        .reduce(Action::Loaded(dataset));

    // Properties hold no numbers, so nothing is graded.
    assert!(state.metrics.is_empty());
    assert_eq!(state.colors.len(), 3);

    let state = state.reduce(Action::LoadFailed("Error: broken".into()));
    assert!(state.merged.is_none());
    assert!(state.tabular.is_none());
    assert!(state.statistics.is_none());
    assert_eq!(state.error.as_deref(), Some("Error: broken"));
}

#[test]
fn statistics_serialize_in_panel_shape() {
    let rows = parse_tabular("a\n1\n2\n3\n", FileFormat::Csv).unwrap();
    let json = serde_json::to_value(compute_statistics(&rows)).unwrap();
    let a = &json["a"];
    assert_eq!(a["mean"], 2.0);
    assert_eq!(a["median"], 2.0);
    assert_eq!(a["mode"], 1.0);
    assert_eq!(a["min"], 1.0);
    assert_eq!(a["max"], 3.0);
    let std_dev = a["stdDev"].as_f64().unwrap();
    assert!((std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
}
