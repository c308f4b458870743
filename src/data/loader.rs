use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Dataset, Feature, FeatureCollection, Record, Value};

// ---------------------------------------------------------------------------
// Format dispatch
// ---------------------------------------------------------------------------

/// Textual input formats understood by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    GeoJson,
}

impl FileFormat {
    /// Select a format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self, LoadError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" | "geojson" => Ok(FileFormat::GeoJson),
            other => Err(LoadError::UnsupportedFileType(format!(".{other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file on disk. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`                – header row plus data rows, comma separated
/// * `.json` / `.geojson`  – a GeoJSON `FeatureCollection`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    // Reject unknown extensions before touching the file.
    FileFormat::from_file_name(&file_name)?;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let dataset = load_str(&file_name, &text)
        .with_context(|| format!("loading {file_name}"))?;
    Ok(dataset)
}

/// Build a [`Dataset`] from already-read file content.
///
/// GeoJSON input yields both the feature collection and its properties as
/// tabular records; CSV input yields tabular records only.
pub fn load_str(file_name: &str, text: &str) -> Result<Dataset, LoadError> {
    let dataset = match FileFormat::from_file_name(file_name)? {
        FileFormat::Csv => Dataset {
            file_name: file_name.to_string(),
            geo: None,
            tabular: Some(parse_csv(text)?),
        },
        FileFormat::GeoJson => {
            let root: JsonValue = serde_json::from_str(strip_bom(text))?;
            let geo = features_from_json(&root)?;
            let rows = records_from_json(&root)?;
            Dataset {
                file_name: file_name.to_string(),
                geo: Some(geo),
                tabular: (!rows.is_empty()).then_some(rows),
            }
        }
    };

    info!(
        "Loaded {file_name}: {} features, {} records",
        dataset.geo.as_ref().map_or(0, |g| g.len()),
        dataset.tabular.as_ref().map_or(0, |t| t.len()),
    );
    Ok(dataset)
}

/// Parse tabular text into flat records.
pub fn parse_tabular(text: &str, format: FileFormat) -> Result<Vec<Record>, LoadError> {
    match format {
        FileFormat::Csv => parse_csv(text),
        FileFormat::GeoJson => {
            let root: JsonValue = serde_json::from_str(strip_bom(text))?;
            records_from_json(&root)
        }
    }
}

/// Parse a GeoJSON `FeatureCollection`.
pub fn parse_geo(text: &str) -> Result<FeatureCollection, LoadError> {
    let root: JsonValue = serde_json::from_str(strip_bom(text))?;
    features_from_json(&root)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

// ---------------------------------------------------------------------------
// GeoJSON
// ---------------------------------------------------------------------------

/// Validate the root object and return its `features` array.
///
/// ```json
/// { "type": "FeatureCollection", "features": [ ... ] }
/// ```
fn feature_array(root: &JsonValue) -> Result<&Vec<JsonValue>, LoadError> {
    let kind = root.get("type").and_then(|t| t.as_str());
    if kind != Some("FeatureCollection") {
        return Err(LoadError::InvalidFormat(format!(
            "root type is {}",
            kind.map_or_else(|| "missing".to_string(), |k| format!("'{k}'"))
        )));
    }
    root.get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| LoadError::InvalidFormat("'features' is not an array".to_string()))
}

/// Every array element becomes a feature, even without geometry or
/// properties, so non-spatial rows are never dropped.
fn features_from_json(root: &JsonValue) -> Result<FeatureCollection, LoadError> {
    let features = feature_array(root)?
        .iter()
        .map(|f| Feature {
            geometry: f.get("geometry").filter(|g| !g.is_null()).cloned(),
            properties: f
                .get("properties")
                .and_then(|p| p.as_object())
                .map(object_to_record)
                .unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let without_geometry = features.iter().filter(|f| f.geometry.is_none()).count();
    if without_geometry > 0 {
        debug!("{without_geometry} features have no geometry");
    }
    Ok(FeatureCollection { features })
}

/// One record per feature that carries a `properties` object.
fn records_from_json(root: &JsonValue) -> Result<Vec<Record>, LoadError> {
    Ok(feature_array(root)?
        .iter()
        .filter_map(|f| f.get("properties").and_then(|p| p.as_object()))
        .map(object_to_record)
        .collect())
}

fn object_to_record(obj: &serde_json::Map<String, JsonValue>) -> Record {
    obj.iter()
        .map(|(k, v)| (k.clone(), json_to_value(v)))
        .collect()
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => Value::Number(f),
            _ => Value::Text(n.to_string()),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// CSV layout: the first non-empty line holds column names, every further
/// non-empty line is one record. Short rows are padded with `Null`, surplus
/// cells are dropped. A repeated column name overwrites the earlier cell.
fn parse_csv(text: &str) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(strip_bom(text).as_bytes());

    // Blank lines never reach us; the reader skips them.
    let mut rows = reader.records();

    let headers: Vec<String> = match rows.next() {
        Some(header) => header?.iter().map(|h| h.to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    let mut ragged = 0usize;
    for result in rows {
        let row = result?;
        if row.len() != headers.len() {
            ragged += 1;
        }
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), row.get(i).map_or(Value::Null, guess_value)))
            .collect();
        records.push(record);
    }

    if ragged > 0 {
        debug!("{ragged} CSV rows did not match the header width");
    }
    Ok(records)
}

/// Empty → `Null`; a plain decimal literal → `Number`; anything else → `Text`.
fn guess_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let trimmed = cell.trim();
    if is_decimal_literal(trimmed) {
        if let Ok(v) = trimmed.parse::<f64>() {
            if v.is_finite() {
                return Value::Number(v);
            }
        }
    }
    Value::Text(cell.to_string())
}

/// Optional sign, digits, at most one decimal point, at least one digit.
/// Exponents, `inf` and `NaN` are deliberately not numbers here.
fn is_decimal_literal(s: &str) -> bool {
    let body = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}
