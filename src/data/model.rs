use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Value – a single cell in a record
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Numeric coercion happens once, at parse
/// time; downstream code only ever inspects the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Null,
}

// -- Manual Eq/Hash so Value can key a HashMap during fusion --
//
// Equality is type-exact: `Number(1.0) != Text("1")`. Zero compares equal to
// negative zero and NaN to itself, so the Eq contract holds.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Number(v) => {
                let canonical = if *v == 0.0 {
                    0.0f64
                } else if v.is_nan() {
                    f64::NAN
                } else {
                    *v
                };
                canonical.to_bits().hash(state)
            }
            Value::Text(s) => s.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl Value {
    /// The numeric payload, if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Record / Feature / FeatureCollection
// ---------------------------------------------------------------------------

/// One flat row: column name → value, in insertion order.
pub type Record = IndexMap<String, Value>;

/// One geographic entity. The geometry is never interpreted by the engine
/// and is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<JsonValue>,
    pub properties: Record,
}

/// An ordered set of features. Any other root members of the source
/// document are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics for one column. Every field is optional: numeric
/// fields are absent for text columns, and everything is absent for a column
/// without values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<f64>,
}

/// Column name → statistics, in first-seen column order.
pub type Statistics = IndexMap<String, ColumnStats>;

// ---------------------------------------------------------------------------
// Dataset – what a single file load produces
// ---------------------------------------------------------------------------

/// The parsed content of one uploaded file.
///
/// A GeoJSON file fills both `geo` and `tabular` (its feature properties);
/// a CSV file fills only `tabular`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub file_name: String,
    pub geo: Option<FeatureCollection>,
    pub tabular: Option<Vec<Record>>,
}

impl Dataset {
    /// The record used to discover columns: first tabular row, else the first
    /// feature's properties.
    fn first_record(&self) -> Option<&Record> {
        self.tabular
            .as_ref()
            .and_then(|rows| rows.first())
            .or_else(|| {
                self.geo
                    .as_ref()
                    .and_then(|fc| fc.features.first())
                    .map(|f| &f.properties)
            })
    }

    /// Columns usable as a choropleth metric: keys of the first record whose
    /// value there is a number.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.first_record()
            .map(|rec| {
                rec.iter()
                    .filter(|(_, v)| v.as_number().is_some())
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}
