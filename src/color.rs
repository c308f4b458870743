use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{FeatureCollection, Value};

/// Fill for features without a usable metric value, and the low end of the ramp.
pub const BASELINE: Srgb<u8> = Srgb::new(0xEC, 0xEF, 0xF1);
/// High end of the ramp.
pub const ACCENT: Srgb<u8> = Srgb::new(0x3F, 0x51, 0xB5);

/// Unrounded colour; channels in `0.0..=1.0`.
pub type Color = Srgb<f32>;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Choropleth ramp
// ---------------------------------------------------------------------------

/// Position of `value` within `[min, max]`, clamped to `[0, 1]`; `0` for a
/// flat range or any non-finite result.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    let range = max - min;
    let t = if range.is_finite() {
        (value - min) / range
    } else {
        // The span overflowed; halving every operand keeps the ratio.
        (value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
    };
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Linear per-channel blend from [`BASELINE`] (`t = 0`) to [`ACCENT`] (`t = 1`).
pub fn interpolate(t: f64) -> Color {
    let from: Color = BASELINE.into_format();
    let to: Color = ACCENT.into_format();
    let t = t as f32;
    let lerp = |a: f32, b: f32| a + t * (b - a);
    Srgb::new(
        lerp(from.red, to.red),
        lerp(from.green, to.green),
        lerp(from.blue, to.blue),
    )
}

/// Round a colour to 8-bit channels for display.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let c: Srgb<u8> = color.into_format();
    [c.red, c.green, c.blue]
}

/// Maps a numeric feature attribute onto the baseline→accent ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethScale {
    pub metric: String,
    /// `(min, max)` over the finite numeric values; `None` when there are none.
    domain: Option<(f64, f64)>,
}

impl ChoroplethScale {
    /// Build a scale from the finite numbers found under `metric`.
    pub fn new(features: &FeatureCollection, metric: &str) -> Self {
        let domain = features
            .features
            .iter()
            .filter_map(|f| finite(f.properties.get(metric)))
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });

        ChoroplethScale {
            metric: metric.to_string(),
            domain,
        }
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    /// Colour for one attribute value; anything that is not a finite number,
    /// or any value when the domain is empty, gets the baseline.
    pub fn color_for(&self, value: Option<&Value>) -> Color {
        match (self.domain, finite(value)) {
            (Some((min, max)), Some(v)) => interpolate(normalize(v, min, max)),
            _ => BASELINE.into_format(),
        }
    }

    /// One colour per feature of `features`, read from this scale's metric.
    pub fn colors(&self, features: &FeatureCollection) -> Vec<Color> {
        features
            .features
            .iter()
            .map(|f| self.color_for(f.properties.get(&self.metric)))
            .collect()
    }

    /// Legend entries (label → colour) for the two ends of the ramp.
    pub fn legend_entries(&self) -> Vec<(String, Color)> {
        match self.domain {
            Some((min, max)) => vec![
                (format!("{min}"), interpolate(0.0)),
                (format!("{max}"), interpolate(normalize(max, min, max))),
            ],
            None => Vec::new(),
        }
    }
}

fn finite(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_number).filter(|v| v.is_finite())
}

/// One colour per feature, indexed like `features.features`.
pub fn scale(features: &FeatureCollection, metric: &str) -> Vec<Color> {
    ChoroplethScale::new(features, metric).colors(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Feature, Record};

    fn collection(values: Vec<Option<Value>>) -> FeatureCollection {
        FeatureCollection {
            features: values
                .into_iter()
                .map(|v| {
                    let mut properties = Record::new();
                    properties.insert("id".to_string(), Value::from("x"));
                    if let Some(v) = v {
                        properties.insert("turnout".to_string(), v);
                    }
                    Feature {
                        geometry: None,
                        properties,
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(0.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(10.0, 0.0, 10.0), 1.0);
        for x in [-3.0, 5.0, 1e9] {
            assert_eq!(normalize(x, 5.0, 5.0), 0.0);
        }
    }

    #[test]
    fn test_normalize_huge_range_stays_in_unit_interval() {
        assert_eq!(normalize(f64::MAX, -f64::MAX, f64::MAX), 1.0);
        assert_eq!(normalize(-f64::MAX, -f64::MAX, f64::MAX), 0.0);
        assert_eq!(normalize(0.0, -f64::MAX, f64::MAX), 0.5);
        assert_eq!(normalize(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(normalize(20.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn test_interpolate_endpoints() {
        assert_eq!(to_rgb8(interpolate(0.0)), [0xEC, 0xEF, 0xF1]);
        assert_eq!(to_rgb8(interpolate(1.0)), [0x3F, 0x51, 0xB5]);
    }

    #[test]
    fn test_interpolate_keeps_fractional_channels() {
        let mid = interpolate(0.5);
        let from: Color = BASELINE.into_format();
        let to: Color = ACCENT.into_format();
        assert!((mid.red - (from.red + to.red) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_grades_features() {
        let fc = collection(vec![
            Some(Value::Number(10.0)),
            Some(Value::Number(20.0)),
            Some(Value::Number(15.0)),
        ]);
        let colors = scale(&fc, "turnout");
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], interpolate(0.0));
        assert_eq!(colors[1], interpolate(1.0));
        assert_eq!(colors[2], interpolate(0.5));
    }

    #[test]
    fn test_missing_or_text_values_get_baseline() {
        let fc = collection(vec![
            Some(Value::Number(1.0)),
            Some(Value::from("12")),
            None,
            Some(Value::Null),
            Some(Value::Number(3.0)),
        ]);
        let colors = scale(&fc, "turnout");
        let baseline: Color = BASELINE.into_format();
        assert_eq!(colors[1], baseline);
        assert_eq!(colors[2], baseline);
        assert_eq!(colors[3], baseline);
        assert_eq!(colors[4], interpolate(1.0));
    }

    #[test]
    fn test_no_numeric_values_all_baseline() {
        let fc = collection(vec![Some(Value::from("a")), None]);
        let scale_ = ChoroplethScale::new(&fc, "turnout");
        assert_eq!(scale_.domain(), None);
        assert!(scale_.legend_entries().is_empty());
        let baseline: Color = BASELINE.into_format();
        assert!(scale(&fc, "turnout").iter().all(|c| *c == baseline));
        assert!(scale(&fc, "unknown").iter().all(|c| *c == baseline));
    }

    #[test]
    fn test_flat_range_renders_baseline_end() {
        let fc = collection(vec![Some(Value::Number(7.0)), Some(Value::Number(7.0))]);
        let colors = scale(&fc, "turnout");
        assert!(colors.iter().all(|c| *c == interpolate(0.0)));
        assert!(colors.iter().all(|c| !c.red.is_nan()));
    }

    #[test]
    fn test_generate_palette() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }
}
