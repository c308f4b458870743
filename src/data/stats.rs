use indexmap::IndexMap;

use super::model::{ColumnStats, Record, Statistics, Value};

/// Maximum number of categories returned by [`category_counts`].
pub const MAX_CATEGORIES: usize = 10;

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics for every column seen in any record.
///
/// A column is numeric as soon as one of its values is a `Number`; its
/// statistics are computed over the numbers only, ignoring `Null` and `Text`.
/// Other columns only get a `mode` over their text values. Never fails.
pub fn compute_statistics(records: &[Record]) -> Statistics {
    let mut columns: IndexMap<&str, Vec<&Value>> = IndexMap::new();
    for record in records {
        for (name, value) in record {
            columns.entry(name.as_str()).or_default().push(value);
        }
    }

    columns
        .into_iter()
        .map(|(name, values)| (name.to_string(), column_stats(&values)))
        .collect()
}

fn column_stats(values: &[&Value]) -> ColumnStats {
    let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
    if numbers.is_empty() {
        return ColumnStats {
            mode: mode(values.iter().copied().filter(|v| v.as_text().is_some())),
            ..ColumnStats::default()
        };
    }

    let mut stats = describe(&numbers);
    stats.mode = mode(values.iter().copied().filter(|v| v.as_number().is_some()));
    stats
}

/// Mean, median, population standard deviation and extrema of `numbers`.
/// Every field is `None` for an empty slice; `mode` is left to the caller.
pub fn describe(numbers: &[f64]) -> ColumnStats {
    if numbers.is_empty() {
        return ColumnStats::default();
    }
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let variance = numbers.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    ColumnStats {
        mean: Some(mean),
        median: Some(median),
        mode: None,
        std_dev: Some(variance.sqrt()),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}

/// Most frequent value; ties go to the value seen first.
pub fn mode<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: IndexMap<&Value, usize> = IndexMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }

    let mut best: Option<(&Value, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.clone())
}

// ---------------------------------------------------------------------------
// Category counts (party chart)
// ---------------------------------------------------------------------------

/// The first column of the first record whose name mentions "party".
pub fn party_column(records: &[Record]) -> Option<&str> {
    records
        .first()?
        .keys()
        .find(|k| k.to_lowercase().contains("party"))
        .map(|k| k.as_str())
}

/// Row counts per value of the party column, in first-seen order, capped at
/// [`MAX_CATEGORIES`]. Null, empty and zero values are not counted.
pub fn category_counts(records: &[Record]) -> Vec<(String, usize)> {
    let Some(column) = party_column(records) else {
        return Vec::new();
    };

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        let label = match record.get(column) {
            Some(Value::Text(s)) if !s.is_empty() => s.clone(),
            Some(v @ Value::Number(n)) if *n != 0.0 && !n.is_nan() => v.to_string(),
            _ => continue,
        };
        *counts.entry(label).or_default() += 1;
    }
    counts.into_iter().take(MAX_CATEGORIES).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < EPS)
    }

    fn rows(column: &str, values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| Record::from([(column.to_string(), v)]))
            .collect()
    }

    #[test]
    fn test_basic_numeric_column() {
        let stats = compute_statistics(&rows("a", vec![1.0.into(), 2.0.into(), 3.0.into()]));
        let a = &stats["a"];
        assert!(approx(a.mean, 2.0));
        assert!(approx(a.median, 2.0));
        assert_eq!(a.mode, Some(Value::Number(1.0)));
        assert!(approx(a.std_dev, (2.0f64 / 3.0).sqrt()));
        assert!(approx(a.min, 1.0));
        assert!(approx(a.max, 3.0));
    }

    #[test]
    fn test_even_count_median_and_mode() {
        let values = vec![4.0.into(), 1.0.into(), 4.0.into(), 3.0.into()];
        let a = &compute_statistics(&rows("a", values))["a"];
        assert!(approx(a.median, 3.5));
        assert_eq!(a.mode, Some(Value::Number(4.0)));
        assert!(approx(a.mean, 3.0));
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        let values = vec![5.0.into(), 2.0.into(), 2.0.into(), 5.0.into()];
        let a = &compute_statistics(&rows("a", values))["a"];
        assert_eq!(a.mode, Some(Value::Number(5.0)));
    }

    #[test]
    fn test_mixed_column_ignores_text_and_null() {
        let values = vec![10.0.into(), "n/a".into(), Value::Null, 20.0.into()];
        let a = &compute_statistics(&rows("a", values))["a"];
        assert!(approx(a.mean, 15.0));
        assert!(approx(a.std_dev, 5.0));
        assert_eq!(a.mode, Some(Value::Number(10.0)));
    }

    #[test]
    fn test_text_only_column() {
        let values = vec!["Green".into(), "Labour".into(), "Labour".into(), Value::Null];
        let party = &compute_statistics(&rows("party", values))["party"];
        assert_eq!(party.mode, Some(Value::from("Labour")));
        assert_eq!(
            *party,
            ColumnStats {
                mode: Some(Value::from("Labour")),
                ..ColumnStats::default()
            }
        );
    }

    #[test]
    fn test_null_only_column_is_empty() {
        let stats = compute_statistics(&rows("x", vec![Value::Null, Value::Null]));
        assert_eq!(stats["x"], ColumnStats::default());
    }

    #[test]
    fn test_empty_input() {
        assert!(compute_statistics(&[]).is_empty());
        assert_eq!(describe(&[]), ColumnStats::default());
    }

    #[test]
    fn test_column_union_in_first_seen_order() {
        let records = vec![
            Record::from([("b".to_string(), Value::Number(1.0))]),
            Record::from([
                ("a".to_string(), Value::Number(2.0)),
                ("b".to_string(), Value::Number(3.0)),
            ]),
        ];
        let stats = compute_statistics(&records);
        let names: Vec<&str> = stats.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(approx(stats["a"].mean, 2.0));
        assert!(approx(stats["b"].mean, 2.0));
    }

    #[test]
    fn test_category_counts() {
        let mut records = rows(
            "Party",
            vec!["Red".into(), "Blue".into(), "Red".into(), "".into(), Value::Null],
        );
        records[0].insert("votes".to_string(), Value::Number(3.0));
        assert_eq!(party_column(&records), Some("Party"));
        assert_eq!(
            category_counts(&records),
            vec![("Red".to_string(), 2), ("Blue".to_string(), 1)]
        );
    }

    #[test]
    fn test_category_counts_caps_and_requires_column() {
        let many: Vec<Value> = (0..15).map(|i| Value::Text(format!("P{i}"))).collect();
        assert_eq!(category_counts(&rows("party_name", many)).len(), MAX_CATEGORIES);
        assert!(category_counts(&rows("votes", vec![1.0.into()])).is_empty());
        assert!(category_counts(&[]).is_empty());
    }
}
