use chrono::{DateTime, Utc};

use crate::core::Row;

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Reads a JSON cell as a number. Numeric strings are accepted, matching how
/// spreadsheet exports deliver values.
#[must_use]
pub fn json_to_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}

/// Finite numeric values of `column` across `rows`, skipping blanks.
pub fn column_values<'a>(rows: &'a [Row], column: &'a str) -> impl Iterator<Item = f64> + 'a {
    rows.iter()
        .filter_map(move |row| row.get(column).and_then(json_to_f64))
}

/// Smallest and largest of `values`, or `None` when there are none.
#[must_use]
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((low, high)) => Some((low.min(value), high.max(value))),
    })
}
