use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::datetime_to_unix_millis;

/// One data record: column key to raw cell value, in source column order.
pub type Row = IndexMap<String, serde_json::Value>;

/// Ordered, read-only input rows.
pub type Dataset = Vec<Row>;

/// Pixel extents of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// A discrete axis key: a category label or a numeric key such as a year or a
/// parsed date in epoch milliseconds.
///
/// Numbers are wrapped in `OrderedFloat` so keys can be hashed and ordered
/// when they index point and band scales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(OrderedFloat<f64>),
    Text(String),
}

impl AxisValue {
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(OrderedFloat(value))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Date key in epoch milliseconds, the representation time scales consume.
    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self::number(datetime_to_unix_millis(time))
    }

    /// Numeric reading of the key. Text keys holding a number parse; other
    /// text yields `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let parsed = match self {
            Self::Number(value) => Some(value.into_inner()),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        };
        parsed.filter(|value| value.is_finite())
    }

    /// Converts a raw JSON cell into an axis key. Nulls, arrays and objects
    /// have no key.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => number.as_f64().map(Self::number),
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            serde_json::Value::Bool(flag) => Some(Self::Text(flag.to_string())),
            _ => None,
        }
    }
}

impl From<f64> for AxisValue {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<i32> for AxisValue {
    fn from(value: i32) -> Self {
        Self::number(f64::from(value))
    }
}

impl From<&str> for AxisValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for AxisValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for AxisValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value.into_inner()),
            Self::Text(text) => f.write_str(text),
        }
    }
}
