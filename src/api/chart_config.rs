use serde::{Deserialize, Deserializer, Serialize};

use crate::core::primitives::column_values;
use crate::core::{AxisValue, Row};
use crate::error::{ChartError, ChartResult};

/// Active visualization mode. Exactly one is active per resolution.
///
/// Serialized names match the chart editor's display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisualizationType {
    #[default]
    #[serde(rename = "Bar")]
    Bar,
    #[serde(rename = "Line")]
    Line,
    #[serde(rename = "Area Chart")]
    AreaChart,
    #[serde(rename = "Combo")]
    Combo,
    #[serde(rename = "Deviation Bar")]
    DeviationBar,
    #[serde(rename = "Scatter Plot")]
    ScatterPlot,
    #[serde(rename = "Box Plot")]
    BoxPlot,
    #[serde(rename = "Paired Bar")]
    PairedBar,
    #[serde(rename = "Forest Plot")]
    ForestPlot,
}

impl VisualizationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::AreaChart => "Area Chart",
            Self::Combo => "Combo",
            Self::DeviationBar => "Deviation Bar",
            Self::ScatterPlot => "Scatter Plot",
            Self::BoxPlot => "Box Plot",
            Self::PairedBar => "Paired Bar",
            Self::ForestPlot => "Forest Plot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    #[default]
    Categorical,
    Date,
    Continuous,
}

/// Value axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeriesAxis {
    #[default]
    Left,
    Right,
}

/// Category/date axis descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct XAxisConfig {
    #[serde(rename = "type")]
    pub axis_type: AxisType,
    pub data_key: String,
    pub sort_dates: bool,
    /// Reference value drawn by deviation bars.
    #[serde(deserialize_with = "lenient_number")]
    pub target: Option<f64>,
    pub date_parse_format: String,
    pub date_display_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Series {
    pub data_key: String,
    pub axis: SeriesAxis,
}

impl Series {
    #[must_use]
    pub fn new(data_key: impl Into<String>) -> Self {
        Self {
            data_key: data_key.into(),
            axis: SeriesAxis::Left,
        }
    }

    #[must_use]
    pub fn with_axis(mut self, axis: SeriesAxis) -> Self {
        self.axis = axis;
        self
    }
}

/// Precomputed statistics of one box-plot group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxPlotGroup {
    pub column_outliers: Vec<f64>,
    #[serde(deserialize_with = "one_or_many")]
    pub column_lower_bounds: Vec<f64>,
    #[serde(deserialize_with = "one_or_many")]
    pub column_upper_bounds: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxPlotConfig {
    pub plots: Vec<BoxPlotGroup>,
    pub categories: Vec<AxisValue>,
    pub hide_outliers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ForestPlotType {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegressionConfig {
    pub show_diamond: bool,
    pub description: Option<String>,
}

impl RegressionConfig {
    /// Whether a summary row is drawn beneath the study rows.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.show_diamond
            || self
                .description
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}

/// Forest-plot layout. Width offsets are percentages of the plot width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ForestPlotConfig {
    #[serde(rename = "type")]
    pub scale_type: ForestPlotType,
    /// Column holding each row's lower confidence bound.
    pub lower: Option<String>,
    /// Column holding each row's upper confidence bound.
    pub upper: Option<String>,
    pub row_height: f64,
    pub left_width_offset: f64,
    pub right_width_offset: f64,
    pub left_width_offset_mobile: f64,
    pub right_width_offset_mobile: f64,
    pub regression: RegressionConfig,
}

/// Chart configuration as produced by the host's editor. Read-only during a
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub visualization_type: VisualizationType,
    pub orientation: Orientation,
    pub use_log_scale: bool,
    pub x_axis: XAxisConfig,
    pub series: Vec<Series>,
    /// Keys of bar series when a combo chart mixes bars and lines. Falls back
    /// to every series key when empty.
    pub bar_series_keys: Vec<String>,
    #[serde(rename = "boxplot")]
    pub box_plot: Option<BoxPlotConfig>,
    pub forest_plot: Option<ForestPlotConfig>,
    pub is_lollipop_chart: bool,
}

impl ChartConfig {
    #[must_use]
    pub fn new(visualization_type: VisualizationType) -> Self {
        Self {
            visualization_type,
            ..Self::default()
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_log_scale(mut self, use_log_scale: bool) -> Self {
        self.use_log_scale = use_log_scale;
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, x_axis: XAxisConfig) -> Self {
        self.x_axis = x_axis;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: Vec<Series>) -> Self {
        self.series = series;
        self
    }

    #[must_use]
    pub fn with_bar_series_keys(mut self, keys: Vec<String>) -> Self {
        self.bar_series_keys = keys;
        self
    }

    #[must_use]
    pub fn with_box_plot(mut self, box_plot: BoxPlotConfig) -> Self {
        self.box_plot = Some(box_plot);
        self
    }

    #[must_use]
    pub fn with_forest_plot(mut self, forest_plot: ForestPlotConfig) -> Self {
        self.forest_plot = Some(forest_plot);
        self
    }

    #[must_use]
    pub fn with_lollipop(mut self, is_lollipop_chart: bool) -> Self {
        self.is_lollipop_chart = is_lollipop_chart;
        self
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    /// Whether the x axis is a sorted continuous date axis.
    #[must_use]
    pub fn has_sorted_dates(&self) -> bool {
        self.x_axis.axis_type == AxisType::Date && self.x_axis.sort_dates
    }

    /// Value axis of `column`: right when a right-axis series names it, left
    /// otherwise, including for columns that are not series at all.
    #[must_use]
    pub fn series_axis(&self, column: &str) -> SeriesAxis {
        if self
            .series
            .iter()
            .any(|series| series.axis == SeriesAxis::Right && series.data_key == column)
        {
            SeriesAxis::Right
        } else {
            SeriesAxis::Left
        }
    }

    /// Keys laid out by the per-series scale.
    #[must_use]
    pub fn series_domain(&self) -> Vec<AxisValue> {
        if self.bar_series_keys.is_empty() {
            self.series
                .iter()
                .map(|series| AxisValue::text(series.data_key.as_str()))
                .collect()
        } else {
            self.bar_series_keys
                .iter()
                .map(|key| AxisValue::text(key.as_str()))
                .collect()
        }
    }

    /// Largest value across columns bound to the left axis.
    #[must_use]
    pub fn left_axis_max(&self, rows: &[Row]) -> Option<f64> {
        self.series
            .iter()
            .filter(|series| series.axis == SeriesAxis::Left)
            .flat_map(|series| column_values(rows, &series.data_key))
            .reduce(f64::max)
    }
}

/// Accepts a bare number or a list of numbers.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(f64),
        Many(Vec<f64>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Accepts a number, a numeric string, an empty string or null.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(crate::core::primitives::json_to_f64))
}
