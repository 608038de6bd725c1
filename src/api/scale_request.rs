use serde::Serialize;

use crate::api::ChartConfig;
use crate::core::{AxisValue, Row, Scale, Viewport};
use crate::error::{ChartError, ChartResult};

/// Inputs of one scale resolution.
///
/// `min`/`max` are the value extrema over the plotted series, computed by the
/// caller. Non-finite extrema mean "no data" and leave value axes unset.
/// `plot` is the drawing surface (`xMax` by `yMax`); `screen` is the whole
/// rendering surface, whose width drives responsive layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRequest<'a> {
    pub config: &'a ChartConfig,
    pub data: &'a [Row],
    pub min: f64,
    pub max: f64,
    pub x_axis_data_mapped: &'a [AxisValue],
    pub plot: Viewport,
    pub screen: Viewport,
    /// Upper bound of the left value axis for combo charts.
    pub left_max: Option<f64>,
}

impl<'a> ScaleRequest<'a> {
    /// Creates a request with no extrema, no axis keys and a screen equal to
    /// the plot.
    #[must_use]
    pub fn new(config: &'a ChartConfig, data: &'a [Row], plot: Viewport) -> Self {
        Self {
            config,
            data,
            min: f64::NAN,
            max: f64::NAN,
            x_axis_data_mapped: &[],
            plot,
            screen: plot,
            left_max: None,
        }
    }

    #[must_use]
    pub fn with_min_max(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn with_x_axis_data(mut self, keys: &'a [AxisValue]) -> Self {
        self.x_axis_data_mapped = keys;
        self
    }

    #[must_use]
    pub fn with_screen(mut self, screen: Viewport) -> Self {
        self.screen = screen;
        self
    }

    #[must_use]
    pub fn with_left_max(mut self, left_max: f64) -> Self {
        self.left_max = Some(left_max);
        self
    }

    #[must_use]
    pub fn x_max(&self) -> f64 {
        self.plot.width
    }

    #[must_use]
    pub fn y_max(&self) -> f64 {
        self.plot.height
    }

    pub(crate) fn validate(&self) -> ChartResult<()> {
        for viewport in [self.plot, self.screen] {
            if !viewport.is_valid() {
                return Err(ChartError::InvalidViewport {
                    width: viewport.width,
                    height: viewport.height,
                });
            }
        }
        Ok(())
    }

    /// Raw x keys straight from the rows, before any axis mapping.
    pub(crate) fn raw_x_keys(&self) -> Vec<AxisValue> {
        let key = self.config.x_axis.data_key.as_str();
        self.data
            .iter()
            .filter_map(|row| row.get(key).and_then(AxisValue::from_json))
            .collect()
    }
}

/// Scales produced for one render pass. Fields the active mode does not use
/// stay `None`, which renderers treat as "nothing to draw on this axis".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSet {
    pub x_scale: Option<Scale>,
    pub y_scale: Option<Scale>,
    pub series_scale: Option<Scale>,
    pub g1x_scale: Option<Scale>,
    pub g2x_scale: Option<Scale>,
    /// Kept for renderer compatibility; no mode fills it.
    pub x_scale_no_padding: Option<Scale>,
    pub x_scale_brush: Option<Scale>,
}

impl ScaleSet {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize scale set: {e}")))
    }

    /// Names of the populated fields, in declaration order.
    #[must_use]
    pub fn populated_fields(&self) -> Vec<&'static str> {
        [
            ("xScale", self.x_scale.is_some()),
            ("yScale", self.y_scale.is_some()),
            ("seriesScale", self.series_scale.is_some()),
            ("g1xScale", self.g1x_scale.is_some()),
            ("g2xScale", self.g2x_scale.is_some()),
            ("xScaleNoPadding", self.x_scale_no_padding.is_some()),
            ("xScaleBrush", self.x_scale_brush.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}
