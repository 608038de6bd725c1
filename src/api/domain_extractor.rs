//! Domain derivation per mode and axis.
//!
//! Every correction here is a policy, applied silently and logged at `trace`
//! level: log-safe minimum shifting, box-plot outlier and fence widening,
//! paired-bar headroom, forest-plot padding and base selection, deviation-bar
//! widening. Missing data yields `None`, never an error.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::api::mode_dispatcher::{AxisRole, CartesianPlan, ForestPlan, ModePlan};
use crate::api::{AxisType, BoxPlotConfig, ForestPlotConfig, ForestPlotType, ScaleRequest};
use crate::core::primitives::{column_values, min_max};
use crate::core::{AxisValue, Row, ScaleDomain};

/// Shift applied to a log-axis minimum in `[0, 1)`.
pub const LOG_EPSILON: f64 = 0.1;
/// Multiplier on the minimum of a horizontal bar value axis.
pub const HORIZONTAL_MIN_FACTOR: f64 = 1.03;
/// Multiplier on the minimum of a standard deviation-bar axis.
pub const DEVIATION_MIN_FACTOR: f64 = 1.03;
/// Multiplier on the minimum of a lollipop deviation-bar axis.
pub const LOLLIPOP_MIN_FACTOR: f64 = 1.05;
/// Headroom keeping the longest paired bar off the plot edge.
pub const PAIRED_BAR_HEADROOM: f64 = 1.02;
/// Padding, in domain units, around a linear forest-plot axis.
pub const FOREST_AXIS_PADDING: f64 = 5.0;
/// Screen widths at or below this use the mobile forest-plot layout.
pub const MOBILE_BREAKPOINT_WIDTH: f64 = 480.0;

/// Closed numeric interval `[low, high]`.
///
/// `EMPTY` (`low = +inf`, `high = -inf`) is the identity of the widening
/// folds; any bound still infinite after folding means there was no data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub low: f64,
    pub high: f64,
}

impl DomainBounds {
    pub const EMPTY: Self = Self {
        low: f64::INFINITY,
        high: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Bounds from caller-supplied extrema; non-finite extrema are ignored.
    #[must_use]
    pub fn from_extrema(min: f64, max: f64) -> Self {
        Self::EMPTY.extend_low(min).extend_high(max)
    }

    /// Lowers `low` to `value` when it is finite and smaller.
    #[must_use]
    pub fn extend_low(self, value: f64) -> Self {
        if value.is_finite() && value < self.low {
            Self { low: value, ..self }
        } else {
            self
        }
    }

    /// Raises `high` to `value` when it is finite and larger.
    #[must_use]
    pub fn extend_high(self, value: f64) -> Self {
        if value.is_finite() && value > self.high {
            Self { high: value, ..self }
        } else {
            self
        }
    }

    #[must_use]
    pub fn include(self, value: f64) -> Self {
        self.extend_low(value).extend_high(value)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }

    /// `Some(self)` when both ends are finite.
    #[must_use]
    pub fn finite(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl From<DomainBounds> for ScaleDomain {
    fn from(bounds: DomainBounds) -> Self {
        ScaleDomain::continuous(bounds.low, bounds.high)
    }
}

/// Moves a log-axis minimum in `[0, 1)` up by [`LOG_EPSILON`]. Any other
/// minimum, including a negative one, is returned unchanged for the scale
/// factory to accept or reject.
#[must_use]
pub fn log_safe_min(min: f64, use_log_scale: bool) -> f64 {
    if use_log_scale && (0.0..1.0).contains(&min) {
        trace!(min, shifted = min + LOG_EPSILON, "shift log axis minimum off zero");
        min + LOG_EPSILON
    } else {
        min
    }
}

/// Widens `bounds` to every visible outlier, then to the lowest lower fence
/// and highest upper fence across all groups.
#[must_use]
pub fn widen_for_box_plot(bounds: DomainBounds, box_plot: &BoxPlotConfig) -> DomainBounds {
    let outliers: &[_] = if box_plot.hide_outliers { &[] } else { &box_plot.plots };
    let with_outliers = outliers
        .iter()
        .flat_map(|group| group.column_outliers.iter().copied())
        .fold(bounds, DomainBounds::include);

    let with_fences = box_plot.plots.iter().fold(with_outliers, |acc, group| {
        let acc = group
            .column_lower_bounds
            .iter()
            .copied()
            .fold(acc, DomainBounds::extend_low);
        group
            .column_upper_bounds
            .iter()
            .copied()
            .fold(acc, DomainBounds::extend_high)
    });

    if with_fences != bounds {
        trace!(
            from_low = bounds.low,
            from_high = bounds.high,
            to_low = with_fences.low,
            to_high = with_fences.high,
            "widen box plot domain to outliers and fences"
        );
    }
    with_fences
}

/// Shared domain of both paired-bar groups: zero to the larger group
/// maximum plus headroom.
#[must_use]
pub fn paired_bar_domain(rows: &[Row], first: &str, second: &str) -> Option<DomainBounds> {
    let group_max = column_values(rows, first)
        .chain(column_values(rows, second))
        .reduce(f64::max)?;
    Some(DomainBounds::new(0.0, group_max * PAIRED_BAR_HEADROOM))
}

/// Forest-plot x domain: padded for linear axes, the raw confidence span for
/// logarithmic ones.
///
/// A logarithmic span whose lowest bound is exactly zero starts at
/// [`LOG_EPSILON`] instead. Negative lower bounds, or an upper bound not above
/// the shifted start, leave no drawable log domain and yield `None`.
#[must_use]
pub fn forest_plot_domain(
    rows: &[Row],
    lower: &str,
    upper: &str,
    scale_type: ForestPlotType,
) -> Option<DomainBounds> {
    let low = column_values(rows, lower).reduce(f64::min)?;
    let high = column_values(rows, upper).reduce(f64::max)?;
    match scale_type {
        ForestPlotType::Linear => Some(DomainBounds::new(
            low - FOREST_AXIS_PADDING,
            high + FOREST_AXIS_PADDING,
        )),
        ForestPlotType::Logarithmic if low > 0.0 => Some(DomainBounds::new(low, high)),
        ForestPlotType::Logarithmic if low == 0.0 && high > LOG_EPSILON => {
            trace!(low, shifted = LOG_EPSILON, "shift zero forest plot bound off the log axis");
            Some(DomainBounds::new(LOG_EPSILON, high))
        }
        ForestPlotType::Logarithmic => {
            warn!(low, high, "forest plot bounds leave no positive log domain");
            None
        }
    }
}

/// Base 10 when the upper bound exceeds 1, otherwise base 2 so sub-unit
/// ratios still get readable ticks.
#[must_use]
pub fn forest_log_base(high: f64) -> f64 {
    if high > 1.0 { 10.0 } else { 2.0 }
}

/// Layout variant selected from the rendering-surface width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutBreakpoint {
    Desktop,
    Mobile,
}

impl LayoutBreakpoint {
    /// Desktop strictly above [`MOBILE_BREAKPOINT_WIDTH`]; mobile at or below.
    #[must_use]
    pub fn for_width(width: f64) -> Self {
        if width > MOBILE_BREAKPOINT_WIDTH {
            Self::Desktop
        } else {
            Self::Mobile
        }
    }
}

/// Pixel range of the forest-plot x axis after reserving the configured
/// left/right percentages of `x_max`.
#[must_use]
pub fn forest_plot_range(
    forest: &ForestPlotConfig,
    breakpoint: LayoutBreakpoint,
    x_max: f64,
) -> (f64, f64) {
    let (left, right) = match breakpoint {
        LayoutBreakpoint::Desktop => (forest.left_width_offset, forest.right_width_offset),
        LayoutBreakpoint::Mobile => (
            forest.left_width_offset_mobile,
            forest.right_width_offset_mobile,
        ),
    };
    (left / 100.0 * x_max, x_max - right / 100.0 * x_max)
}

/// Deviation-bar value domain: the minimum widened by the bar-style factor,
/// the maximum raised to the target so the target marker stays on-scale.
#[must_use]
pub fn deviation_domain(
    min: f64,
    max: f64,
    target: Option<f64>,
    lollipop: bool,
) -> Option<DomainBounds> {
    let factor = if lollipop {
        LOLLIPOP_MIN_FACTOR
    } else {
        DEVIATION_MIN_FACTOR
    };
    let high = target.map_or(max, |target| target.max(max));
    DomainBounds::new(min * factor, high).finite()
}

/// Resolves the domain of one axis of `plan`.
///
/// Returns `None` when the axis does not exist in this mode or its input
/// data is missing.
#[must_use]
pub fn resolve_domain(
    plan: &ModePlan<'_>,
    axis: AxisRole,
    request: &ScaleRequest<'_>,
) -> Option<ScaleDomain> {
    match plan {
        ModePlan::Cartesian(cartesian) => cartesian_domain(*cartesian, axis, request),
        ModePlan::Scatter(cartesian) => match axis {
            AxisRole::X if request.config.x_axis.axis_type == AxisType::Continuous => {
                let base = cartesian_domain(*cartesian, AxisRole::X, request)?;
                Some(ScaleDomain::continuous(0.0, base.numeric_max()?))
            }
            _ => cartesian_domain(*cartesian, axis, request),
        },
        ModePlan::Deviation { target, lollipop } => match axis {
            AxisRole::X => {
                deviation_domain(request.min, request.max, *target, *lollipop).map(Into::into)
            }
            AxisRole::Y => discrete(request.x_axis_data_mapped.to_vec(), "deviation categories"),
            _ => None,
        },
        ModePlan::BoxPlot(box_plot) => match axis {
            AxisRole::X => discrete(box_plot.categories.clone(), "box plot categories"),
            AxisRole::Y => {
                let bounds = DomainBounds::from_extrema(request.min, request.max);
                finite_or_warn(widen_for_box_plot(bounds, box_plot), "box plot values")
            }
            _ => None,
        },
        ModePlan::PairedBar { first, second } => match (axis, first, second) {
            (AxisRole::Group, Some(first), Some(second)) => {
                let bounds = paired_bar_domain(request.data, first, second);
                if bounds.is_none() {
                    warn!(first, second, "paired bar columns hold no numeric values");
                }
                bounds.map(Into::into)
            }
            _ => None,
        },
        ModePlan::Forest(forest) => forest_domain(forest, axis, request),
    }
}

fn cartesian_domain(
    plan: CartesianPlan,
    axis: AxisRole,
    request: &ScaleRequest<'_>,
) -> Option<ScaleDomain> {
    let horizontal = plan.orientation == crate::api::Orientation::Horizontal;
    match axis {
        AxisRole::X | AxisRole::Brush if plan.sorted_dates => date_extent(request),
        AxisRole::X if horizontal => value_domain(plan, request),
        AxisRole::X => discrete(request.x_axis_data_mapped.to_vec(), "x axis keys"),
        AxisRole::Y if horizontal => {
            if request.config.x_axis.axis_type == AxisType::Date {
                date_extent(request)
            } else {
                discrete(request.x_axis_data_mapped.to_vec(), "y axis keys")
            }
        }
        AxisRole::Y => value_domain(plan, request),
        AxisRole::Series => discrete(request.config.series_domain(), "series keys"),
        AxisRole::Brush if !horizontal => discrete(request.raw_x_keys(), "raw x keys"),
        AxisRole::Brush | AxisRole::Group => None,
    }
}

fn value_domain(plan: CartesianPlan, request: &ScaleRequest<'_>) -> Option<ScaleDomain> {
    let (min, max) = match plan.orientation {
        crate::api::Orientation::Horizontal => (request.min * HORIZONTAL_MIN_FACTOR, request.max),
        crate::api::Orientation::Vertical if plan.combo => {
            let left_max = request
                .left_max
                .or_else(|| request.config.left_axis_max(request.data))
                .unwrap_or(request.max);
            (request.min, left_max)
        }
        crate::api::Orientation::Vertical => (request.min, request.max),
    };
    let bounds = DomainBounds::new(log_safe_min(min, plan.log), max);
    finite_or_warn(bounds, "value axis")
}

fn date_extent(request: &ScaleRequest<'_>) -> Option<ScaleDomain> {
    let extent = min_max(request.x_axis_data_mapped.iter().filter_map(AxisValue::as_f64));
    if extent.is_none() {
        warn!("date axis has no parsable keys");
    }
    extent.map(|(low, high)| ScaleDomain::continuous(low, high))
}

fn forest_domain(
    forest: &ForestPlan<'_>,
    axis: AxisRole,
    request: &ScaleRequest<'_>,
) -> Option<ScaleDomain> {
    match axis {
        AxisRole::X => {
            let bounds =
                forest_plot_domain(request.data, forest.lower, forest.upper, forest.scale_type);
            if bounds.is_none() {
                warn!(
                    lower = forest.lower,
                    upper = forest.upper,
                    "forest plot bound columns yield no x domain"
                );
            }
            bounds.map(Into::into)
        }
        AxisRole::Y if !request.data.is_empty() => {
            Some(ScaleDomain::continuous(0.0, request.data.len() as f64))
        }
        _ => None,
    }
}

fn discrete(keys: Vec<AxisValue>, what: &'static str) -> Option<ScaleDomain> {
    if keys.is_empty() {
        warn!(axis = what, "no keys to lay out");
        return None;
    }
    Some(ScaleDomain::Discrete(keys))
}

fn finite_or_warn(bounds: DomainBounds, what: &'static str) -> Option<ScaleDomain> {
    match bounds.finite() {
        Some(bounds) => Some(bounds.into()),
        None => {
            warn!(axis = what, "missing numeric extrema");
            None
        }
    }
}
