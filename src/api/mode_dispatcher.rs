use tracing::{debug, trace};

use crate::api::domain_extractor::{
    LayoutBreakpoint, forest_log_base, forest_plot_range, resolve_domain,
};
use crate::api::{
    AxisType, BoxPlotConfig, ChartConfig, ForestPlotConfig, ForestPlotType, Orientation,
    ScaleRequest, ScaleSet, VisualizationType,
};
use crate::core::{Scale, ScaleDomain, ScaleKind, ScaleOptions, make_scale};
use crate::error::{ChartError, ChartResult};

/// Ordinal padding of category axes.
pub const CATEGORY_PADDING: f64 = 0.5;
/// Band padding of the box-plot category axis.
pub const BOX_PLOT_PADDING: f64 = 0.4;

/// Screen axis (or paired group) whose domain is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    X,
    Y,
    /// Per-series offsets inside one category.
    Series,
    /// Brush/overview strip under the x axis.
    Brush,
    /// Both mirrored halves of a paired bar chart.
    Group,
}

/// Modifiers shared by the bar/line/area/combo family and scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartesianPlan {
    pub orientation: Orientation,
    pub log: bool,
    /// Sorted date axis: the x axis becomes a time scale.
    pub sorted_dates: bool,
    /// Vertical value axis tops out at the left-axis maximum.
    pub combo: bool,
}

impl CartesianPlan {
    #[must_use]
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            orientation: config.orientation,
            log: config.use_log_scale,
            sorted_dates: config.has_sorted_dates(),
            combo: config.visualization_type == VisualizationType::Combo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestPlan<'c> {
    pub config: &'c ForestPlotConfig,
    pub lower: &'c str,
    pub upper: &'c str,
    pub scale_type: ForestPlotType,
}

impl<'c> ForestPlan<'c> {
    fn from_config(config: &'c ChartConfig) -> ChartResult<Self> {
        let mismatch = |field| ChartError::ConfigurationMismatch {
            mode: VisualizationType::ForestPlot.as_str(),
            field,
        };
        let forest = config
            .forest_plot
            .as_ref()
            .ok_or_else(|| mismatch("forestPlot"))?;
        let lower = non_empty(forest.lower.as_deref()).ok_or_else(|| mismatch("forestPlot.lower"))?;
        let upper = non_empty(forest.upper.as_deref()).ok_or_else(|| mismatch("forestPlot.upper"))?;
        Ok(Self {
            config: forest,
            lower,
            upper,
            scale_type: forest.scale_type,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Per-mode resolution plan. Built once from the configuration; every mode
/// dispatches through a single exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModePlan<'c> {
    /// Bar, line, area and combo charts in either orientation.
    Cartesian(CartesianPlan),
    /// Cartesian base with a zero-based linear x axis on continuous data.
    Scatter(CartesianPlan),
    Deviation { target: Option<f64>, lollipop: bool },
    BoxPlot(&'c BoxPlotConfig),
    /// Data keys of the two mirrored groups, when configured.
    PairedBar {
        first: Option<&'c str>,
        second: Option<&'c str>,
    },
    Forest(ForestPlan<'c>),
}

impl<'c> ModePlan<'c> {
    /// Fails with [`ChartError::ConfigurationMismatch`] when the active mode's
    /// own configuration block is absent.
    pub fn from_config(config: &'c ChartConfig) -> ChartResult<Self> {
        Ok(match config.visualization_type {
            VisualizationType::Bar
            | VisualizationType::Line
            | VisualizationType::AreaChart
            | VisualizationType::Combo => Self::Cartesian(CartesianPlan::from_config(config)),
            VisualizationType::ScatterPlot => Self::Scatter(CartesianPlan::from_config(config)),
            VisualizationType::DeviationBar => Self::Deviation {
                target: config.x_axis.target,
                lollipop: config.is_lollipop_chart,
            },
            VisualizationType::BoxPlot => Self::BoxPlot(config.box_plot.as_ref().ok_or(
                ChartError::ConfigurationMismatch {
                    mode: VisualizationType::BoxPlot.as_str(),
                    field: "boxplot",
                },
            )?),
            VisualizationType::PairedBar => Self::PairedBar {
                first: config.series.first().map(|series| series.data_key.as_str()),
                second: config.series.get(1).map(|series| series.data_key.as_str()),
            },
            VisualizationType::ForestPlot => Self::Forest(ForestPlan::from_config(config)?),
        })
    }
}

/// Builds every scale the configured mode needs.
///
/// Missing data leaves the affected fields `None`. Errors are reserved for
/// structurally missing configuration, invalid viewports and log domains the
/// epsilon shift cannot repair.
pub fn resolve_scales(request: &ScaleRequest<'_>) -> ChartResult<ScaleSet> {
    request.validate()?;
    let plan = ModePlan::from_config(request.config)?;

    let set = match &plan {
        ModePlan::Cartesian(cartesian) => cartesian_scales(request, *cartesian)?,
        ModePlan::Scatter(cartesian) => {
            let mut set = cartesian_scales(request, *cartesian)?;
            if request.config.x_axis.axis_type == AxisType::Continuous {
                set.x_scale = scale_for(
                    ScaleKind::Linear,
                    resolve_domain(&plan, AxisRole::X, request),
                    (0.0, request.x_max()),
                    ScaleOptions::default(),
                )?;
            }
            set
        }
        ModePlan::Deviation { .. } => ScaleSet {
            y_scale: scale_for(
                ScaleKind::Band,
                resolve_domain(&plan, AxisRole::Y, request),
                (0.0, request.y_max()),
                ScaleOptions::default(),
            )?,
            x_scale: scale_for(
                ScaleKind::Linear,
                resolve_domain(&plan, AxisRole::X, request),
                (0.0, request.x_max()),
                ScaleOptions::default().with_round(true).with_nice(true),
            )?,
            ..ScaleSet::default()
        },
        ModePlan::BoxPlot(_) => ScaleSet {
            y_scale: scale_for(
                ScaleKind::Linear,
                resolve_domain(&plan, AxisRole::Y, request),
                (request.y_max(), 0.0),
                ScaleOptions::default().with_round(true),
            )?,
            x_scale: scale_for(
                ScaleKind::Band,
                resolve_domain(&plan, AxisRole::X, request),
                (0.0, request.x_max()),
                ScaleOptions::default()
                    .with_round(true)
                    .with_padding(BOX_PLOT_PADDING),
            )?,
            ..ScaleSet::default()
        },
        ModePlan::PairedBar { .. } => {
            let domain = resolve_domain(&plan, AxisRole::Group, request);
            let middle = request.x_max() / 2.0;
            ScaleSet {
                g1x_scale: scale_for(
                    ScaleKind::Linear,
                    domain.clone(),
                    (middle, 0.0),
                    ScaleOptions::default(),
                )?,
                g2x_scale: scale_for(
                    ScaleKind::Linear,
                    domain,
                    (middle, request.x_max()),
                    ScaleOptions::default(),
                )?,
                ..ScaleSet::default()
            }
        }
        ModePlan::Forest(forest) => forest_scales(request, &plan, forest)?,
    };

    debug!(
        mode = request.config.visualization_type.as_str(),
        fields = ?set.populated_fields(),
        "resolved scales"
    );
    Ok(set)
}

fn cartesian_scales(request: &ScaleRequest<'_>, cartesian: CartesianPlan) -> ChartResult<ScaleSet> {
    let plan = ModePlan::Cartesian(cartesian);
    let (x_max, y_max) = (request.x_max(), request.y_max());
    let horizontal = cartesian.orientation == Orientation::Horizontal;
    let value_kind = if cartesian.log {
        ScaleKind::Log
    } else {
        ScaleKind::Linear
    };
    let value_options = ScaleOptions::default().with_nice(cartesian.log);
    let category_options = ScaleOptions::default().with_padding(CATEGORY_PADDING);

    let (x_kind, x_options) = if cartesian.sorted_dates {
        trace!("sorted date axis turns the x scale into a time scale");
        (ScaleKind::Time, ScaleOptions::default())
    } else if horizontal {
        (value_kind, value_options)
    } else {
        (ScaleKind::Point, category_options)
    };
    let x_scale = scale_for(
        x_kind,
        resolve_domain(&plan, AxisRole::X, request),
        (0.0, x_max),
        x_options,
    )?;

    let x_scale_brush = if cartesian.sorted_dates {
        x_scale.clone()
    } else if horizontal {
        None
    } else {
        scale_for(
            ScaleKind::Point,
            resolve_domain(&plan, AxisRole::Brush, request),
            (0.0, x_max),
            category_options,
        )?
    };

    let y_scale = if horizontal {
        let category_kind = if request.config.x_axis.axis_type == AxisType::Date {
            ScaleKind::Time
        } else {
            ScaleKind::Point
        };
        scale_for(
            category_kind,
            resolve_domain(&plan, AxisRole::Y, request),
            (0.0, y_max),
            category_options.with_round(true),
        )?
    } else {
        scale_for(
            value_kind,
            resolve_domain(&plan, AxisRole::Y, request),
            (y_max, 0.0),
            value_options,
        )?
    };

    let series_extent = if horizontal { y_max } else { x_max };
    let series_scale = scale_for(
        ScaleKind::Point,
        resolve_domain(&plan, AxisRole::Series, request),
        (0.0, series_extent),
        ScaleOptions::default(),
    )?;

    Ok(ScaleSet {
        x_scale,
        y_scale,
        series_scale,
        x_scale_brush,
        ..ScaleSet::default()
    })
}

fn forest_scales(
    request: &ScaleRequest<'_>,
    plan: &ModePlan<'_>,
    forest: &ForestPlan<'_>,
) -> ChartResult<ScaleSet> {
    let x_max = request.x_max();
    let breakpoint = LayoutBreakpoint::for_width(request.screen.width);
    let x_range = forest_plot_range(forest.config, breakpoint, x_max);
    trace!(
        width = request.screen.width,
        ?breakpoint,
        range_start = x_range.0,
        range_end = x_range.1,
        "forest plot layout"
    );

    let x_domain = resolve_domain(plan, AxisRole::X, request);
    let x_scale = match forest.scale_type {
        ForestPlotType::Linear => {
            scale_for(ScaleKind::Linear, x_domain, x_range, ScaleOptions::default())?
        }
        ForestPlotType::Logarithmic => {
            let base = x_domain
                .as_ref()
                .and_then(ScaleDomain::bounds)
                .map_or(10.0, |(_, high)| forest_log_base(high));
            scale_for(
                ScaleKind::Log,
                x_domain,
                x_range,
                ScaleOptions::default().with_base(base),
            )?
        }
    };

    let row_height = forest.config.row_height;
    let bottom = if forest.config.regression.is_shown() {
        request.y_max() - row_height
    } else {
        request.y_max()
    };
    let y_scale = scale_for(
        ScaleKind::Linear,
        resolve_domain(plan, AxisRole::Y, request),
        (row_height * 2.0, bottom),
        ScaleOptions::default(),
    )?;

    Ok(ScaleSet {
        x_scale,
        y_scale,
        ..ScaleSet::default()
    })
}

fn scale_for(
    kind: ScaleKind,
    domain: Option<ScaleDomain>,
    range: (f64, f64),
    options: ScaleOptions,
) -> ChartResult<Option<Scale>> {
    domain
        .map(|domain| make_scale(kind, domain, range, options))
        .transpose()
}
