//! Scale resolution surface: configuration in, [`ScaleSet`] out.

pub mod chart_config;
pub mod domain_extractor;
pub mod mode_dispatcher;
pub mod scale_request;

pub use chart_config::{
    AxisType, BoxPlotConfig, BoxPlotGroup, ChartConfig, ForestPlotConfig, ForestPlotType,
    Orientation, RegressionConfig, Series, SeriesAxis, VisualizationType, XAxisConfig,
};
pub use domain_extractor::{DomainBounds, LayoutBreakpoint, resolve_domain};
pub use mode_dispatcher::{AxisRole, CartesianPlan, ForestPlan, ModePlan, resolve_scales};
pub use scale_request::{ScaleRequest, ScaleSet};
