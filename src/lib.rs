//! chart-scales: scale resolution for multi-mode charts.
//!
//! Given a chart configuration, its rows, precomputed value extrema and the
//! drawing-surface size, [`resolve_scales`] derives the domain of every axis
//! the active visualization mode needs and builds the matching linear, log,
//! point, band or time [`Scale`]. Resolution is synchronous and pure: the
//! same request always yields a structurally equal [`ScaleSet`].

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use crate::api::{ChartConfig, ScaleRequest, ScaleSet, VisualizationType, resolve_scales};
pub use crate::core::{AxisValue, Scale, ScaleDomain, ScaleKind, ScaleOptions, Viewport, make_scale};
pub use crate::error::{ChartError, ChartResult};
