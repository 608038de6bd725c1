use serde::{Deserialize, Serialize};

use crate::core::continuous::{LinearScale, LogScale};
use crate::core::ordinal::{OrdinalLayout, OrdinalScale};
use crate::core::ticks::{
    DEFAULT_TICK_COUNT, linear_ticks, log_ladder_ticks, nice_linear, nice_log,
};
use crate::core::AxisValue;
use crate::error::{ChartError, ChartResult};

/// Kind tag carried by every scale so consumers can branch without probing
/// the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Log,
    Point,
    Band,
    Time,
}

impl ScaleKind {
    /// Stable name used by renderers and JSON snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Log => "log",
            Self::Point => "point",
            Self::Linear => "linear",
            Self::Band => "band",
        }
    }

    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(self, Self::Linear | Self::Log | Self::Time)
    }
}

/// Values a scale accepts: a numeric interval or an ordered list of keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleDomain {
    Continuous { low: f64, high: f64 },
    Discrete(Vec<AxisValue>),
}

impl ScaleDomain {
    #[must_use]
    pub fn continuous(low: f64, high: f64) -> Self {
        Self::Continuous { low, high }
    }

    #[must_use]
    pub fn discrete(keys: impl IntoIterator<Item = AxisValue>) -> Self {
        Self::Discrete(keys.into_iter().collect())
    }

    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { low, high } => Some((*low, *high)),
            Self::Discrete(_) => None,
        }
    }

    /// Largest numeric value in the domain. Discrete keys that do not read as
    /// numbers are skipped.
    #[must_use]
    pub fn numeric_max(&self) -> Option<f64> {
        match self {
            Self::Continuous { low, high } => Some(low.max(*high)),
            Self::Discrete(keys) => keys
                .iter()
                .filter_map(AxisValue::as_f64)
                .reduce(f64::max),
        }
    }
}

/// Construction flags for [`make_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleOptions {
    /// Round continuous domain ends outward to human-friendly values.
    pub nice: bool,
    /// Snap output to whole pixels.
    pub round: bool,
    /// Ordinal padding as a fraction of one step.
    pub padding: f64,
    /// Logarithm base for nice rounding and ticks.
    pub base: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            nice: false,
            round: false,
            padding: 0.0,
            base: 10.0,
        }
    }
}

impl ScaleOptions {
    #[must_use]
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mapping {
    Linear(LinearScale),
    Log(LogScale),
    Ordinal(OrdinalScale),
}

/// Immutable value-to-pixel mapping tagged with its [`ScaleKind`].
///
/// Built only through [`make_scale`], which keeps the tag and the mapping in
/// agreement: `Linear`/`Time` map affinely, `Log` maps logarithmically and
/// `Point`/`Band` look keys up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ScaleSnapshot")]
pub struct Scale {
    kind: ScaleKind,
    nice: bool,
    mapping: Mapping,
}

/// Serializable view of a [`Scale`] used in JSON diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSnapshot {
    pub kind: ScaleKind,
    pub domain: ScaleDomain,
    pub range: (f64, f64),
    pub nice: bool,
    pub round: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
}

impl From<Scale> for ScaleSnapshot {
    fn from(scale: Scale) -> Self {
        Self {
            kind: scale.kind,
            domain: scale.domain(),
            range: scale.range(),
            nice: scale.nice,
            round: scale.is_rounded(),
            base: scale.base(),
            padding: match &scale.mapping {
                Mapping::Ordinal(ordinal) => Some(ordinal.padding()),
                _ => None,
            },
        }
    }
}

/// Builds a scale of `kind` over `domain` onto the pixel `range`.
///
/// Continuous kinds require a [`ScaleDomain::Continuous`] domain, ordinal kinds
/// a [`ScaleDomain::Discrete`] one. `Log` rejects domains that touch or cross
/// zero with [`ChartError::InvalidLogDomain`]; callers are expected to have
/// shifted near-zero minimums already.
pub fn make_scale(
    kind: ScaleKind,
    domain: ScaleDomain,
    range: (f64, f64),
    options: ScaleOptions,
) -> ChartResult<Scale> {
    let mapping = match (kind, domain) {
        (ScaleKind::Linear | ScaleKind::Time, ScaleDomain::Continuous { low, high }) => {
            let bounds = if options.nice && low.is_finite() && high.is_finite() {
                nice_linear((low, high), DEFAULT_TICK_COUNT)
            } else {
                (low, high)
            };
            Mapping::Linear(LinearScale::new(bounds, range)?.with_round(options.round))
        }
        (ScaleKind::Log, ScaleDomain::Continuous { low, high }) => {
            // Validate before rounding so a bad domain reports its own ends.
            LogScale::new((low, high), range, options.base)?;
            let bounds = if options.nice {
                nice_log((low, high), options.base)
            } else {
                (low, high)
            };
            Mapping::Log(LogScale::new(bounds, range, options.base)?.with_round(options.round))
        }
        (ScaleKind::Point, ScaleDomain::Discrete(keys)) => Mapping::Ordinal(OrdinalScale::new(
            keys,
            OrdinalLayout::Point,
            range,
            options.padding,
            options.round,
        )?),
        (ScaleKind::Band, ScaleDomain::Discrete(keys)) => Mapping::Ordinal(OrdinalScale::new(
            keys,
            OrdinalLayout::Band,
            range,
            options.padding,
            options.round,
        )?),
        (kind, _) => {
            return Err(ChartError::InvalidData(format!(
                "{} scale cannot be built over this domain shape",
                kind.as_str()
            )));
        }
    };

    Ok(Scale {
        kind,
        nice: options.nice && kind.is_continuous(),
        mapping,
    })
}

impl Scale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    #[must_use]
    pub fn is_nice(&self) -> bool {
        self.nice
    }

    #[must_use]
    pub fn is_rounded(&self) -> bool {
        match &self.mapping {
            Mapping::Linear(linear) => linear.is_rounded(),
            Mapping::Log(log) => log.is_rounded(),
            Mapping::Ordinal(ordinal) => ordinal.is_rounded(),
        }
    }

    /// Resolved domain, after any nice rounding. Ordinal domains are returned
    /// deduplicated in first-seen order.
    #[must_use]
    pub fn domain(&self) -> ScaleDomain {
        match &self.mapping {
            Mapping::Linear(linear) => {
                let (low, high) = linear.domain();
                ScaleDomain::continuous(low, high)
            }
            Mapping::Log(log) => {
                let (low, high) = log.domain();
                ScaleDomain::continuous(low, high)
            }
            Mapping::Ordinal(ordinal) => ScaleDomain::discrete(ordinal.keys().cloned()),
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match &self.mapping {
            Mapping::Linear(linear) => linear.range(),
            Mapping::Log(log) => log.range(),
            Mapping::Ordinal(ordinal) => ordinal.range(),
        }
    }

    /// Logarithm base, for log scales only.
    #[must_use]
    pub fn base(&self) -> Option<f64> {
        match &self.mapping {
            Mapping::Log(log) => Some(log.base()),
            _ => None,
        }
    }

    /// Maps a domain value to a pixel.
    ///
    /// Continuous scales read the value as a number; ordinal scales look the
    /// key up. Unknown keys, non-numeric input and non-positive values on a
    /// log scale map to `None`.
    #[must_use]
    pub fn map(&self, value: &AxisValue) -> Option<f64> {
        match &self.mapping {
            Mapping::Linear(linear) => value.as_f64().map(|number| linear.map(number)),
            Mapping::Log(log) => value.as_f64().and_then(|number| log.map(number)),
            Mapping::Ordinal(ordinal) => ordinal.map(value),
        }
    }

    /// Shorthand for [`Scale::map`] with a numeric key.
    #[must_use]
    pub fn map_number(&self, value: f64) -> Option<f64> {
        self.map(&AxisValue::number(value))
    }

    /// Maps an instant on a time scale (or any continuous scale keyed by
    /// epoch milliseconds).
    #[must_use]
    pub fn map_datetime(&self, time: chrono::DateTime<chrono::Utc>) -> Option<f64> {
        self.map(&AxisValue::from_datetime(time))
    }

    /// Pixel back to domain value. Ordinal scales have no inverse.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<f64> {
        if !pixel.is_finite() {
            return None;
        }
        match &self.mapping {
            Mapping::Linear(linear) => Some(linear.invert(pixel)),
            Mapping::Log(log) => Some(log.invert(pixel)),
            Mapping::Ordinal(_) => None,
        }
    }

    /// Distance between adjacent keys; `None` on continuous scales.
    #[must_use]
    pub fn step(&self) -> Option<f64> {
        match &self.mapping {
            Mapping::Ordinal(ordinal) => Some(ordinal.step()),
            _ => None,
        }
    }

    /// Width owned by each key: zero for point scales, `None` on continuous
    /// scales.
    #[must_use]
    pub fn bandwidth(&self) -> Option<f64> {
        match &self.mapping {
            Mapping::Ordinal(ordinal) => Some(ordinal.bandwidth()),
            _ => None,
        }
    }

    /// Axis tick values in domain order; empty for ordinal scales.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match &self.mapping {
            Mapping::Linear(linear) => linear_ticks(linear.domain(), count),
            Mapping::Log(log) => log_ladder_ticks(log.domain(), log.base(), count),
            Mapping::Ordinal(_) => Vec::new(),
        }
    }
}
