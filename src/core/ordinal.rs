use indexmap::IndexSet;

use crate::core::AxisValue;
use crate::core::continuous::validate_range;
use crate::error::{ChartError, ChartResult};

/// Whether each key owns a pixel interval or a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinalLayout {
    Point,
    Band,
}

/// Evenly spaced layout of discrete keys across a pixel range.
///
/// Band layout reserves `padding` as a fraction of one step between bands and
/// at both outer edges. Point layout is a band layout with zero-width bands:
/// `padding` only applies at the outer edges. Keys are centered in the range.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    keys: IndexSet<AxisValue>,
    layout: OrdinalLayout,
    range_start: f64,
    range_end: f64,
    padding: f64,
    round: bool,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl OrdinalScale {
    /// Duplicate keys collapse onto their first occurrence.
    pub fn new(
        keys: impl IntoIterator<Item = AxisValue>,
        layout: OrdinalLayout,
        range: (f64, f64),
        padding: f64,
        round: bool,
    ) -> ChartResult<Self> {
        validate_range(range)?;
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidData(
                "ordinal padding must be finite and >= 0".to_owned(),
            ));
        }
        if layout == OrdinalLayout::Band && padding > 1.0 {
            return Err(ChartError::InvalidData(
                "band padding must be <= 1".to_owned(),
            ));
        }

        let mut scale = Self {
            keys: keys.into_iter().collect(),
            layout,
            range_start: range.0,
            range_end: range.1,
            padding,
            round,
            start: 0.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.rescale();
        Ok(scale)
    }

    fn rescale(&mut self) {
        let (inner, outer) = match self.layout {
            OrdinalLayout::Point => (1.0, self.padding),
            OrdinalLayout::Band => (self.padding, self.padding),
        };
        let count = self.keys.len() as f64;
        let low = self.range_start.min(self.range_end);
        let high = self.range_start.max(self.range_end);

        let mut step = (high - low) / (count - inner + outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut start = low + (high - low - step * (count - inner)) * 0.5;
        let mut bandwidth = step * (1.0 - inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }

        self.start = start;
        self.step = step;
        self.bandwidth = bandwidth;
    }

    #[must_use]
    pub fn layout(&self) -> OrdinalLayout {
        self.layout
    }

    pub fn keys(&self) -> impl Iterator<Item = &AxisValue> {
        self.keys.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    #[must_use]
    pub fn is_rounded(&self) -> bool {
        self.round
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Position of `key`: the point itself, or the leading edge of its band.
    /// A reversed range lays keys out from the high end.
    #[must_use]
    pub fn map(&self, key: &AxisValue) -> Option<f64> {
        let index = self.keys.get_index_of(key)?;
        let slot = if self.range_end < self.range_start {
            self.keys.len() - 1 - index
        } else {
            index
        };
        Some(self.start + self.step * slot as f64)
    }
}
