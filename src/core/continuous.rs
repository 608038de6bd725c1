use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Affine mapping from a numeric domain onto a pixel range.
///
/// A zero-width domain maps every value to the middle of the range instead of
/// failing, so a series with one distinct value still draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    round: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        validate_range(range)?;

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
            round: false,
        })
    }

    /// Snaps mapped output to whole pixels.
    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn is_rounded(self) -> bool {
        self.round
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        let pixel = self.range_start + normalized * (self.range_end - self.range_start);
        if self.round { pixel.round() } else { pixel }
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Logarithmic mapping. Both domain ends must be strictly positive; the base
/// only affects nice rounding and tick placement, not the mapping itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    domain_start: f64,
    domain_end: f64,
    base: f64,
    transformed: LinearScale,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64), base: f64) -> ChartResult<Self> {
        let (low, high) = domain;
        if !low.is_finite() || !high.is_finite() || low <= 0.0 || high <= 0.0 {
            return Err(ChartError::InvalidLogDomain { low, high });
        }
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(ChartError::InvalidData(format!(
                "log scale base must be finite, > 0 and != 1, got {base}"
            )));
        }

        let transformed = LinearScale::new((low.ln(), high.ln()), range)?;
        Ok(Self {
            domain_start: low,
            domain_end: high,
            base,
            transformed,
        })
    }

    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.transformed = self.transformed.with_round(round);
        self
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.transformed.range()
    }

    #[must_use]
    pub fn base(self) -> f64 {
        self.base
    }

    #[must_use]
    pub fn is_rounded(self) -> bool {
        self.transformed.is_rounded()
    }

    /// Non-positive values have no logarithm and map to `None`.
    #[must_use]
    pub fn map(self, value: f64) -> Option<f64> {
        if value <= 0.0 || !value.is_finite() {
            return None;
        }
        Some(self.transformed.map(value.ln()))
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        self.transformed.invert(pixel).exp()
    }
}

pub(crate) fn validate_range(range: (f64, f64)) -> ChartResult<()> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }
    Ok(())
}
