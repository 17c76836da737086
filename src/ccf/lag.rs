use crate::error::{first_non_finite, CcfError};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of lags `from_range` and `linspace` will generate.
pub const MAX_GENERATED_LAGS: usize = 10_000_000;

/// Ordered set of candidate lags.
///
/// Lags are processed independently; duplicates and arbitrary order are
/// allowed and results keep the same positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LagSet {
    lags: Vec<f64>,
}

impl LagSet {
    /// Wraps explicit lag values.
    ///
    /// # Errors
    /// Returns `CcfError::NonFiniteValue` if any lag is NaN or infinite.
    pub fn new(lags: Vec<f64>) -> Result<Self, CcfError> {
        if let Some(index) = first_non_finite(&lags) {
            return Err(CcfError::NonFiniteValue {
                series: "lags",
                index,
            });
        }
        Ok(LagSet { lags })
    }

    /// Evenly spaced lags in the half-open interval `[start, stop)`.
    ///
    /// Each value is computed as `start + i * step` so rounding error does not
    /// accumulate across the grid.
    pub fn from_range(start: f64, stop: f64, step: f64) -> Result<Self, CcfError> {
        if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
            return Err(CcfError::InvalidLagRange(
                "start, stop and step must be finite".to_string(),
            ));
        }
        if step <= 0.0 {
            return Err(CcfError::InvalidLagRange(format!(
                "step must be positive, got {}",
                step
            )));
        }
        if stop < start {
            return Err(CcfError::InvalidLagRange(format!(
                "stop {} is before start {}",
                stop, start
            )));
        }

        let steps = ((stop - start) / step).ceil();
        if !steps.is_finite() || steps > MAX_GENERATED_LAGS as f64 {
            return Err(CcfError::InvalidLagRange(format!(
                "range [{}, {}) with step {} exceeds {} lags",
                start, stop, step, MAX_GENERATED_LAGS
            )));
        }
        let count = steps as usize;
        let lags = (0..count)
            .map(|i| start + i as f64 * step)
            .filter(|&lag| lag < stop)
            .collect();
        Ok(LagSet { lags })
    }

    /// `count` evenly spaced lags from `start` to `end`, both included.
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self, CcfError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CcfError::InvalidLagRange(
                "start and end must be finite".to_string(),
            ));
        }
        if count > MAX_GENERATED_LAGS {
            return Err(CcfError::InvalidLagRange(format!(
                "count {} exceeds {} lags",
                count, MAX_GENERATED_LAGS
            )));
        }
        let lags = match count {
            0 => {
                return Err(CcfError::InvalidLagRange(
                    "count must be at least 1".to_string(),
                ))
            }
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                (0..count)
                    .map(|i| if i == count - 1 { end } else { start + i as f64 * step })
                    .collect()
            }
        };
        Ok(LagSet { lags })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.lags
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.lags.iter().copied()
    }
}

impl TryFrom<Vec<f64>> for LagSet {
    type Error = CcfError;

    fn try_from(lags: Vec<f64>) -> Result<Self, Self::Error> {
        LagSet::new(lags)
    }
}

impl From<LagSet> for Vec<f64> {
    fn from(set: LagSet) -> Self {
        set.lags
    }
}
