use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Correlation at a single lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelation {
    pub lag: f64,
    /// `None` when the lag has no usable overlap or zero variance
    pub value: Option<f64>,
    /// Number of observed epochs inside the shifted grid
    pub n_valid: usize,
}

impl LagCorrelation {
    pub fn new(lag: f64, ccf: f64, n_valid: usize) -> Self {
        LagCorrelation {
            lag,
            value: if ccf.is_nan() { None } else { Some(ccf) },
            n_valid,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

/// Cross-correlation function aligned positionally with the lag set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CcfCurve {
    points: Vec<LagCorrelation>,
}

impl CcfCurve {
    pub fn new(points: Vec<LagCorrelation>) -> Self {
        CcfCurve { points }
    }

    pub fn points(&self) -> &[LagCorrelation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LagCorrelation> {
        self.points.iter()
    }

    /// Flat values with NaN at undefined lags.
    pub fn values(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|point| point.value.unwrap_or(f64::NAN))
            .collect()
    }

    /// The defined point with the highest correlation.
    ///
    /// Ties resolve to the earliest point in lag-set order. Returns `None`
    /// when no lag is defined.
    pub fn peak(&self) -> Option<LagCorrelation> {
        self.points
            .iter()
            .rev()
            .filter_map(|point| point.value.map(|value| (OrderedFloat(value), point)))
            .max_by_key(|(value, _)| *value)
            .map(|(_, point)| *point)
    }
}

impl IntoIterator for CcfCurve {
    type Item = LagCorrelation;
    type IntoIter = std::vec::IntoIter<LagCorrelation>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
