//! Error types for cross-correlation input validation

/// Structural errors detected before any lag is processed.
///
/// Numerical degeneracies at individual lags (no overlap, zero variance) are
/// never reported here; they show up as undefined values in the result.
#[derive(Debug, Clone, PartialEq)]
pub enum CcfError {
    /// Times and fluxes of a series have different lengths
    LengthMismatch {
        series: &'static str,
        times: usize,
        fluxes: usize,
    },
    /// A time, flux or lag is NaN or infinite
    NonFiniteValue { series: &'static str, index: usize },
    /// Parameters for generating a lag grid are unusable
    InvalidLagRange(String),
    /// A configuration value could not be parsed
    InvalidConfig(String),
}

impl std::fmt::Display for CcfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CcfError::LengthMismatch {
                series,
                times,
                fluxes,
            } => write!(
                f,
                "Length mismatch in {} series: {} times but {} fluxes",
                series, times, fluxes
            ),
            CcfError::NonFiniteValue { series, index } => {
                write!(f, "Non-finite value in {} at index {}", series, index)
            }
            CcfError::InvalidLagRange(msg) => write!(f, "Invalid lag range: {}", msg),
            CcfError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for CcfError {}

/// Returns the index of the first non-finite value, if any.
pub(crate) fn first_non_finite(values: &[f64]) -> Option<usize> {
    values.iter().position(|value| !value.is_finite())
}
