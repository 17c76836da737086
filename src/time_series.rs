use crate::error::{first_non_finite, CcfError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JULIAN_DATE: f64 = 2_440_587.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Converts a UTC timestamp to a Julian date in fractional days.
pub fn julian_date(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JULIAN_DATE
}

/// A single flux measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Epoch of the measurement
    pub time: f64,
    /// Measured flux at this epoch
    pub flux: f64,
}

impl Observation {
    /// Creates a new Observation.
    pub fn new(time: f64, flux: f64) -> Self {
        Observation { time, flux }
    }
}

/// An unevenly sampled light curve stored as parallel time and flux columns.
///
/// Times of a series used as the interpolated side of a cross-correlation
/// must be ascending. This is not enforced here, since the observed side has
/// no such requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LightCurveColumns")]
pub struct LightCurve {
    times: Vec<f64>,
    fluxes: Vec<f64>,
}

/// Unvalidated wire form of a light curve.
#[derive(Deserialize)]
struct LightCurveColumns {
    times: Vec<f64>,
    fluxes: Vec<f64>,
}

impl TryFrom<LightCurveColumns> for LightCurve {
    type Error = CcfError;

    fn try_from(columns: LightCurveColumns) -> Result<Self, Self::Error> {
        LightCurve::new(columns.times, columns.fluxes)
    }
}

impl LightCurve {
    /// Creates a light curve from matching time and flux columns.
    ///
    /// # Errors
    /// Returns `CcfError::LengthMismatch` when the columns differ in length and
    /// `CcfError::NonFiniteValue` when any entry is NaN or infinite.
    pub fn new(times: Vec<f64>, fluxes: Vec<f64>) -> Result<Self, CcfError> {
        Self::validated(times, fluxes, "light curve")
    }

    pub(crate) fn validated(
        times: Vec<f64>,
        fluxes: Vec<f64>,
        series: &'static str,
    ) -> Result<Self, CcfError> {
        if times.len() != fluxes.len() {
            return Err(CcfError::LengthMismatch {
                series,
                times: times.len(),
                fluxes: fluxes.len(),
            });
        }
        if let Some(index) = first_non_finite(&times).or_else(|| first_non_finite(&fluxes)) {
            return Err(CcfError::NonFiniteValue { series, index });
        }
        Ok(LightCurve { times, fluxes })
    }

    /// Builds a light curve from individual observations, keeping their order.
    pub fn from_observations(observations: &[Observation]) -> Result<Self, CcfError> {
        let times = observations.iter().map(|obs| obs.time).collect();
        let fluxes = observations.iter().map(|obs| obs.flux).collect();
        Self::new(times, fluxes)
    }

    /// Builds a light curve from UTC timestamps, expressing times as Julian dates.
    pub fn from_timestamped(points: &[(DateTime<Utc>, f64)]) -> Result<Self, CcfError> {
        let times = points.iter().map(|(ts, _)| julian_date(*ts)).collect();
        let fluxes = points.iter().map(|(_, flux)| *flux).collect();
        Self::new(times, fluxes)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn fluxes(&self) -> &[f64] {
        &self.fluxes
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates over the curve as observations.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.times
            .iter()
            .zip(self.fluxes.iter())
            .map(|(&time, &flux)| Observation::new(time, flux))
    }

    /// Returns `true` when times never decrease.
    pub fn is_time_sorted(&self) -> bool {
        self.times.windows(2).all(|pair| pair[0] <= pair[1])
    }
}
