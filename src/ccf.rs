//! Modified Interpolated Cross-Correlation
//!
//! This module computes the cross-correlation function between two unevenly
//! sampled light curves. For every candidate lag the interpolated series' time
//! axis is shifted, its fluxes are linearly resampled onto the observed
//! series' epochs, epochs outside the shifted range are masked out, and a
//! normalized correlation is taken over the remaining pairs.
//!
//! Lags are independent of each other and may be swept sequentially or in
//! parallel with identical results.

pub mod curve;
pub mod grid;
pub mod interpolation;
pub mod lag;
pub mod mask;
pub mod statistics;

#[cfg(test)]
pub(crate) mod testing;

pub use curve::{CcfCurve, LagCorrelation};
pub use lag::LagSet;
pub use mask::OverlapWindow;
pub use statistics::CorrelationStats;

use crate::error::CcfError;
use crate::time_series::LightCurve;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Environment variable selecting the execution mode.
pub const EXECUTION_ENV: &str = "MICCF_EXECUTION";
/// Environment variable overriding the parallel threshold.
pub const PARALLEL_THRESHOLD_ENV: &str = "MICCF_PARALLEL_THRESHOLD";

/// How the lag sweep is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One lag after another on the calling thread
    Sequential,
    /// Lags distributed over the rayon thread pool
    Parallel,
}

impl FromStr for ExecutionMode {
    type Err = CcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(ExecutionMode::Sequential),
            "parallel" => Ok(ExecutionMode::Parallel),
            other => Err(CcfError::InvalidConfig(format!(
                "unknown execution mode '{}'",
                other
            ))),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcfConfig {
    /// Scheduling of the lag sweep (default: parallel)
    pub execution: ExecutionMode,
    /// Sweeps with fewer lags than this run sequentially even in parallel mode (default: 32)
    pub parallel_threshold: usize,
}

impl Default for CcfConfig {
    fn default() -> Self {
        CcfConfig {
            execution: ExecutionMode::Parallel,
            parallel_threshold: 32,
        }
    }
}

impl CcfConfig {
    pub fn new(execution: ExecutionMode, parallel_threshold: usize) -> Self {
        CcfConfig {
            execution,
            parallel_threshold,
        }
    }

    /// Reads `MICCF_EXECUTION` and `MICCF_PARALLEL_THRESHOLD`, keeping defaults
    /// for unset or unparseable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CcfConfig::default();

        if let Some(value) = lookup(EXECUTION_ENV) {
            match value.parse::<ExecutionMode>() {
                Ok(mode) => config.execution = mode,
                Err(err) => warn!(%err, "ignoring {}", EXECUTION_ENV),
            }
        }

        if let Some(value) = lookup(PARALLEL_THRESHOLD_ENV) {
            match value.trim().parse::<usize>() {
                Ok(threshold) => config.parallel_threshold = threshold,
                Err(err) => warn!(%err, value = %value, "ignoring {}", PARALLEL_THRESHOLD_ENV),
            }
        }

        config
    }
}

/// Reusable per-lag buffers: shifted grid, resampled fluxes and validity mask.
///
/// A workspace is owned by one worker and overwritten for every lag it
/// processes.
#[derive(Debug, Default)]
pub struct Workspace {
    grid: Vec<f64>,
    resampled: Vec<f64>,
    mask: Vec<bool>,
}

impl Workspace {
    pub fn with_capacity(n_interpolated: usize, n_observed: usize) -> Self {
        Workspace {
            grid: Vec::with_capacity(n_interpolated),
            resampled: Vec::with_capacity(n_observed),
            mask: Vec::with_capacity(n_observed),
        }
    }

    /// Runs the four stages for a single lag.
    pub fn correlate(
        &mut self,
        interpolated: &LightCurve,
        observed: &LightCurve,
        lag: f64,
    ) -> CorrelationStats {
        grid::shift_into(interpolated.times(), lag, &mut self.grid);
        interpolation::resample_into(
            &self.grid,
            interpolated.fluxes(),
            observed.times(),
            &mut self.resampled,
        );

        let window = grid::bounds(&self.grid).map(|(start, end)| OverlapWindow::new(start, end));
        mask::overlap_mask_into(window, observed.times(), &mut self.mask);

        let stats = statistics::correlate_masked(observed.fluxes(), &self.resampled, &self.mask);
        trace!(lag, n_valid = stats.n_valid, ccf = stats.ccf, "correlated lag");
        stats
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn resampled(&self) -> &[f64] {
        &self.resampled
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }
}

/// Sweeps lag sets over pairs of light curves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CcfEngine {
    config: CcfConfig,
}

impl CcfEngine {
    pub fn new(config: CcfConfig) -> Self {
        CcfEngine { config }
    }

    pub fn config(&self) -> &CcfConfig {
        &self.config
    }

    /// Correlates `observed` against `interpolated` shifted by every lag.
    ///
    /// The interpolated curve's times must be ascending. The result has one
    /// point per lag in lag-set order; lags without overlap or with zero
    /// variance are undefined rather than failing the sweep.
    pub fn compute(
        &self,
        interpolated: &LightCurve,
        observed: &LightCurve,
        lags: &LagSet,
    ) -> CcfCurve {
        if !interpolated.is_time_sorted() {
            warn!("interpolated series times are not ascending; interpolation is unreliable");
        }

        let parallel = self.config.execution == ExecutionMode::Parallel
            && lags.len() >= self.config.parallel_threshold;

        debug!(
            n_lags = lags.len(),
            n_interpolated = interpolated.len(),
            n_observed = observed.len(),
            parallel,
            "starting cross-correlation sweep"
        );

        let correlate = |workspace: &mut Workspace, lag: f64| {
            let stats = workspace.correlate(interpolated, observed, lag);
            LagCorrelation::new(lag, stats.ccf, stats.n_valid)
        };

        let points: Vec<LagCorrelation> = if parallel {
            lags.as_slice()
                .par_iter()
                .map_init(
                    || Workspace::with_capacity(interpolated.len(), observed.len()),
                    |workspace, &lag| correlate(workspace, lag),
                )
                .collect()
        } else {
            let mut workspace = Workspace::with_capacity(interpolated.len(), observed.len());
            lags.iter()
                .map(|lag| correlate(&mut workspace, lag))
                .collect()
        };

        CcfCurve::new(points)
    }

    /// Flat-slice form of [`CcfEngine::compute`] with NaN at undefined lags.
    ///
    /// # Errors
    /// Returns `CcfError::LengthMismatch` when `x1`/`y1` or `x2`/`y2` differ in
    /// length and `CcfError::NonFiniteValue` for NaN or infinite inputs. No lag
    /// is computed in either case.
    pub fn compute_raw(
        &self,
        x1: &[f64],
        y1: &[f64],
        x2: &[f64],
        y2: &[f64],
        lags: &[f64],
    ) -> Result<Vec<f64>, CcfError> {
        let interpolated = LightCurve::validated(x1.to_vec(), y1.to_vec(), "interpolated")?;
        let observed = LightCurve::validated(x2.to_vec(), y2.to_vec(), "observed")?;
        let lags = LagSet::new(lags.to_vec())?;
        Ok(self.compute(&interpolated, &observed, &lags).values())
    }
}

/// Computes the modified interpolated cross-correlation with the default engine.
///
/// `(x1, y1)` is the interpolated series and must have ascending times;
/// `(x2, y2)` is the observed series. Returns one value per lag, NaN where the
/// lag has no overlap or zero variance.
///
/// # Examples
/// ```
/// use miccf::compute_ccf;
///
/// let x = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let y = [1.0, 2.0, 3.0, 2.0, 1.0];
/// let ccf = compute_ccf(&x, &y, &x, &y, &[-1.0, 0.0, 1.0]).unwrap();
///
/// assert_eq!(ccf.len(), 3);
/// assert!((ccf[1] - 1.0).abs() < 1e-12);
/// ```
pub fn compute_ccf(
    x1: &[f64],
    y1: &[f64],
    x2: &[f64],
    y2: &[f64],
    lags: &[f64],
) -> Result<Vec<f64>, CcfError> {
    CcfEngine::default().compute_raw(x1, y1, x2, y2, lags)
}

#[cfg(test)]
mod tests {
    use super::testing::{gaussian_pulse, irregular_epochs, reference_ccf};
    use super::*;
    use std::collections::HashMap;

    fn assert_same_values(left: &[f64], right: &[f64]) {
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            if l.is_nan() || r.is_nan() {
                assert!(l.is_nan() && r.is_nan(), "{} vs {}", l, r);
            } else {
                assert!((l - r).abs() < 1e-10, "{} vs {}", l, r);
            }
        }
    }

    #[test]
    fn execution_mode_parses_case_insensitively() {
        assert_eq!(
            "Parallel".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Parallel
        );
        assert_eq!(
            " sequential ".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Sequential
        );
        assert!("threads".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn config_lookup_applies_overrides() {
        let vars: HashMap<&str, &str> = [
            (EXECUTION_ENV, "sequential"),
            (PARALLEL_THRESHOLD_ENV, "4"),
        ]
        .into_iter()
        .collect();
        let config = CcfConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config, CcfConfig::new(ExecutionMode::Sequential, 4));
    }

    #[test]
    fn config_lookup_keeps_defaults_for_bad_values() {
        let config = CcfConfig::from_lookup(|key| match key {
            EXECUTION_ENV => Some("sideways".to_string()),
            PARALLEL_THRESHOLD_ENV => Some("-3".to_string()),
            _ => None,
        });
        assert_eq!(config, CcfConfig::default());
    }

    #[test]
    fn config_serializes_mode_in_lowercase() {
        let json = serde_json::to_string(&CcfConfig::default()).unwrap();
        assert_eq!(json, r#"{"execution":"parallel","parallel_threshold":32}"#);
    }

    #[test]
    fn workspace_exposes_stage_outputs() {
        let interpolated = LightCurve::new(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 20.0]).unwrap();
        let observed = LightCurve::new(vec![0.5, 1.5, 2.5, 3.5], vec![1.0, 2.0, 4.0, 3.0]).unwrap();
        let mut workspace = Workspace::default();

        let stats = workspace.correlate(&interpolated, &observed, 1.0);

        assert_eq!(workspace.grid(), &[1.0, 2.0, 3.0]);
        assert_eq!(workspace.resampled(), &[0.0, 5.0, 15.0, 20.0]);
        assert_eq!(workspace.mask(), &[false, true, true, false]);
        assert_eq!(stats.n_valid, 2);
        assert!((stats.ccf - 1.0).abs() < 1e-12);
    }

    #[test]
    fn workspace_is_reset_between_lags() {
        let interpolated = LightCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 2.0]).unwrap();
        let observed = LightCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 2.0]).unwrap();
        let mut workspace = Workspace::default();

        let far = workspace.correlate(&interpolated, &observed, 100.0);
        assert_eq!(far.n_valid, 0);
        assert!(far.ccf.is_nan());

        let aligned = workspace.correlate(&interpolated, &observed, 0.0);
        assert_eq!(aligned.n_valid, 3);
        assert!((aligned.ccf - 1.0).abs() < 1e-12);
    }

    #[test]
    fn engine_matches_naive_reference() {
        let x1 = irregular_epochs(60, 0.0);
        let x2 = irregular_epochs(45, 3.3);
        let y1: Vec<f64> = x1.iter().map(|&t| gaussian_pulse(t, 30.0, 6.0)).collect();
        let y2: Vec<f64> = x2.iter().map(|&t| gaussian_pulse(t - 4.0, 30.0, 6.0)).collect();
        let lags = LagSet::from_range(-70.0, 70.0, 0.75).unwrap();

        let expected = reference_ccf(&x1, &y1, &x2, &y2, lags.as_slice());
        let actual = compute_ccf(&x1, &y1, &x2, &y2, lags.as_slice()).unwrap();

        assert_same_values(&actual, &expected);
        assert!(actual.iter().any(|value| value.is_nan()));
        assert!(actual.iter().any(|value| value.is_finite()));
    }

    #[test]
    fn sequential_and_parallel_agree_bitwise() {
        let x1 = irregular_epochs(80, 0.0);
        let x2 = irregular_epochs(70, 1.7);
        let y1: Vec<f64> = x1.iter().map(|&t| (t / 7.0).sin() + 0.1 * t).collect();
        let y2: Vec<f64> = x2.iter().map(|&t| (t / 5.0).cos()).collect();
        let interpolated = LightCurve::new(x1, y1).unwrap();
        let observed = LightCurve::new(x2, y2).unwrap();
        let lags = LagSet::from_range(-50.0, 50.0, 0.5).unwrap();

        let sequential = CcfEngine::new(CcfConfig::new(ExecutionMode::Sequential, 0))
            .compute(&interpolated, &observed, &lags);
        let parallel = CcfEngine::new(CcfConfig::new(ExecutionMode::Parallel, 0))
            .compute(&interpolated, &observed, &lags);

        let seq_bits: Vec<u64> = sequential.values().iter().map(|v| v.to_bits()).collect();
        let par_bits: Vec<u64> = parallel.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(seq_bits, par_bits);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn compute_raw_reports_shape_errors() {
        let engine = CcfEngine::default();
        assert_eq!(
            engine
                .compute_raw(&[0.0, 1.0], &[1.0], &[0.0], &[1.0], &[0.0])
                .unwrap_err(),
            CcfError::LengthMismatch {
                series: "interpolated",
                times: 2,
                fluxes: 1,
            }
        );
        assert_eq!(
            engine
                .compute_raw(&[0.0], &[1.0], &[0.0, 1.0, 2.0], &[1.0], &[0.0])
                .unwrap_err(),
            CcfError::LengthMismatch {
                series: "observed",
                times: 3,
                fluxes: 1,
            }
        );
        assert_eq!(
            engine
                .compute_raw(&[0.0], &[1.0], &[0.0], &[1.0], &[f64::NAN])
                .unwrap_err(),
            CcfError::NonFiniteValue {
                series: "lags",
                index: 0,
            }
        );
    }

    #[test]
    fn empty_inputs_produce_undefined_points() {
        let empty = LightCurve::new(Vec::new(), Vec::new()).unwrap();
        let observed = LightCurve::new(vec![0.0, 1.0], vec![1.0, 2.0]).unwrap();
        let lags = LagSet::new(vec![0.0, 1.0]).unwrap();

        let curve = CcfEngine::default().compute(&empty, &observed, &lags);
        assert_eq!(curve.len(), 2);
        assert!(curve.iter().all(|point| !point.is_defined() && point.n_valid == 0));

        let curve = CcfEngine::default().compute(&observed, &empty, &lags);
        assert!(curve.iter().all(|point| !point.is_defined()));
    }

    #[test]
    fn empty_lag_set_is_not_an_error() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 1.0];
        assert!(compute_ccf(&x, &y, &x, &y, &[]).unwrap().is_empty());
    }
}
