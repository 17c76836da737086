use serde::{Deserialize, Serialize};

/// Summary of one lag's correlation over the masked pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    pub n_valid: usize,
    pub mean_observed: f64,
    pub std_observed: f64,
    pub mean_interpolated: f64,
    pub std_interpolated: f64,
    /// Normalized correlation, NaN when undefined
    pub ccf: f64,
}

pub fn masked_mean(values: &[f64], mask: &[bool]) -> f64 {
    let (sum, count) = values
        .iter()
        .zip(mask)
        .filter(|&(_, &valid)| valid)
        .fold((0.0, 0usize), |(sum, count), (&value, _)| (sum + value, count + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Population (divide by n) standard deviation of the masked values around `mean`.
///
/// Returns exactly 0.0 when the masked values are all equal.
pub fn masked_population_std_dev(values: &[f64], mask: &[bool], mean: f64) -> f64 {
    let (sum_sq, count, lo, hi) = values
        .iter()
        .zip(mask)
        .filter(|&(_, &valid)| valid)
        .fold(
            (0.0, 0usize, f64::INFINITY, f64::NEG_INFINITY),
            |(sum_sq, count, lo, hi), (&value, _)| {
                (sum_sq + (value - mean).powi(2), count + 1, lo.min(value), hi.max(value))
            },
        );
    if count == 0 {
        return f64::NAN;
    }
    // `mean` of a constant run can be off by rounding, leaving a tiny residual
    if lo == hi {
        return 0.0;
    }
    (sum_sq / count as f64).sqrt()
}

/// Correlates observed and interpolated fluxes over the pairs where `mask` is set.
///
/// `ccf = Σ(o − μo)(i − μi) / (n · σo · σi)` with population standard
/// deviations. The result is NaN when no pair is valid or either deviation is
/// not strictly positive, which also covers a single valid pair.
pub fn correlate_masked(observed: &[f64], interpolated: &[f64], mask: &[bool]) -> CorrelationStats {
    let n_valid = mask.iter().filter(|&&valid| valid).count();
    let mean_observed = masked_mean(observed, mask);
    let mean_interpolated = masked_mean(interpolated, mask);
    let std_observed = masked_population_std_dev(observed, mask, mean_observed);
    let std_interpolated = masked_population_std_dev(interpolated, mask, mean_interpolated);

    let defined = n_valid > 0 && std_observed > 0.0 && std_interpolated > 0.0;
    let ccf = if defined {
        let covariance_sum: f64 = observed
            .iter()
            .zip(interpolated)
            .zip(mask)
            .filter(|&(_, &valid)| valid)
            .map(|((&o, &i), _)| (o - mean_observed) * (i - mean_interpolated))
            .sum();
        covariance_sum / (n_valid as f64 * std_observed * std_interpolated)
    } else {
        f64::NAN
    };

    CorrelationStats {
        n_valid,
        mean_observed,
        std_observed,
        mean_interpolated,
        std_interpolated,
        ccf,
    }
}
