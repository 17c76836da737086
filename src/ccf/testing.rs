#![allow(dead_code)]

/// Test helper: Gaussian pulse of unit height centred at `center`.
pub(crate) fn gaussian_pulse(t: f64, center: f64, width: f64) -> f64 {
    (-(t - center).powi(2) / (2.0 * width * width)).exp()
}

/// Test helper: `n` strictly ascending, unevenly spaced epochs starting near `offset`.
///
/// Consecutive epochs are at least 0.4 apart.
pub(crate) fn irregular_epochs(n: usize, offset: f64) -> Vec<f64> {
    (0..n)
        .map(|k| {
            let k = k as f64;
            offset + k + 0.3 * (1.7 * k).sin()
        })
        .collect()
}

/// Test helper: linear interpolation by forward scan, clamped at the ends.
fn scan_interp(grid: &[f64], values: &[f64], t: f64) -> f64 {
    if t <= grid[0] {
        return values[0];
    }
    if t >= grid[grid.len() - 1] {
        return values[values.len() - 1];
    }

    let idx = grid.iter().position(|&g| g > t).unwrap();
    let (t0, t1) = (grid[idx - 1], grid[idx]);
    let (v0, v1) = (values[idx - 1], values[idx]);
    v0 + (v1 - v0) * (t - t0) / (t1 - t0)
}

fn nan_mean(values: &[f64]) -> f64 {
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    valid.iter().sum::<f64>() / valid.len() as f64
}

fn nan_population_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    let variance = valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / valid.len() as f64;
    variance.sqrt()
}

/// Test helper: O(n1 · n2) cross-correlation that blanks excluded epochs with
/// NaN instead of carrying a mask.
pub(crate) fn reference_ccf(x1: &[f64], y1: &[f64], x2: &[f64], y2: &[f64], lags: &[f64]) -> Vec<f64> {
    lags.iter()
        .map(|&lag| {
            let grid: Vec<f64> = x1.iter().map(|&t| t + lag).collect();
            let lo = grid.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let mut observed = Vec::with_capacity(x2.len());
            let mut interpolated = Vec::with_capacity(x2.len());
            for (&t, &flux) in x2.iter().zip(y2) {
                if t >= lo && t <= hi {
                    observed.push(flux);
                    interpolated.push(scan_interp(&grid, y1, t));
                } else {
                    observed.push(f64::NAN);
                    interpolated.push(f64::NAN);
                }
            }

            let n_valid = observed.iter().filter(|v| !v.is_nan()).count();
            let (mo, mi) = (nan_mean(&observed), nan_mean(&interpolated));
            let (so, si) = (nan_population_std(&observed), nan_population_std(&interpolated));
            if n_valid == 0 || so == 0.0 || si == 0.0 {
                return f64::NAN;
            }

            let sum: f64 = observed
                .iter()
                .zip(&interpolated)
                .filter(|(o, _)| !o.is_nan())
                .map(|(o, i)| (o - mo) * (i - mi))
                .sum();
            sum / (n_valid as f64 * so * si)
        })
        .collect()
}
