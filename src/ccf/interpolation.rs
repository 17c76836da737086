//! Piecewise-linear resampling onto arbitrary target times.
//!
//! Targets outside the grid clamp to the nearest endpoint value instead of
//! extrapolating. Clamped values are always masked out before statistics, they
//! only need to be finite.

/// Linearly interpolates `values` (sampled on ascending `grid`) at time `t`.
///
/// Returns NaN only when the grid is empty. `grid` and `values` must have the
/// same length.
pub fn interpolate_at(grid: &[f64], values: &[f64], t: f64) -> f64 {
    let n = grid.len();
    if n == 0 {
        return f64::NAN;
    }
    if t <= grid[0] {
        return values[0];
    }
    if t >= grid[n - 1] {
        return values[n - 1];
    }

    // grid[0] < t < grid[n - 1], so the split lands in 1..n
    let idx = grid.partition_point(|&g| g <= t);
    let (t0, t1) = (grid[idx - 1], grid[idx]);
    let (v0, v1) = (values[idx - 1], values[idx]);

    v0 + (v1 - v0) * (t - t0) / (t1 - t0)
}

/// Resamples `values` on `grid` at every target time into `out`.
///
/// Each target is located by binary search, so the cost is
/// O(targets · log grid) and targets need not be sorted.
pub fn resample_into(grid: &[f64], values: &[f64], targets: &[f64], out: &mut Vec<f64>) {
    out.clear();
    out.extend(targets.iter().map(|&t| interpolate_at(grid, values, t)));
}
