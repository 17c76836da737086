//! Shifted time grids for the interpolated series.

/// Writes `times[j] + lag` for every epoch into `grid`, replacing its contents.
///
/// The shift is a constant offset, so an ascending input stays ascending.
pub fn shift_into(times: &[f64], lag: f64, grid: &mut Vec<f64>) {
    grid.clear();
    grid.extend(times.iter().map(|&t| t + lag));
}

/// Smallest and largest grid time, or `None` for an empty grid.
///
/// Scans the whole grid rather than reading the endpoints so the bounds stay
/// correct even when the ascending precondition is violated.
pub fn bounds(grid: &[f64]) -> Option<(f64, f64)> {
    let first = *grid.first()?;
    Some(
        grid.iter()
            .fold((first, first), |(lo, hi), &t| (lo.min(t), hi.max(t))),
    )
}
