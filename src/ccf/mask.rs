//! Overlap masking between a shifted grid and the observation epochs.

/// Closed time interval covered by a shifted grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapWindow {
    pub start: f64,
    pub end: f64,
}

impl OverlapWindow {
    pub fn new(start: f64, end: f64) -> Self {
        OverlapWindow { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Marks each target time as inside (`true`) or outside the window.
///
/// A missing window (empty grid) invalidates every target. Returns the number
/// of valid targets.
pub fn overlap_mask_into(
    window: Option<OverlapWindow>,
    targets: &[f64],
    mask: &mut Vec<bool>,
) -> usize {
    mask.clear();
    match window {
        Some(window) => mask.extend(targets.iter().map(|&t| window.contains(t))),
        None => mask.resize(targets.len(), false),
    }
    mask.iter().filter(|&&valid| valid).count()
}
