use std::ops::Range;

/// Tolerance under which two theoretical ions count as the same ion.
pub const ION_IDENTITY_TOLERANCE: f64 = 1e-6;

/// Finds the maximal index range of `sorted` whose values lie within
/// `target ± tolerance` (inclusive).
///
/// Returns `None` when nothing falls in the window.
///
/// Example:
/// ```
/// use ascore::spectrum::find_value_range;
/// let mzs = [100.0, 200.0, 200.3, 200.6, 300.0];
/// assert_eq!(find_value_range(&mzs, 200.3, 0.3), Some(1..4));
/// assert_eq!(find_value_range(&mzs, 250.0, 0.5), None);
/// ```
pub fn find_value_range(sorted: &[f64], target: f64, tolerance: f64) -> Option<Range<usize>> {
    let lo = target - tolerance;
    let hi = target + tolerance;
    let start = sorted.partition_point(|x| *x < lo);
    let end = start + sorted[start..].partition_point(|x| *x <= hi);
    (start < end).then_some(start..end)
}

/// Number of theoretical ions with at least one observed peak within tolerance.
///
/// `observed` must be sorted. Each theoretical ion counts once.
pub fn count_matches(theoretical: &[f64], observed: &[f64], tolerance: f64) -> usize {
    theoretical
        .iter()
        .filter(|mz| find_value_range(observed, **mz, tolerance).is_some())
        .count()
}

/// Ions of `ions` that have no counterpart in `other`.
///
/// `other` must be sorted.
pub fn site_determining_ions(ions: &[f64], other: &[f64]) -> Vec<f64> {
    ions.iter()
        .copied()
        .filter(|mz| find_value_range(other, *mz, ION_IDENTITY_TOLERANCE).is_none())
        .collect()
}
