use super::model::SpectralPoint;

// ---------------------------------------------------------------------------
// Magnitude threshold filter
// ---------------------------------------------------------------------------

/// Largest finite magnitude, or `None` when there is none.
pub fn max_magnitude(points: &[SpectralPoint]) -> Option<f64> {
    points
        .iter()
        .map(|p| p.magnitude)
        .filter(|m| m.is_finite())
        .reduce(f64::max)
}

/// Threshold below which points are dropped: `ratio * max(magnitude)`.
pub fn magnitude_threshold(points: &[SpectralPoint], ratio: f64) -> Option<f64> {
    max_magnitude(points).map(|max| ratio * max)
}

/// Keep the points with `magnitude > ratio * max(magnitude)`, in order.
///
/// The comparison is strict, so a table whose magnitudes are all zero keeps
/// nothing.
pub fn filter_tiny_magnitudes(points: Vec<SpectralPoint>, ratio: f64) -> Vec<SpectralPoint> {
    let Some(threshold) = magnitude_threshold(&points, ratio) else {
        return Vec::new();
    };
    points
        .into_iter()
        .filter(|p| p.magnitude > threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(mags: &[f64]) -> Vec<SpectralPoint> {
        mags.iter()
            .enumerate()
            .map(|(i, &m)| SpectralPoint {
                time: i as f64,
                freq: 1.0,
                magnitude: m,
            })
            .collect()
    }

    #[test]
    fn drops_points_below_two_percent_of_max() {
        let pts = points(&[1.0, 0.01, 0.5]);
        assert_eq!(magnitude_threshold(&pts, 0.02), Some(0.02));

        let kept = filter_tiny_magnitudes(pts, 0.02);
        let mags: Vec<f64> = kept.iter().map(|p| p.magnitude).collect();
        assert_eq!(mags, vec![1.0, 0.5]);
    }

    #[test]
    fn point_exactly_at_threshold_is_dropped() {
        let kept = filter_tiny_magnitudes(points(&[1.0, 0.02]), 0.02);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn all_zero_keeps_nothing() {
        assert!(filter_tiny_magnitudes(points(&[0.0, 0.0]), 0.02).is_empty());
    }

    #[test]
    fn empty_input_has_no_threshold() {
        assert_eq!(magnitude_threshold(&[], 0.02), None);
        assert!(filter_tiny_magnitudes(Vec::new(), 0.02).is_empty());
    }
}
