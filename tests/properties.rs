//! Property checks for the numeric transforms, the magnitude filter and the
//! colour mapping.

use std::f64::consts::TAU;

use proptest::prelude::*;
use spectral_plots::color::{magnitude_colors, saturation, Colormap};
use spectral_plots::data::filter::{filter_tiny_magnitudes, magnitude_threshold};
use spectral_plots::data::model::{GroupRecord, SpectralPoint};
use spectral_plots::data::transform::groups_to_hz_db;
use spectral_plots::pipeline::spectral::value_range;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

prop_compose! {
    fn group()(
        natural in 0.0f64..10_000.0,
        measured in 0.0f64..10_000.0,
        magnitude in 1e-6f64..100.0,
        left in any::<bool>(),
        center in any::<bool>(),
    ) -> GroupRecord {
        GroupRecord {
            natural_freq: natural,
            measured_freq: measured,
            magnitude,
            has_vertical_marker: left,
            has_scatter_marker: center,
        }
    }
}

prop_compose! {
    fn point()(
        time in 0.0f64..10.0,
        freq in 0.0f64..20_000.0,
        magnitude in 0.0f64..10.0,
    ) -> SpectralPoint {
        SpectralPoint { time, freq, magnitude }
    }
}

proptest! {
    #[test]
    fn group_transform_is_elementwise(rows in prop::collection::vec(group(), 1..50)) {
        let mut converted = rows.clone();
        let non_finite = groups_to_hz_db(&mut converted);
        prop_assert_eq!(non_finite, 0);

        for (before, after) in rows.iter().zip(&converted) {
            prop_assert!(close(after.natural_freq, before.natural_freq / TAU));
            prop_assert!(close(after.measured_freq, before.measured_freq / TAU));
            prop_assert!(close(after.magnitude, 20.0 * before.magnitude.log10()));
            prop_assert_eq!(after.has_vertical_marker, before.has_vertical_marker);
            prop_assert_eq!(after.has_scatter_marker, before.has_scatter_marker);
        }
    }

    #[test]
    fn filter_keeps_exactly_the_points_above_threshold(
        points in prop::collection::vec(point(), 1..100),
        ratio in 0.0f64..0.5,
    ) {
        let threshold = magnitude_threshold(&points, ratio).unwrap();
        let kept = filter_tiny_magnitudes(points.clone(), ratio);

        let expected: Vec<SpectralPoint> =
            points.iter().copied().filter(|p| p.magnitude > threshold).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn alpha_is_clamped_and_monotonic(
        mut magnitudes in prop::collection::vec(0.0f64..5.0, 2..50),
        gain in 0.1f64..50.0,
    ) {
        magnitudes.sort_by(f64::total_cmp);
        let colors = magnitude_colors(&magnitudes, Colormap::Inferno, gain);

        for c in &colors {
            prop_assert!((0.0..=1.0).contains(&c.alpha));
        }
        for pair in colors.windows(2) {
            prop_assert!(pair[0].alpha <= pair[1].alpha);
        }
    }

    #[test]
    fn saturation_stays_in_unit_interval(m in -10.0f64..10.0, max in 0.0f64..10.0, gain in 0.0f64..100.0) {
        let s = saturation(m, max, gain);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn axis_limits_match_data_extent(values in prop::collection::vec(-1e6f64..1e6, 2..50)) {
        let (lo, hi) = value_range(values.iter().copied());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min < max {
            prop_assert_eq!((lo, hi), (min, max));
        } else {
            prop_assert_eq!((lo, hi), (min - 0.5, max + 0.5));
        }
    }
}
