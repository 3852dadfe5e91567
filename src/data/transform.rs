use std::f64::consts::TAU;

use super::model::{GroupRecord, SpectralPoint};

/// Angular frequency (rad/s) to Hz.
pub fn rad_to_hz(omega: f64) -> f64 {
    omega / TAU
}

/// Linear amplitude to decibels, `20 * log10(m)`.
///
/// Zero gives `-inf` and negative values give NaN; callers decide what to do
/// with non-finite results.
pub fn amplitude_to_db(magnitude: f64) -> f64 {
    20.0 * magnitude.log10()
}

/// Convert both frequency columns to Hz and the magnitude to dB, in place.
///
/// Returns the number of rows whose dB value is not finite.
pub fn groups_to_hz_db(groups: &mut [GroupRecord]) -> usize {
    let mut non_finite = 0;
    for g in groups.iter_mut() {
        g.natural_freq = rad_to_hz(g.natural_freq);
        g.measured_freq = rad_to_hz(g.measured_freq);
        g.magnitude = amplitude_to_db(g.magnitude);
        if !g.magnitude.is_finite() {
            non_finite += 1;
        }
    }
    non_finite
}

/// Convert the frequency of every point to Hz, in place.
pub fn points_to_hz(points: &mut [SpectralPoint]) {
    for p in points.iter_mut() {
        p.freq = rad_to_hz(p.freq);
    }
}
