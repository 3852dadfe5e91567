use eframe::egui::Color32;
use palette::{Mix, Srgb};

// ---------------------------------------------------------------------------
// Perceptual colormap
// ---------------------------------------------------------------------------

/// Evenly spaced stops (0.0, 0.1, ..., 1.0) of the inferno colormap.
const INFERNO: [[u8; 3]; 11] = [
    [0x00, 0x00, 0x04],
    [0x16, 0x0b, 0x39],
    [0x42, 0x0a, 0x68],
    [0x6a, 0x17, 0x6e],
    [0x93, 0x26, 0x67],
    [0xbc, 0x37, 0x54],
    [0xdd, 0x51, 0x3a],
    [0xf3, 0x78, 0x19],
    [0xfc, 0xa5, 0x0a],
    [0xf6, 0xd7, 0x46],
    [0xfc, 0xff, 0xa4],
];

/// A sequential colormap sampled on `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    Inferno,
}

impl Colormap {
    fn stops(self) -> &'static [[u8; 3]] {
        match self {
            Colormap::Inferno => &INFERNO,
        }
    }

    /// Colour at `t`, linearly interpolated between stops in sRGB.
    /// `t` is clamped to `[0, 1]`; NaN maps to the low end.
    pub fn sample(self, t: f64) -> Srgb<u8> {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let lo = (scaled.floor() as usize).min(stops.len() - 1);
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = (scaled - lo as f64) as f32;

        let a = stop_color(stops[lo]);
        let b = stop_color(stops[hi]);
        a.mix(b, frac).into_format()
    }
}

fn stop_color([r, g, b]: [u8; 3]) -> Srgb<f32> {
    Srgb::new(r, g, b).into_format()
}

// ---------------------------------------------------------------------------
// Magnitude → colour + alpha
// ---------------------------------------------------------------------------

/// Colour of one scatter point. `alpha` equals the saturation value the colour
/// was sampled at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointColor {
    pub rgb: Srgb<u8>,
    pub alpha: f64,
}

/// Normalize `magnitude` by `max`, multiply by `gain`, clamp to `[0, 1]`.
///
/// A positive magnitude over a zero max saturates to 1; NaN maps to 0.
pub fn saturation(magnitude: f64, max: f64, gain: f64) -> f64 {
    let v = magnitude / max * gain;
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else if v == f64::INFINITY {
        1.0
    } else {
        0.0
    }
}

/// Map every magnitude to a colormap colour and an alpha of the same value.
pub fn magnitude_colors(magnitudes: &[f64], colormap: Colormap, gain: f64) -> Vec<PointColor> {
    let max = magnitudes
        .iter()
        .copied()
        .filter(|m| m.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    magnitudes
        .iter()
        .map(|&m| {
            let v = saturation(m, max, gain);
            PointColor {
                rgb: colormap.sample(v),
                alpha: v,
            }
        })
        .collect()
}

/// Convert an `(r, g, b)` style triple to an opaque egui colour.
pub fn rgb_to_color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferno_endpoints() {
        let lo = Colormap::Inferno.sample(0.0);
        let hi = Colormap::Inferno.sample(1.0);
        assert_eq!((lo.red, lo.green, lo.blue), (0x00, 0x00, 0x04));
        assert_eq!((hi.red, hi.green, hi.blue), (0xfc, 0xff, 0xa4));
    }

    #[test]
    fn sample_clamps_out_of_range() {
        assert_eq!(Colormap::Inferno.sample(-3.0), Colormap::Inferno.sample(0.0));
        assert_eq!(Colormap::Inferno.sample(7.5), Colormap::Inferno.sample(1.0));
        assert_eq!(Colormap::Inferno.sample(f64::NAN), Colormap::Inferno.sample(0.0));
    }

    #[test]
    fn saturation_reaches_one_at_a_twelfth_of_max() {
        assert_eq!(saturation(1.0, 12.0, 12.0), 1.0);
        assert_eq!(saturation(10.0, 12.0, 12.0), 1.0);
        assert!((saturation(0.5, 12.0, 12.0) - 0.5).abs() < 1e-12);
        assert_eq!(saturation(0.0, 12.0, 12.0), 0.0);
    }

    #[test]
    fn saturation_with_zero_max_is_zero() {
        assert_eq!(saturation(0.0, 0.0, 12.0), 0.0);
    }

    #[test]
    fn alpha_matches_saturation() {
        let colors = magnitude_colors(&[1.0, 0.05, 0.01], Colormap::Inferno, 12.0);
        assert_eq!(colors[0].alpha, 1.0);
        assert!((colors[1].alpha - 0.6).abs() < 1e-12);
        assert!((colors[2].alpha - 0.12).abs() < 1e-12);
    }
}
