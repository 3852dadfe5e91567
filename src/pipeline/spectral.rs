use std::path::{Path, PathBuf};

use super::TabularPipeline;
use crate::color::magnitude_colors;
use crate::config::RenderConfig;
use crate::data::filter::filter_tiny_magnitudes;
use crate::data::model::SpectralPoint;
use crate::data::transform::points_to_hz;
use crate::error::{PipelineError, Result};
use crate::render::scatter::{render_scatter_png, ScatterFrame};

/// Spectral point table → `<input>.png` scatter.
///
/// Filtering and colour mapping use the constants in `config.spectral`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralScatterPipeline;

/// `(min, max)` of the finite values. A degenerate range is widened by ±0.5
/// so it still has an extent; no finite values gives `(0, 1)`.
pub fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

impl TabularPipeline for SpectralScatterPipeline {
    type Record = SpectralPoint;
    type Prepared = ScatterFrame;

    fn name(&self) -> &'static str {
        "spectral points"
    }

    fn transform(
        &self,
        input: &Path,
        points: Vec<SpectralPoint>,
        config: &RenderConfig,
    ) -> Result<ScatterFrame> {
        let style = &config.spectral;
        let total = points.len();

        let mut points = filter_tiny_magnitudes(points, style.threshold_ratio);
        if points.is_empty() {
            return Err(PipelineError::EmptyAfterFilter {
                path: input.to_path_buf(),
            });
        }
        log::debug!(
            "Kept {} of {total} points above {} of the peak magnitude",
            points.len(),
            style.threshold_ratio
        );

        points_to_hz(&mut points);

        let magnitudes: Vec<f64> = points.iter().map(|p| p.magnitude).collect();
        let colors = magnitude_colors(&magnitudes, style.colormap, style.saturation_gain);

        let x_range = value_range(points.iter().map(|p| p.time));
        let y_range = value_range(points.iter().map(|p| p.freq));
        log::debug!("Axis limits: time {x_range:?}, frequency {y_range:?} Hz");

        Ok(ScatterFrame {
            points,
            colors,
            x_range,
            y_range,
        })
    }

    fn render(&self, prepared: &ScatterFrame, config: &RenderConfig) -> Result<Vec<u8>> {
        render_scatter_png(prepared, config)
    }

    /// The input path with `.png` appended, next to the input.
    fn output_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}
