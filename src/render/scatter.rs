use std::io::Cursor;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::render_error;
use crate::color::PointColor;
use crate::config::{RenderConfig, SpectralStyle};
use crate::data::model::SpectralPoint;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Spectral scatter: time × frequency, colour and alpha from magnitude
// ---------------------------------------------------------------------------

/// What the scatter renderer draws: points, their colours and the exact axis
/// limits.
#[derive(Debug, Clone)]
pub struct ScatterFrame {
    pub points: Vec<SpectralPoint>,
    /// One colour per point, same order.
    pub colors: Vec<PointColor>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// Render the scatter into an RGB bitmap and encode it as PNG.
pub fn render_scatter_png(frame: &ScatterFrame, config: &RenderConfig) -> Result<Vec<u8>, PipelineError> {
    let style = &config.spectral;
    let (width, height) = style.pixel_size();
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_scatter(&root, frame, style).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }

    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| PipelineError::Render("pixel buffer does not match image size".to_string()))?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(render_error)?;
    Ok(png)
}

/// Fill the background and draw every visible point. No axes, ticks or
/// labels; the data range spans the whole area.
pub fn draw_scatter<DB>(
    root: &DrawingArea<DB, Shift>,
    frame: &ScatterFrame,
    style: &SpectralStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let (r, g, b) = style.background;
    root.fill(&RGBColor(r, g, b))?;

    let (x0, x1) = frame.x_range;
    let (y0, y1) = frame.y_range;
    let mut chart = ChartBuilder::on(root).build_cartesian_2d(x0..x1, y0..y1)?;

    let radius = style.point_radius_px() as i32;
    chart.draw_series(
        frame
            .points
            .iter()
            .zip(&frame.colors)
            .filter(|(_, c)| c.alpha > 0.0)
            .map(|(p, c)| {
                let color = RGBColor(c.rgb.red, c.rgb.green, c.rgb.blue).mix(c.alpha);
                Circle::new((p.time, p.freq), radius, color.filled())
            }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{magnitude_colors, Colormap};

    fn small_config() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.spectral.dpi = 50;
        config.spectral.width_in = 2.0;
        config
    }

    fn frame() -> ScatterFrame {
        let points = vec![
            SpectralPoint { time: 0.0, freq: 100.0, magnitude: 1.0 },
            SpectralPoint { time: 1.0, freq: 200.0, magnitude: 0.5 },
        ];
        let mags: Vec<f64> = points.iter().map(|p| p.magnitude).collect();
        ScatterFrame {
            colors: magnitude_colors(&mags, Colormap::Inferno, 12.0),
            points,
            x_range: (0.0, 1.0),
            y_range: (100.0, 200.0),
        }
    }

    #[test]
    fn encodes_a_png_of_the_configured_size() {
        let config = small_config();
        let png = render_scatter_png(&frame(), &config).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), config.spectral.pixel_size());
    }

    #[test]
    fn background_is_black_and_points_are_lit() {
        let config = small_config();
        let png = render_scatter_png(&frame(), &config).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        let (w, h) = img.dimensions();

        assert_eq!(img.get_pixel(w / 2, h / 2).0, [0, 0, 0]);
        let lit = img.pixels().filter(|p| p.0 != [0, 0, 0]).count();
        assert!(lit > 0);
    }
}
