use crate::color::Colormap;

// ---------------------------------------------------------------------------
// Render configuration
// ---------------------------------------------------------------------------

/// Everything a renderer needs to know about fonts, sizes and colours.
///
/// The defaults are the fixed constants both plots were designed with; a
/// value is passed explicitly into each pipeline instead of living in any
/// process-wide plotting state.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Font family used for axis labels and tick text.
    pub font_family: String,
    /// Label font size in points.
    pub font_size: f64,
    /// Stroke width for curves and reference lines.
    pub stroke_width: u32,
    pub groups: GroupsStyle,
    pub spectral: SpectralStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".to_string(),
            font_size: 11.0,
            stroke_width: 1,
            groups: GroupsStyle::default(),
            spectral: SpectralStyle::default(),
        }
    }
}

/// Layout of the two stacked group panels. Units are PDF points.
#[derive(Debug, Clone)]
pub struct GroupsStyle {
    pub panel_width: u32,
    /// Panel height divided by panel width.
    pub panel_aspect: f64,
    /// Vertical gap between the panels, relative to panel height.
    pub gap_ratio: f64,
    pub margin: u32,
    pub left_label_area: u32,
    pub bottom_label_area: u32,
    /// Shared x range and the y range of the frequency map, in Hz.
    pub freq_range: (f64, f64),
    /// Y range of the amplitude panel, in dB.
    pub db_range: (f64, f64),
    pub curve_color: (u8, u8, u8),
    pub vline_color: (u8, u8, u8),
    pub marker_color: (u8, u8, u8),
    pub marker_radius: u32,
    /// Dash and gap length of the dotted `x = y` reference, in Hz.
    pub dot_pattern: (f64, f64),
}

impl Default for GroupsStyle {
    fn default() -> Self {
        Self {
            panel_width: 360,
            panel_aspect: 0.5,
            gap_ratio: 0.1,
            margin: 6,
            left_label_area: 48,
            bottom_label_area: 34,
            freq_range: (400.0, 920.0),
            db_range: (-100.0, 100.0),
            curve_color: (0, 0, 0),
            vline_color: (0x1f, 0x77, 0xb4),
            marker_color: (0xe5, 0x00, 0x00),
            marker_radius: 2,
            dot_pattern: (1.5, 3.0),
        }
    }
}

impl GroupsStyle {
    pub fn panel_height(&self) -> u32 {
        (self.panel_width as f64 * self.panel_aspect).round() as u32
    }

    pub fn gap(&self) -> u32 {
        (self.panel_height() as f64 * self.gap_ratio).round() as u32
    }

    /// Full canvas size: both panels, the gap, the label areas and margins.
    pub fn canvas_size(&self) -> (u32, u32) {
        let width = self.left_label_area + self.panel_width + self.margin;
        let height =
            self.margin + 2 * self.panel_height() + self.gap() + self.bottom_label_area;
        (width, height)
    }
}

/// Raster scatter settings.
#[derive(Debug, Clone)]
pub struct SpectralStyle {
    pub dpi: u32,
    /// Width of the plotting area in inches.
    pub width_in: f64,
    /// Plot height divided by plot width.
    pub aspect: f64,
    /// Marker area in square points.
    pub point_area_pt2: f64,
    /// Rows with magnitude at or below `threshold_ratio * max` are dropped.
    pub threshold_ratio: f64,
    /// Normalized magnitudes are multiplied by this before clamping.
    pub saturation_gain: f64,
    pub colormap: Colormap,
    pub background: (u8, u8, u8),
}

impl Default for SpectralStyle {
    fn default() -> Self {
        Self {
            dpi: 600,
            width_in: 4.96,
            aspect: 0.5625,
            point_area_pt2: 0.1,
            threshold_ratio: 0.02,
            saturation_gain: 12.0,
            colormap: Colormap::Inferno,
            background: (0, 0, 0),
        }
    }
}

impl SpectralStyle {
    /// Image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = (self.width_in * self.dpi as f64).round().max(1.0);
        let height = (width * self.aspect).round().max(1.0);
        (width as u32, height as u32)
    }

    /// Marker radius in pixels, never below one pixel.
    pub fn point_radius_px(&self) -> u32 {
        let diameter_pt = self.point_area_pt2.max(0.0).sqrt();
        let radius_px = diameter_pt / 2.0 / 72.0 * self.dpi as f64;
        (radius_px.round() as u32).max(1)
    }
}
