use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::pdf::PdfBackend;
use super::{dotted_diagonal, in_range, render_error, visible_runs};
use crate::config::{GroupsStyle, RenderConfig};
use crate::data::model::GroupRecord;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Group figure: amplitude panel stacked above the frequency map
// ---------------------------------------------------------------------------

/// Render the two group panels to a PDF document.
///
/// `groups` must already be in Hz / dB.
pub fn render_groups_pdf(groups: &[GroupRecord], config: &RenderConfig) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    {
        let backend = PdfBackend::with_buffer(&mut buf, config.groups.canvas_size());
        let root = backend.into_drawing_area();
        draw_groups(&root, groups, config).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }
    Ok(buf)
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Draw both panels onto `root`, which must be `style.canvas_size()` large.
pub fn draw_groups<DB>(
    root: &DrawingArea<DB, Shift>,
    groups: &[GroupRecord],
    config: &RenderConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let style = &config.groups;
    let top_height = (style.margin + style.panel_height()) as i32;
    let (top, rest) = root.split_vertically(top_height);
    let (_gap, bottom) = rest.split_vertically(style.gap() as i32);

    draw_amplitude_panel(&top, groups, config)?;
    draw_frequency_panel(&bottom, groups, config)?;
    Ok(())
}

/// Top panel: `freq → dB` with the shared frequency axis unlabelled.
fn draw_amplitude_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    groups: &[GroupRecord],
    config: &RenderConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let style = &config.groups;
    let font = (config.font_family.as_str(), config.font_size).into_font();
    let (x0, x1) = style.freq_range;
    let (y0, y1) = style.db_range;

    let mut chart = ChartBuilder::on(area)
        .margin_top(style.margin as i32)
        .margin_right(style.margin as i32)
        .set_label_area_size(LabelAreaPosition::Left, style.left_label_area as i32)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .y_desc("Amplitude (dB)")
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(font.clone())
        .axis_desc_style(font)
        .draw()?;

    draw_annotated_curve(
        &mut chart,
        style,
        config.stroke_width,
        groups.iter().map(|g| (g.natural_freq, g.magnitude)),
        groups,
        (y0, y1),
    )
}

/// Bottom panel: natural → measured frequency against the `x = y` reference.
fn draw_frequency_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    groups: &[GroupRecord],
    config: &RenderConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let style = &config.groups;
    let font = (config.font_family.as_str(), config.font_size).into_font();
    let (lo, hi) = style.freq_range;

    let mut chart = ChartBuilder::on(area)
        .margin_right(style.margin as i32)
        .set_label_area_size(LabelAreaPosition::Left, style.left_label_area as i32)
        .set_label_area_size(LabelAreaPosition::Bottom, style.bottom_label_area as i32)
        .build_cartesian_2d(lo..hi, lo..hi)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Frequency (hz)")
        .y_desc("Frequency (hz)")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(font.clone())
        .axis_desc_style(font)
        .draw()?;

    let naturals = groups
        .iter()
        .map(|g| g.natural_freq)
        .filter(|f| in_range(*f, style.freq_range));
    let (diag_lo, diag_hi) = naturals.fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), f| {
        (a.min(f), b.max(f))
    });
    let dot_style = rgb(style.curve_color).stroke_width(config.stroke_width);
    chart.draw_series(
        dotted_diagonal(diag_lo, diag_hi, style.dot_pattern)
            .into_iter()
            .map(|seg| PathElement::new(seg.to_vec(), dot_style)),
    )?;

    draw_annotated_curve(
        &mut chart,
        style,
        config.stroke_width,
        groups.iter().map(|g| (g.natural_freq, g.measured_freq)),
        groups,
        (lo, hi),
    )
}

/// Solid curve plus the per-row annotations shared by both panels: a vertical
/// line at each marked natural frequency and a point at each scatter-marked
/// row. Ends with the panel frame.
fn draw_annotated_curve<DB, I>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    style: &GroupsStyle,
    stroke_width: u32,
    curve: I,
    groups: &[GroupRecord],
    y_range: (f64, f64),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
    I: Iterator<Item = (f64, f64)> + Clone,
{
    let x_range = style.freq_range;
    let line_style = rgb(style.curve_color).stroke_width(stroke_width);
    chart.draw_series(
        visible_runs(curve.clone(), x_range, y_range)
            .into_iter()
            .map(|run| PathElement::new(run, line_style)),
    )?;

    let vline_style = rgb(style.vline_color).stroke_width(stroke_width);
    chart.draw_series(
        groups
            .iter()
            .filter(|g| g.has_vertical_marker && in_range(g.natural_freq, x_range))
            .map(|g| {
                PathElement::new(
                    vec![(g.natural_freq, y_range.0), (g.natural_freq, y_range.1)],
                    vline_style,
                )
            }),
    )?;

    let marker_style = rgb(style.marker_color).filled();
    chart.draw_series(
        groups
            .iter()
            .zip(curve)
            .filter(|(g, (x, y))| g.has_scatter_marker && in_range(*x, x_range) && in_range(*y, y_range))
            .map(|(_, point)| Circle::new(point, style.marker_radius as i32, marker_style)),
    )?;

    let frame = BLACK.stroke_width(stroke_width);
    chart.draw_series(std::iter::once(Rectangle::new(
        [(x_range.0, y_range.0), (x_range.1, y_range.1)],
        frame,
    )))?;
    Ok(())
}
