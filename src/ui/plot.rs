use eframe::egui::{self, Ui};
use egui_plot::{Line, LineStyle, Plot, PlotPoints, Points, VLine};

use crate::color::rgb_to_color32;
use crate::config::GroupsStyle;
use crate::data::model::GroupRecord;
use crate::render::{in_range, visible_runs};

// ---------------------------------------------------------------------------
// Group panels (interactive redraw of groups.pdf)
// ---------------------------------------------------------------------------

/// Gap between the two panels, in UI points.
const PANEL_GAP: f32 = 8.0;

/// Draw the amplitude panel above the frequency map, x axes linked.
pub fn group_panels(ui: &mut Ui, groups: &[GroupRecord], style: &GroupsStyle) {
    let link = ui.id().with("groups_x_axis");
    let height = ((ui.available_height() - PANEL_GAP) / 2.0).max(80.0);
    let (lo, hi) = style.freq_range;
    let (db_lo, db_hi) = style.db_range;

    Plot::new("amplitude_panel")
        .link_axis(link, [true, false])
        .height(height)
        .show_axes([false, true])
        .include_x(lo)
        .include_x(hi)
        .include_y(db_lo)
        .include_y(db_hi)
        .y_axis_label("Amplitude (dB)")
        .show(ui, |plot_ui| {
            let curve = groups.iter().map(|g| (g.natural_freq, g.magnitude));
            for item in annotated_curve(curve, groups, style, style.db_range) {
                item.add_to(plot_ui, style);
            }
        });

    ui.add_space(PANEL_GAP);

    Plot::new("frequency_panel")
        .link_axis(link, [true, false])
        .height(height)
        .include_x(lo)
        .include_x(hi)
        .include_y(lo)
        .include_y(hi)
        .x_axis_label("Frequency (hz)")
        .y_axis_label("Frequency (hz)")
        .show(ui, |plot_ui| {
            let (d_lo, d_hi) = groups
                .iter()
                .map(|g| g.natural_freq)
                .filter(|f| in_range(*f, style.freq_range))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), f| (a.min(f), b.max(f)));
            if d_lo < d_hi {
                let diagonal: PlotPoints = vec![[d_lo, d_lo], [d_hi, d_hi]].into();
                plot_ui.line(
                    Line::new(diagonal)
                        .color(rgb_to_color32(style.curve_color))
                        .style(LineStyle::dotted_dense())
                        .name("x = y"),
                );
            }

            let curve = groups.iter().map(|g| (g.natural_freq, g.measured_freq));
            for item in annotated_curve(curve, groups, style, style.freq_range) {
                item.add_to(plot_ui, style);
            }
        });
}

/// Everything drawn on top of a panel, in drawing order.
enum PanelItem {
    Curve(Vec<[f64; 2]>),
    Marker(f64),
    Point([f64; 2]),
}

impl PanelItem {
    fn add_to(self, plot_ui: &mut egui_plot::PlotUi, style: &GroupsStyle) {
        match self {
            PanelItem::Curve(run) => {
                plot_ui.line(
                    Line::new(PlotPoints::from(run))
                        .color(rgb_to_color32(style.curve_color))
                        .width(1.0),
                );
            }
            PanelItem::Marker(x) => {
                plot_ui.vline(VLine::new(x).color(rgb_to_color32(style.vline_color)).width(1.0));
            }
            PanelItem::Point(p) => {
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![p]))
                        .radius(style.marker_radius as f32 + 1.0)
                        .color(rgb_to_color32(style.marker_color)),
                );
            }
        }
    }
}

/// Same rules as the PDF panels: curve runs clipped to the panel, a vertical
/// line per marked row and a point per scatter-marked row.
fn annotated_curve<I>(
    curve: I,
    groups: &[GroupRecord],
    style: &GroupsStyle,
    y_range: (f64, f64),
) -> Vec<PanelItem>
where
    I: Iterator<Item = (f64, f64)> + Clone,
{
    let mut items: Vec<PanelItem> = visible_runs(curve.clone(), style.freq_range, y_range)
        .into_iter()
        .map(|run| PanelItem::Curve(run.into_iter().map(|(x, y)| [x, y]).collect()))
        .collect();

    items.extend(
        groups
            .iter()
            .filter(|g| g.has_vertical_marker && in_range(g.natural_freq, style.freq_range))
            .map(|g| PanelItem::Marker(g.natural_freq)),
    );
    items.extend(
        groups
            .iter()
            .zip(curve)
            .filter(|(g, (x, y))| {
                g.has_scatter_marker && in_range(*x, style.freq_range) && in_range(*y, y_range)
            })
            .map(|(_, (x, y))| PanelItem::Point([x, y])),
    );
    items
}

// ---------------------------------------------------------------------------
// Rendered raster (scatter PNG)
// ---------------------------------------------------------------------------

/// Show an image previously registered with `Context::include_bytes`.
pub fn raster_image(ui: &mut Ui, uri: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.add(egui::Image::new(uri.to_string()).shrink_to_fit());
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotations_follow_row_flags() {
        let groups = vec![
            GroupRecord {
                natural_freq: 500.0,
                measured_freq: 505.0,
                magnitude: 0.0,
                has_vertical_marker: true,
                has_scatter_marker: false,
            },
            GroupRecord {
                natural_freq: 600.0,
                measured_freq: 590.0,
                magnitude: -10.0,
                has_vertical_marker: false,
                has_scatter_marker: true,
            },
        ];
        let style = GroupsStyle::default();
        let items = annotated_curve(
            groups.iter().map(|g| (g.natural_freq, g.magnitude)),
            &groups,
            &style,
            style.db_range,
        );

        let markers: Vec<f64> = items
            .iter()
            .filter_map(|i| match i {
                PanelItem::Marker(x) => Some(*x),
                _ => None,
            })
            .collect();
        let points: Vec<[f64; 2]> = items
            .iter()
            .filter_map(|i| match i {
                PanelItem::Point(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec![500.0]);
        assert_eq!(points, vec![[600.0, -10.0]]);
    }
}
