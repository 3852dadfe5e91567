use std::collections::BTreeSet;
use std::convert::Infallible;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontFamily, FontTransform,
};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_75;

/// Average glyph advance relative to the font size, used for text layout.
const GLYPH_ADVANCE: f64 = 0.5;
const ASCENT: f64 = 0.78;
const DESCENT: f64 = 0.22;

/// Base-14 fonts registered on every page, as (resource name, base font).
const FONTS: [(&[u8], &[u8]); 3] = [
    (b"F1", b"Times-Roman"),
    (b"F2", b"Helvetica"),
    (b"F3", b"Courier"),
];

const CATALOG_ID: i32 = 1;
const PAGE_TREE_ID: i32 = 2;
const PAGE_ID: i32 = 3;
const CONTENT_ID: i32 = 4;
/// Fonts follow the content stream, then one graphics state per opacity.
const FIRST_FONT_ID: i32 = 5;

type DrawResult = Result<(), DrawingErrorKind<Infallible>>;

/// A single-page vector PDF drawing backend.
///
/// One backend unit is one PDF point. Drawing accumulates a content stream;
/// [`DrawingBackend::present`] writes the whole document into the buffer the
/// backend was created with. Nothing fills the page, so the background stays
/// transparent.
pub struct PdfBackend<'a> {
    target: &'a mut Vec<u8>,
    size: (u32, u32),
    content: Content,
    /// Fill/stroke opacities in use, as thousandths.
    alphas: BTreeSet<u16>,
}

impl<'a> PdfBackend<'a> {
    pub fn with_buffer(target: &'a mut Vec<u8>, size: (u32, u32)) -> Self {
        Self {
            target,
            size,
            content: Content::new(),
            alphas: BTreeSet::new(),
        }
    }

    fn flip_y(&self, y: i32) -> f32 {
        self.size.1 as f32 - y as f32
    }

    /// Save the graphics state and apply the colour as both stroke and fill.
    fn begin(&mut self, color: BackendColor, line_width: u32) {
        let (r, g, b) = color.rgb;
        let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
        self.content
            .save_state()
            .set_line_width(line_width as f32)
            .set_stroke_rgb(r, g, b)
            .set_fill_rgb(r, g, b);
        if color.alpha < 1.0 {
            let key = (color.alpha.clamp(0.0, 1.0) * 1000.0).round() as u16;
            self.alphas.insert(key);
            let name = alpha_name(key);
            self.content.set_parameters(Name(name.as_bytes()));
        }
    }

    fn path_ops(&mut self, points: &[BackendCoord]) {
        for (i, &(x, y)) in points.iter().enumerate() {
            let fy = self.flip_y(y);
            if i == 0 {
                self.content.move_to(x as f32, fy);
            } else {
                self.content.line_to(x as f32, fy);
            }
        }
    }

    fn font_resource(family: FontFamily<'_>) -> &'static [u8] {
        match family {
            FontFamily::Serif => b"F1",
            FontFamily::SansSerif => b"F2",
            FontFamily::Monospace => b"F3",
            FontFamily::Name(name) => {
                let name = name.to_ascii_lowercase();
                if name.contains("mono") || name.contains("courier") {
                    b"F3"
                } else if name.contains("sans") || name.contains("helvetica") || name.contains("arial") {
                    b"F2"
                } else {
                    b"F1"
                }
            }
        }
    }

    /// Catalog, page tree, one page, its content stream, fonts and
    /// graphics states.
    fn write_document(&mut self) {
        let (w, h) = self.size;
        let content = std::mem::replace(&mut self.content, Content::new()).finish();
        let states: Vec<(String, u16, Ref)> = self
            .alphas
            .iter()
            .enumerate()
            .map(|(i, &a)| (alpha_name(a), a, Ref::new(FIRST_FONT_ID + (FONTS.len() + i) as i32)))
            .collect();

        let (catalog_id, tree_id, page_id, content_id) = (
            Ref::new(CATALOG_ID),
            Ref::new(PAGE_TREE_ID),
            Ref::new(PAGE_ID),
            Ref::new(CONTENT_ID),
        );

        let mut pdf = Pdf::new();
        pdf.set_version(1, 4);
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, w as f32, h as f32));
        page.parent(tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (i, &(name, _)) in FONTS.iter().enumerate() {
            fonts.pair(Name(name), Ref::new(FIRST_FONT_ID + i as i32));
        }
        fonts.finish();
        let mut ext_states = resources.ext_g_states();
        for (name, _, id) in &states {
            ext_states.pair(Name(name.as_bytes()), *id);
        }
        ext_states.finish();
        resources.finish();
        page.finish();

        pdf.stream(content_id, &content);
        for (i, &(_, base)) in FONTS.iter().enumerate() {
            pdf.type1_font(Ref::new(FIRST_FONT_ID + i as i32))
                .base_font(Name(base));
        }
        for (_, alpha, id) in &states {
            let a = *alpha as f32 / 1000.0;
            pdf.ext_graphics(*id).non_stroking_alpha(a).stroking_alpha(a);
        }

        *self.target = pdf.finish();
    }
}

fn alpha_name(key: u16) -> String {
    format!("A{key}")
}

/// Base-14 fonts only cover Latin text; anything outside printable ASCII
/// becomes `?`.
fn printable_text(text: &str) -> String {
    text.chars()
        .map(|ch| if (' '..='~').contains(&ch) { ch } else { '?' })
        .collect()
}

fn text_extent(text: &str, size: f64) -> (f64, f64) {
    (text.chars().count() as f64 * size * GLYPH_ADVANCE, size)
}

impl DrawingBackend for PdfBackend<'_> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> DrawResult {
        Ok(())
    }

    fn present(&mut self) -> DrawResult {
        self.write_document();
        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> DrawResult {
        self.draw_rect(point, (point.0 + 1, point.1 + 1), &color, true)
    }

    fn draw_line<S: BackendStyle>(&mut self, from: BackendCoord, to: BackendCoord, style: &S) -> DrawResult {
        self.draw_path([from, to], style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> DrawResult {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let (x0, y0) = upper_left;
        let (x1, y1) = bottom_right;
        let bottom = self.flip_y(y1.max(y0));

        self.begin(color, style.stroke_width());
        self.content.rect(
            x0.min(x1) as f32,
            bottom,
            (x1 - x0).abs() as f32,
            (y1 - y0).abs() as f32,
        );
        if fill {
            self.content.fill_nonzero();
        } else {
            self.content.stroke();
        }
        self.content.restore_state();
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(&mut self, path: I, style: &S) -> DrawResult {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() < 2 {
            return Ok(());
        }
        self.begin(color, style.stroke_width());
        self.path_ops(&points);
        self.content.stroke().restore_state();
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> DrawResult {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let cx = center.0 as f32;
        let cy = self.flip_y(center.1);
        let r = radius as f32;
        let k = r * KAPPA;

        self.begin(color, style.stroke_width());
        self.content
            .move_to(cx + r, cy)
            .cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r)
            .cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy)
            .cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r)
            .cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy)
            .close_path();
        if fill {
            self.content.fill_nonzero();
        } else {
            self.content.stroke();
        }
        self.content.restore_state();
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(&mut self, vert: I, style: &S) -> DrawResult {
        let color = style.color();
        if color.alpha == 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.begin(color, 1);
        self.path_ops(&points);
        self.content.close_path().fill_nonzero().restore_state();
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(&mut self, text: &str, style: &TStyle, pos: BackendCoord) -> DrawResult {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }
        let size = style.size();
        let (width, _) = text_extent(text, size);

        let along = match style.anchor().h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let across = match style.anchor().v_pos {
            VPos::Top => size * ASCENT,
            VPos::Center => size * (ASCENT - DESCENT) / 2.0,
            VPos::Bottom => -size * DESCENT,
        };

        // Reading direction `u` and "down" direction `d` in backend coordinates.
        let (u, d) = match style.transform() {
            FontTransform::None => ((1.0, 0.0), (0.0, 1.0)),
            FontTransform::Rotate90 => ((0.0, 1.0), (-1.0, 0.0)),
            FontTransform::Rotate180 => ((-1.0, 0.0), (0.0, -1.0)),
            FontTransform::Rotate270 => ((0.0, -1.0), (1.0, 0.0)),
        };
        let bx = pos.0 as f64 + u.0 * along + d.0 * across;
        let by = pos.1 as f64 + u.1 * along + d.1 * across;
        let matrix = [
            u.0 as f32,
            -u.1 as f32,
            -d.0 as f32,
            d.1 as f32,
            bx as f32,
            (self.size.1 as f64 - by) as f32,
        ];

        let font = Self::font_resource(style.family());
        let text = printable_text(text);
        self.begin(color, 1);
        self.content
            .begin_text()
            .set_font(Name(font), size as f32)
            .set_text_matrix(matrix)
            .show(Str(text.as_bytes()))
            .end_text()
            .restore_state();
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        let (w, h) = text_extent(text, style.size());
        Ok((w.ceil() as u32, h.ceil() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn black(alpha: f64) -> BackendColor {
        BackendColor {
            alpha,
            rgb: (0, 0, 0),
        }
    }

    fn render(size: (u32, u32), draw: impl FnOnce(&mut PdfBackend<'_>)) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut pdf = PdfBackend::with_buffer(&mut buf, size);
            draw(&mut pdf);
            pdf.present().unwrap();
        }
        buf
    }

    #[test]
    fn document_has_page_fonts_and_opacity_states() {
        let buf = render((100, 50), |pdf| {
            pdf.draw_line((0, 0), (100, 50), &black(1.0)).unwrap();
            pdf.draw_circle((50, 25), 3, &black(0.5), true).unwrap();
        });

        assert!(buf.starts_with(b"%PDF-1.4"));
        assert!(String::from_utf8_lossy(&buf).trim_end().ends_with("%%EOF"));
        assert!(find(&buf, b"/MediaBox [0 0 100 50]").is_some());
        assert!(find(&buf, b"/Times-Roman").is_some());
        assert!(find(&buf, b"/ExtGState").is_some());
        assert!(find(&buf, b"/A500").is_some());
        assert!(find(&buf, b"/A500 gs").is_some());

        let text = String::from_utf8_lossy(&buf);
        let startxref: usize = text
            .rsplit("startxref")
            .next()
            .and_then(|tail| tail.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap();
        assert!(text[startxref..].starts_with("xref"));
    }

    #[test]
    fn y_axis_is_flipped() {
        let buf = render((10, 40), |pdf| {
            pdf.draw_line((1, 0), (1, 40), &black(1.0)).unwrap();
        });
        assert!(find(&buf, b"1 40 m").is_some());
        assert!(find(&buf, b"1 0 l").is_some());
    }

    #[test]
    fn text_is_shown_in_a_base_font() {
        let style = ("Times New Roman", 11.0);
        let buf = render((200, 50), |pdf| {
            let font: plotters::style::TextStyle =
                plotters::style::IntoFont::into_font(style).into();
            pdf.draw_text("Amplitude (dB)", &font, (10, 10)).unwrap();
        });
        assert!(find(&buf, b"/F1 11 Tf").is_some());
        assert!(find(&buf, b"Amplitude").is_some());
        assert!(find(&buf, b"Tj").is_some());
    }

    #[test]
    fn non_ascii_text_is_replaced() {
        assert_eq!(printable_text("a\\b\u{00e9}"), "a\\b?");
        assert_eq!(printable_text("Frequency (hz)"), "Frequency (hz)");
    }

    #[test]
    fn transparent_shapes_are_skipped() {
        let buf = render((10, 10), |pdf| {
            pdf.draw_rect((0, 0), (10, 10), &black(0.0), true).unwrap();
        });
        assert!(find(&buf, b" re").is_none());
    }
}
