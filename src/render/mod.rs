//! Static rendering: plotters charts drawn onto a vector PDF backend or an
//! in-memory RGB bitmap, then handed back as encoded bytes.

pub mod groups;
pub mod pdf;
pub mod scatter;

use crate::error::PipelineError;

/// Closed interval test on a `(min, max)` range.
pub fn in_range(v: f64, (lo, hi): (f64, f64)) -> bool {
    v.is_finite() && v >= lo && v <= hi
}

/// Split a polyline into the runs that lie inside both ranges. Segments
/// crossing the boundary are clipped to it; a non-finite point breaks the
/// line.
pub fn visible_runs<I>(points: I, x_range: (f64, f64), y_range: (f64, f64)) -> Vec<Vec<(f64, f64)>>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    for p in points {
        if !(p.0.is_finite() && p.1.is_finite()) {
            flush(&mut runs, &mut current);
            prev = None;
            continue;
        }
        match prev {
            None => {
                if in_range(p.0, x_range) && in_range(p.1, y_range) {
                    current.push(p);
                }
            }
            Some(q) => match clip_segment(q, p, x_range, y_range) {
                Some((a, b)) => {
                    if current.last() != Some(&a) {
                        flush(&mut runs, &mut current);
                        current.push(a);
                    }
                    current.push(b);
                    if b != p {
                        flush(&mut runs, &mut current);
                    }
                }
                None => flush(&mut runs, &mut current),
            },
        }
        prev = Some(p);
    }
    flush(&mut runs, &mut current);
    runs
}

fn flush(runs: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
    if !current.is_empty() {
        runs.push(std::mem::take(current));
    }
}

/// Liang-Barsky clip of the segment `p0 -> p1` to the rectangle. Endpoints
/// already inside are returned unchanged.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, p0.0 - x_min),
        (dx, x_max - p0.0),
        (-dy, p0.1 - y_min),
        (dy, y_max - p0.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        if t <= 0.0 {
            p0
        } else if t >= 1.0 {
            p1
        } else {
            (p0.0 + t * dx, p0.1 + t * dy)
        }
    };
    Some((at(t0), at(t1)))
}

/// Short segments along the `x = y` diagonal from `lo` to `hi`, alternating
/// `dash` drawn and `gap` skipped (both measured along the x axis).
pub fn dotted_diagonal(lo: f64, hi: f64, (dash, gap): (f64, f64)) -> Vec<[(f64, f64); 2]> {
    let mut segments = Vec::new();
    if !(lo.is_finite() && hi.is_finite()) || hi <= lo || dash <= 0.0 || gap < 0.0 {
        return segments;
    }
    let mut start = lo;
    while start < hi {
        let end = (start + dash).min(hi);
        segments.push([(start, start), (end, end)]);
        start = end + gap;
    }
    segments
}

pub(crate) fn render_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Render(e.to_string())
}
