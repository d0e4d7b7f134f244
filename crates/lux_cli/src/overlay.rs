//! Debug overlay: draws the ray segments traced for one sample.

use std::sync::Mutex;

use lux_tracer::{Color, ImageBuffer, Point, SegmentSink};

/// Collects every traced segment.
#[derive(Debug, Default)]
pub struct SegmentRecorder {
    segments: Mutex<Vec<(Point, Point)>>,
}

impl SegmentRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_segments(self) -> Vec<(Point, Point)> {
        self.segments
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SegmentSink for SegmentRecorder {
    fn segment(&self, from: Point, to: Point) {
        let mut segments = self
            .segments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        segments.push((from, to));
    }
}

/// Clip the segment `a..b` to the rectangle `[0, w] x [0, h]` (Liang-Barsky).
fn clip_to_frame(a: Point, b: Point, w: f32, h: f32) -> Option<(Point, Point)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-d.x, a.x), (d.x, w - a.x), (-d.y, a.y), (d.y, h - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Saturate the red channel along the segment. Scene coordinates map to
/// pixels as in the renderer; the segment is clipped to the frame first.
pub fn draw_segment(image: &mut ImageBuffer, from: Point, to: Point) {
    if !from.is_finite() || !to.is_finite() {
        return;
    }

    let (w, h) = (image.width as f32, image.height as f32);
    let Some((from, to)) = clip_to_frame(from * Point::new(w, h), to * Point::new(w, h), w, h)
    else {
        return;
    };
    let mut x0 = from.x as i64;
    let mut y0 = from.y as i64;
    let x1 = to.x as i64;
    let y1 = to.y as i64;

    // Bresenham
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 && x0 < image.width as i64 && y0 < image.height as i64 {
            let (x, y) = (x0 as u32, y0 as u32);
            let c = image.get(x, y);
            image.set(x, y, Color::new(1.0, c.y, c.z));
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub fn draw_segments(image: &mut ImageBuffer, segments: &[(Point, Point)]) {
    for &(from, to) in segments {
        draw_segment(image, from, to);
    }
}
