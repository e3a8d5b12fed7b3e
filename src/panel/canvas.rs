//! Row-major pixel canvas for the LED matrix panel

use alloc::vec::Vec;

use super::shape::{Area, Point, Shape, ShapeKind, TextShape};
use crate::color::{BLACK, Rgb};

/// Renders text for the panel.
///
/// Font rendering lives outside this crate. The renderer reports every lit
/// pixel of `text` through `plot`; the canvas colors and clips them.
pub trait TextRenderer {
    fn draw_text(&mut self, text: &TextShape, plot: &mut dyn FnMut(i32, i32));
}

/// Text renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoText;

impl TextRenderer for NoText {
    fn draw_text(&mut self, _text: &TextShape, _plot: &mut dyn FnMut(i32, i32)) {}
}

/// Fixed-size `W` x `H` canvas
#[derive(Debug, Clone)]
pub struct Canvas<const W: usize, const H: usize> {
    rows: [[Rgb; W]; H],
}

impl<const W: usize, const H: usize> Default for Canvas<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> Canvas<W, H> {
    pub const fn new() -> Self {
        Self {
            rows: [[BLACK; W]; H],
        }
    }

    pub const fn width(&self) -> usize {
        W
    }

    pub const fn height(&self) -> usize {
        H
    }

    /// Whole canvas area
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn area(&self) -> Area {
        Area::new(0, 0, W as i32, H as i32)
    }

    pub fn clear(&mut self) {
        self.rows = [[BLACK; W]; H];
    }

    #[allow(clippy::cast_sign_loss)]
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        if !self.area().contains(x, y) {
            return None;
        }
        Some(self.rows[y as usize][x as usize])
    }

    /// Pixels in row-major order
    pub fn as_slice(&self) -> &[Rgb] {
        self.rows.as_flattened()
    }

    /// Set one pixel if it lies on the canvas and inside `clip`
    #[allow(clippy::cast_sign_loss)]
    pub fn plot(&mut self, x: i32, y: i32, color: Rgb, clip: Option<Area>) {
        if !self.area().contains(x, y) {
            return;
        }
        if clip.is_some_and(|clip| !clip.contains(x, y)) {
            return;
        }
        self.rows[y as usize][x as usize] = color;
    }

    /// Draw one shape
    pub fn draw(&mut self, shape: &Shape, text: &mut dyn TextRenderer) {
        let color = shape.color;
        let clip = shape.clip;
        match &shape.kind {
            ShapeKind::Fill => {
                let area = clip.unwrap_or(self.area());
                self.fill_area(area, color, None);
            }
            ShapeKind::Rect(area) => self.fill_area(*area, color, clip),
            ShapeKind::Line { from, to } => self.line(*from, *to, color, clip),
            ShapeKind::Polygon(points) => self.polygon(points, color, clip),
            ShapeKind::Text(shape) => {
                text.draw_text(shape, &mut |x, y| self.plot(x, y, color, clip));
            }
        }
    }

    /// Draw every shape of a visual in order
    pub fn draw_all<'s>(
        &mut self,
        shapes: impl IntoIterator<Item = &'s Shape>,
        text: &mut dyn TextRenderer,
    ) {
        for shape in shapes {
            self.draw(shape, text);
        }
    }

    /// Drawable part of the canvas under `clip`
    fn bounds(&self, clip: Option<Area>) -> Area {
        let area = self.area();
        clip.map_or(area, |clip| area.intersect(clip))
    }

    fn fill_area(&mut self, area: Area, color: Rgb, clip: Option<Area>) {
        let area = self.bounds(clip).intersect(area);
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.plot(x, y, color, None);
            }
        }
    }

    /// Bresenham line, both ends inclusive
    fn line(&mut self, from: Point, to: Point, color: Rgb, clip: Option<Area>) {
        let Some((from, to)) = clip_segment(from, to, self.bounds(clip)) else {
            return;
        };
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (from.x, from.y);
        loop {
            self.plot(x, y, color, clip);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Scanline fill with the even-odd rule, sampling pixel centers
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn polygon(&mut self, points: &[Point], color: Rgb, clip: Option<Area>) {
        let bounds = self.bounds(clip);
        if points.len() < 3 || bounds.is_empty() {
            return;
        }
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(bounds.y);
        let max_y = points
            .iter()
            .map(|p| p.y)
            .max()
            .unwrap_or(0)
            .min(bounds.bottom() - 1);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in min_y..=max_y {
            let center = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let (ay, by) = (a.y as f32, b.y as f32);
                if (ay <= center && center < by) || (by <= center && center < ay) {
                    let (ax, bx) = (a.x as f32, b.x as f32);
                    crossings.push(ax + (center - ay) / (by - ay) * (bx - ax));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (libm::ceilf(span[0] - 0.5) as i32).max(bounds.x);
                let end = (libm::floorf(span[1] - 0.5) as i32).min(bounds.right() - 1);
                for x in start..=end {
                    self.plot(x, y, color, None);
                }
            }
        }
    }
}

/// Clip a segment to `bounds` (Liang-Barsky), keeping in-bounds segments
/// untouched
#[allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::many_single_char_names
)]
fn clip_segment(from: Point, to: Point, bounds: Area) -> Option<(Point, Point)> {
    if bounds.is_empty() {
        return None;
    }
    if bounds.contains(from.x, from.y) && bounds.contains(to.x, to.y) {
        return Some((from, to));
    }
    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let (min_x, max_x) = (f64::from(bounds.x), f64::from(bounds.right() - 1));
    let (min_y, max_y) = (f64::from(bounds.y), f64::from(bounds.bottom() - 1));

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x0 - min_x),
        (dx, max_x - x0),
        (-dy, y0 - min_y),
        (dy, max_y - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| {
        Point::new(
            libm::round(x0 + t * dx) as i32,
            libm::round(y0 + t * dy) as i32,
        )
    };
    Some((at(t0), at(t1)))
}
