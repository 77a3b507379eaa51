//! Software rasterizer behind the terminal host.
//!
//! Logical coordinates (the space particles live in) are mapped onto a
//! smaller device pixel grid by `scale`, so a burst tuned for browser-sized
//! surfaces still reads well at terminal resolution.

use super::{Path, Surface};
use crate::color::Color;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    fn scale(s: f32) -> Self {
        Self { a: s, b: 0.0, c: 0.0, d: s, e: 0.0, f: 0.0 }
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += self.a * tx + self.c * ty;
        self.f += self.b * tx + self.d * ty;
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let Affine { a, b, c, d, .. } = *self;
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Uniform scale factor, used to pick curve tessellation.
    fn magnitude(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine,
    alpha: f32,
}

pub struct PixelCanvas {
    width: u32,
    height: u32,
    scale: f32,
    device_width: usize,
    device_height: usize,
    background: Color,
    pixels: Vec<Color>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl PixelCanvas {
    /// `scale` is device pixels per logical unit.
    pub fn new(width: u32, height: u32, scale: f32, background: Color) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let mut canvas = Self {
            width: 0,
            height: 0,
            scale,
            device_width: 0,
            device_height: 0,
            background,
            pixels: Vec::new(),
            state: DrawState { transform: Affine::scale(scale), alpha: 1.0 },
            stack: Vec::with_capacity(8),
        };
        canvas.resize(width, height);
        canvas
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn device_size(&self) -> (usize, usize) {
        (self.device_width, self.device_height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.device_width && y < self.device_height {
            Some(self.pixels[y * self.device_width + x])
        } else {
            None
        }
    }

    fn blend(&mut self, x: usize, y: usize, color: Color, alpha: f32) {
        let idx = y * self.device_width + x;
        self.pixels[idx] = self.pixels[idx].mix(color, alpha);
    }

    fn fill_polygons(&mut self, polygons: &[Vec<(f32, f32)>], color: Color) {
        let alpha = self.state.alpha;
        if alpha <= 0.0 || self.device_width == 0 || self.device_height == 0 {
            return;
        }

        let rings: Vec<Vec<(f32, f32)>> = polygons
            .iter()
            .filter(|ring| ring.len() > 2)
            .map(|ring| ring.iter().map(|&p| self.state.transform.apply(p)).collect())
            .collect();
        if rings.is_empty() {
            return;
        }

        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for &(_, y) in rings.iter().flatten() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if max_y < 0.0 || min_y >= self.device_height as f32 {
            return;
        }

        let row_start = min_y.max(0.0).floor() as usize;
        let row_end = (max_y.ceil().max(0.0) as usize).min(self.device_height);
        let mut crossings = Vec::with_capacity(8);
        let mut covered = 0usize;

        for row in row_start..row_end {
            let sy = row as f32 + 0.5;
            crossings.clear();
            for ring in &rings {
                for (i, &(x0, y0)) in ring.iter().enumerate() {
                    let (x1, y1) = ring[(i + 1) % ring.len()];
                    if (y0 <= sy && y1 > sy) || (y1 <= sy && y0 > sy) {
                        crossings.push(x0 + (sy - y0) / (y1 - y0) * (x1 - x0));
                    }
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).floor() + 1.0).max(0.0) as usize;
                for col in start..end.min(self.device_width) {
                    self.blend(col, row, color, alpha);
                    covered += 1;
                }
            }
        }

        // Shapes smaller than a device pixel can miss every pixel center;
        // splat them at their centroid, weighted by covered area.
        if covered == 0 {
            let outer = &rings[0];
            let n = outer.len() as f32;
            let cx = outer.iter().map(|p| p.0).sum::<f32>() / n;
            let cy = outer.iter().map(|p| p.1).sum::<f32>() / n;
            if cx >= 0.0 && cy >= 0.0 {
                let (x, y) = (cx as usize, cy as usize);
                if x < self.device_width && y < self.device_height {
                    let area = shoelace(outer).min(1.0);
                    self.blend(x, y, color, alpha * area);
                }
            }
        }
    }

    fn circle_points(&self, cx: f32, cy: f32, radius: f32) -> Vec<(f32, f32)> {
        let device_radius = radius * self.state.transform.magnitude();
        let segments = ((device_radius * 4.0) as usize).clamp(12, 48);
        (0..segments)
            .map(|i| {
                let t = i as f32 / segments as f32 * TAU;
                (cx + t.cos() * radius, cy + t.sin() * radius)
            })
            .collect()
    }
}

fn shoelace(points: &[(f32, f32)]) -> f32 {
    let mut sum = 0.0;
    for (i, &(x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % points.len()];
        sum += x0 * y1 - x1 * y0;
    }
    (sum / 2.0).abs()
}

impl Surface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.device_width = (width as f32 * self.scale).round() as usize;
        self.device_height = (height as f32 * self.scale).round() as usize;
        self.pixels = vec![self.background; self.device_width * self.device_height];
    }

    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform.translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform.rotate(radians);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let quad = vec![(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
        self.fill_polygons(&[quad], color);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let ring = self.circle_points(cx, cy, radius);
        self.fill_polygons(&[ring], color);
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color) {
        let half = line_width / 2.0;
        let outer = self.circle_points(cx, cy, radius + half);
        let inner = self.circle_points(cx, cy, (radius - half).max(0.0));
        self.fill_polygons(&[outer, inner], color);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let polygons = path.flatten(8);
        self.fill_polygons(&polygons, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::rgb(0, 0, 0);
    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn device_size_follows_scale() {
        let canvas = PixelCanvas::new(400, 200, 0.25, BG);
        assert_eq!(canvas.size(), (400, 200));
        assert_eq!(canvas.device_size(), (100, 50));
    }

    #[test]
    fn fill_rect_covers_expected_pixels() {
        let mut canvas = PixelCanvas::new(10, 10, 1.0, BG);
        canvas.fill_rect(2.0, 2.0, 3.0, 3.0, RED);
        assert_eq!(canvas.pixel(2, 2), Some(RED));
        assert_eq!(canvas.pixel(4, 4), Some(RED));
        assert_eq!(canvas.pixel(5, 5), Some(BG));
        assert_eq!(canvas.pixel(1, 2), Some(BG));
    }

    #[test]
    fn transform_is_scoped_by_save_restore() {
        let mut canvas = PixelCanvas::new(20, 20, 1.0, BG);
        canvas.save();
        canvas.translate(10.0, 10.0);
        canvas.set_global_alpha(0.5);
        canvas.restore();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, RED);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(10, 10), Some(BG));
    }

    #[test]
    fn rotation_by_quarter_turn() {
        let mut canvas = PixelCanvas::new(20, 20, 1.0, BG);
        canvas.translate(10.0, 10.0);
        canvas.rotate(std::f32::consts::FRAC_PI_2);
        // A bar along +x ends up along +y.
        canvas.fill_rect(0.0, -1.0, 6.0, 2.0, RED);
        assert_eq!(canvas.pixel(10, 14), Some(RED));
        assert_eq!(canvas.pixel(14, 10), Some(BG));
    }

    #[test]
    fn alpha_blends_with_background() {
        let mut canvas = PixelCanvas::new(4, 4, 1.0, BG);
        canvas.set_global_alpha(0.5);
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, RED);
        let px = canvas.pixel(1, 1).unwrap();
        assert!((120..=135).contains(&px.r));

        canvas.set_global_alpha(0.0);
        canvas.clear();
        canvas.fill_rect(0.0, 0.0, 4.0, 4.0, RED);
        assert_eq!(canvas.pixel(1, 1), Some(BG));
    }

    #[test]
    fn stroke_leaves_the_middle_empty() {
        let mut canvas = PixelCanvas::new(40, 40, 1.0, BG);
        canvas.stroke_circle(20.0, 20.0, 15.0, 2.0, RED);
        assert_eq!(canvas.pixel(20, 20), Some(BG));
        assert_eq!(canvas.pixel(35, 20), Some(RED));
    }

    #[test]
    fn tiny_shapes_still_leave_a_mark() {
        let mut canvas = PixelCanvas::new(100, 100, 0.1, BG);
        canvas.fill_circle(55.0, 55.0, 3.0, RED);
        assert_ne!(canvas.pixel(5, 5), Some(BG));
    }

    #[test]
    fn off_canvas_draws_are_ignored() {
        let mut canvas = PixelCanvas::new(10, 10, 1.0, BG);
        canvas.fill_rect(-50.0, -50.0, 5.0, 5.0, RED);
        canvas.fill_circle(500.0, 5.0, 3.0, RED);
        assert!((0..10).all(|y| (0..10).all(|x| canvas.pixel(x, y) == Some(BG))));
    }
}
