//! Drawing interface and per-shape particle rendering.
//!
//! The engine only ever talks to a [`Surface`], a small canvas-style API with
//! a save/restore transform stack. [`canvas::PixelCanvas`] rasterizes into a
//! pixel buffer for the terminal host, and [`recording::RecordingSurface`]
//! logs every call for headless tests.

pub mod canvas;
pub mod path;
pub mod recording;
pub mod terminal;

use crate::color::Color;
use crate::particle::{Particle, ShapeKind};
use std::f32::consts::PI;
use std::ops::{Deref, DerefMut};

pub use path::{Path, PathCommand};

pub trait Surface {
    fn size(&self) -> (u32, u32);
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);

    /// Push the current transform and alpha.
    fn save(&mut self);
    /// Pop back to the last [`save`](Surface::save). Unbalanced calls are ignored.
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn set_global_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);
    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color);
    fn fill_path(&mut self, path: &Path, color: Color);
}

/// Saves surface state on creation and restores it on drop, including while
/// unwinding out of a panicking draw.
pub struct Scoped<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> Scoped<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for Scoped<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for Scoped<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for Scoped<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

const STAR_POINTS: usize = 5;
const COIN_OUTLINE: f32 = 1.0;

/// Draw one particle centered on its position, rotated and faded by its life.
pub fn draw_particle<S: Surface + ?Sized>(surface: &mut S, particle: &Particle) {
    let mut s = Scoped::new(surface);
    s.translate(particle.x, particle.y);
    s.rotate(particle.rotation.to_radians());
    s.set_global_alpha(particle.opacity());

    let size = particle.size;
    let color = particle.color;
    match particle.shape {
        ShapeKind::Square => s.fill_rect(-size / 2.0, -size / 2.0, size, size, color),
        ShapeKind::Rectangle => s.fill_rect(-size / 2.0, -size / 4.0, size, size / 2.0, color),
        ShapeKind::Circle => s.fill_circle(0.0, 0.0, size / 2.0, color),
        ShapeKind::Star => s.fill_path(&star_path(size / 2.0, size / 4.0, STAR_POINTS), color),
        ShapeKind::Coin => {
            let radius = size / 2.0;
            s.fill_circle(0.0, 0.0, radius, color);
            s.stroke_circle(0.0, 0.0, radius, COIN_OUTLINE, color.darken(0.45));
            // glint
            s.fill_circle(-size * 0.15, -size * 0.15, size * 0.15, color.lighten(0.6));
        }
        ShapeKind::Heart => s.fill_path(&heart_path(size), color),
    }
}

/// Alternating outer/inner vertices, first point straight up.
pub fn star_path(outer: f32, inner: f32, points: usize) -> Path {
    let mut path = Path::new();
    let vertices = points * 2;
    for i in 0..vertices {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = i as f32 * PI / points as f32 - PI / 2.0;
        let (x, y) = (angle.cos() * radius, angle.sin() * radius);
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path.close();
    path
}

/// Two mirrored cubics meeting at the top notch and the bottom tip.
pub fn heart_path(size: f32) -> Path {
    let s = size;
    let mut path = Path::new();
    path.move_to(0.0, s * 0.35)
        .cubic_to((-s * 0.65, -s * 0.05), (-s * 0.3, -s * 0.6), (0.0, -s * 0.2))
        .cubic_to((s * 0.3, -s * 0.6), (s * 0.65, -s * 0.05), (0.0, s * 0.35))
        .close();
    path
}

#[cfg(test)]
mod tests {
    use super::recording::{DrawOp, RecordingSurface};
    use super::*;
    use crate::particle::create_particle;
    use crate::registry::{CelebrationType, Registry};

    fn particle(shape: ShapeKind) -> Particle {
        let registry = Registry::builtin();
        let mut rng = fastrand::Rng::with_seed(11);
        let mut p = create_particle(&mut rng, registry.profile(CelebrationType::Confetti), 200.0, 100.0, None, None);
        p.shape = shape;
        p
    }

    #[test]
    fn every_shape_is_scoped_and_faded() {
        for shape in [
            ShapeKind::Square,
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Star,
            ShapeKind::Coin,
            ShapeKind::Heart,
        ] {
            let mut surface = RecordingSurface::new(200, 100);
            let p = particle(shape);
            draw_particle(&mut surface, &p);

            let ops = surface.ops();
            assert_eq!(ops.first(), Some(&DrawOp::Save), "{shape:?}");
            assert_eq!(ops.last(), Some(&DrawOp::Restore), "{shape:?}");
            assert!(ops.contains(&DrawOp::Alpha(p.opacity())));
            assert_eq!(surface.depth(), 0);
            assert!(surface.fills() >= 1);
        }
    }

    #[test]
    fn rectangle_is_half_height() {
        let mut surface = RecordingSurface::new(200, 100);
        let p = particle(ShapeKind::Rectangle);
        draw_particle(&mut surface, &p);
        let rect = surface.ops().iter().find_map(|op| match op {
            DrawOp::FillRect { width, height, .. } => Some((*width, *height)),
            _ => None,
        });
        assert_eq!(rect, Some((p.size, p.size / 2.0)));
    }

    #[test]
    fn coin_has_body_outline_and_glint() {
        let mut surface = RecordingSurface::new(200, 100);
        draw_particle(&mut surface, &particle(ShapeKind::Coin));
        let circles = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillCircle { .. }))
            .count();
        let outlines = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeCircle { .. }))
            .count();
        assert_eq!((circles, outlines), (2, 1));
    }

    #[test]
    fn star_alternates_radii() {
        let path = star_path(8.0, 4.0, 5);
        let polygon = &path.flatten(1)[0];
        assert_eq!(polygon.len(), 10);
        for (i, (x, y)) in polygon.iter().enumerate() {
            let r = x.hypot(*y);
            let expected = if i % 2 == 0 { 8.0 } else { 4.0 };
            assert!((r - expected).abs() < 1e-4);
        }
        assert!((polygon[0].1 + 8.0).abs() < 1e-4);
    }

    #[test]
    fn heart_is_symmetric() {
        let polygon = &heart_path(10.0).flatten(12)[0];
        let min_x = polygon.iter().map(|p| p.0).fold(f32::MAX, f32::min);
        let max_x = polygon.iter().map(|p| p.0).fold(f32::MIN, f32::max);
        assert!((min_x + max_x).abs() < 1e-3);
    }

    struct Exploding(RecordingSurface);

    impl Surface for Exploding {
        fn size(&self) -> (u32, u32) {
            self.0.size()
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.0.resize(width, height)
        }
        fn clear(&mut self) {
            self.0.clear()
        }
        fn save(&mut self) {
            self.0.save()
        }
        fn restore(&mut self) {
            self.0.restore()
        }
        fn translate(&mut self, x: f32, y: f32) {
            self.0.translate(x, y)
        }
        fn rotate(&mut self, radians: f32) {
            self.0.rotate(radians)
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.0.set_global_alpha(alpha)
        }
        fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
            self.0.fill_rect(x, y, width, height, color)
        }
        fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
            self.0.fill_circle(cx, cy, radius, color)
        }
        fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color) {
            self.0.stroke_circle(cx, cy, radius, line_width, color)
        }
        fn fill_path(&mut self, _path: &Path, _color: Color) {
            panic!("path backend unavailable");
        }
    }

    #[test]
    fn transform_is_restored_when_a_draw_panics() {
        let mut surface = Exploding(RecordingSurface::new(200, 100));
        let p = particle(ShapeKind::Heart);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            draw_particle(&mut surface, &p);
        }));
        assert!(result.is_err());
        assert_eq!(surface.0.depth(), 0);
        assert_eq!(surface.0.ops().last(), Some(&DrawOp::Restore));
    }
}
