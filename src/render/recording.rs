use super::{Path, Surface};
use crate::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize(u32, u32),
    Clear,
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Alpha(f32),
    FillRect { x: f32, y: f32, width: f32, height: f32, color: Color },
    FillCircle { cx: f32, cy: f32, radius: f32, color: Color },
    StrokeCircle { cx: f32, cy: f32, radius: f32, line_width: f32, color: Color },
    FillPath { polygons: usize, color: Color },
}

/// A surface that draws nothing and remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    depth: usize,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Current save/restore nesting.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of fill operations recorded.
    pub fn fills(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| {
                matches!(
                    op,
                    DrawOp::FillRect { .. } | DrawOp::FillCircle { .. } | DrawOp::FillPath { .. }
                )
            })
            .count()
    }

    /// Number of particles drawn; each draw is wrapped in exactly one save.
    pub fn particles_drawn(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Save)).count()
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear)).count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.push(DrawOp::Resize(width, height));
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.ops.push(DrawOp::Rotate(radians));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.ops.push(DrawOp::FillRect { x, y, width, height, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle { cx, cy, radius, color });
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color) {
        self.ops.push(DrawOp::StrokeCircle { cx, cy, radius, line_width, color });
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.ops.push(DrawOp::FillPath { polygons: path.flatten(1).len(), color });
    }
}
