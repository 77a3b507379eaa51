use crate::render::Surface;

/// Keeps the drawing surface the same size as its container.
///
/// Only the surface is resized. Particles already in flight keep their
/// absolute coordinates, so a shrink can leave them outside the new bounds
/// until they fall off or fade out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSizeManager {
    width: u32,
    height: u32,
}

impl SurfaceSizeManager {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> f32 {
        self.width as f32
    }

    pub fn height(&self) -> f32 {
        self.height as f32
    }

    /// Apply the container's size to a newly attached surface. While the
    /// container size is still unknown (0x0) the surface's size is adopted
    /// instead.
    pub fn mount<S: Surface + ?Sized>(&mut self, surface: Option<&mut S>) {
        let Some(surface) = surface else {
            return;
        };
        if self.size() == (0, 0) {
            (self.width, self.height) = surface.size();
        } else if surface.size() != self.size() {
            surface.resize(self.width, self.height);
        }
    }

    /// Record a container resize and forward it to the surface if there is
    /// one. Returns whether anything changed.
    pub fn sync<S: Surface + ?Sized>(&mut self, width: u32, height: u32, surface: Option<&mut S>) -> bool {
        let changed = (width, height) != (self.width, self.height);
        self.width = width;
        self.height = height;

        match surface {
            Some(surface) if surface.size() != (width, height) => {
                surface.resize(width, height);
                true
            }
            _ => changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{DrawOp, RecordingSurface};

    #[test]
    fn mount_pushes_container_size() {
        let mut surface = RecordingSurface::new(0, 0);
        let mut manager = SurfaceSizeManager::new(640, 480);
        manager.mount(Some(&mut surface));
        assert_eq!(surface.size(), (640, 480));
    }

    #[test]
    fn mount_adopts_surface_size_when_container_unknown() {
        let mut surface = RecordingSurface::new(800, 600);
        let mut manager = SurfaceSizeManager::default();
        manager.mount(Some(&mut surface));
        assert_eq!(manager.size(), (800, 600));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn resize_without_surface_is_a_no_op_for_drawing() {
        let mut manager = SurfaceSizeManager::new(640, 480);
        assert!(manager.sync::<RecordingSurface>(800, 600, None));
        assert_eq!(manager.size(), (800, 600));
    }

    #[test]
    fn unchanged_size_does_not_touch_surface() {
        let mut surface = RecordingSurface::new(640, 480);
        let mut manager = SurfaceSizeManager::new(640, 480);
        assert!(!manager.sync(640, 480, Some(&mut surface)));
        assert!(surface.ops().is_empty());

        assert!(manager.sync(320, 240, Some(&mut surface)));
        assert_eq!(surface.ops(), &[DrawOp::Resize(320, 240)]);
    }
}
