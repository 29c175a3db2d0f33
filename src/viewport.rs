use glam::{Mat4, Vec2};

use crate::scene::Rect;

/// Fits the scene bounds into the window, centered, preserving aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
    visible: Rect,
    scale: f32,
}

impl Viewport {
    pub fn new(bounds: Rect, width: u32, height: u32) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        let size = bounds.size().max(Vec2::ONE);
        let scale = (width / size.x).min(height / size.y);
        let visible = Rect::around(bounds.center(), Vec2::new(width, height) / scale);
        Self {
            width,
            height,
            visible,
            scale,
        }
    }

    /// Physical pixels per scene unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn to_scene(&self, pixel: Vec2) -> Vec2 {
        self.visible.min + pixel / self.scale
    }

    pub fn to_window(&self, point: Vec2) -> Vec2 {
        (point - self.visible.min) * self.scale
    }

    /// Scene coordinates (y down) to clip space.
    pub fn projection(&self) -> Mat4 {
        let Rect { min, max } = self.visible;
        Mat4::orthographic_rh(min.x, max.x, max.y, min.y, -1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn exact_fit_maps_corners() {
        let viewport = Viewport::new(bounds(), 1600, 1200);
        assert_eq!(viewport.scale(), 2.0);
        assert_eq!(viewport.to_scene(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(viewport.to_scene(Vec2::new(1600.0, 1200.0)), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn wide_window_letterboxes_horizontally() {
        let viewport = Viewport::new(bounds(), 1000, 300);
        assert_eq!(viewport.scale(), 0.5);
        assert_eq!(viewport.to_scene(Vec2::new(500.0, 150.0)), Vec2::new(400.0, 300.0));
        assert_eq!(viewport.to_scene(Vec2::ZERO), Vec2::new(-600.0, 0.0));
        let back = viewport.to_window(Vec2::new(123.0, 456.0));
        assert!((viewport.to_scene(back) - Vec2::new(123.0, 456.0)).length() < 1e-3);
    }

    #[test]
    fn projection_maps_visible_corners_to_clip_space() {
        let viewport = Viewport::new(bounds(), 800, 600);
        let projection = viewport.projection();
        let top_left = projection.project_point3(Vec2::ZERO.extend(0.0));
        let bottom_right = projection.project_point3(Vec2::new(800.0, 600.0).extend(0.0));
        assert!((top_left.truncate() - Vec2::new(-1.0, 1.0)).length() < 1e-5);
        assert!((bottom_right.truncate() - Vec2::new(1.0, -1.0)).length() < 1e-5);
    }
}
