use glam::{Mat4, Vec2, Vec4};

/// Maps screen pixels (top-left origin, y down) to clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub width: f32,
    pub height: f32,
}

impl ScreenProjection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    /// Clip-space position of a screen point.
    pub fn to_clip(&self, point: Vec2) -> Vec2 {
        let clip = self.matrix() * Vec4::new(point.x, point.y, 0.0, 1.0);
        Vec2::new(clip.x, clip.y)
    }
}
