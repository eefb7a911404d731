use glam::{Mat4, Vec2};

/// Orthographic camera for the 2D world.
///
/// World space is y-down: (0, 0) is the top-left corner of the game area
/// when the camera is centered on it. The modelview matrix is applied on
/// top of the projection and is meant for whole-screen effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center position in world space.
    pub center: Vec2,
    pub modelview: Mat4,
}

impl Camera2D {
    /// Camera showing a `width × height` world with its origin top-left.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new(width / 2.0, height / 2.0),
            modelview: Mat4::IDENTITY,
        }
    }

    /// Orthographic projection, y pointing down the screen.
    pub fn projection_matrix(&self) -> Mat4 {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let left = self.center.x - half.x;
        let right = self.center.x + half.x;
        let top = self.center.y - half.y;
        let bottom = self.center.y + half.y;
        Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0)
    }

    /// Projection times modelview; what renderers receive as their matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.modelview
    }

    /// Fit the whole game area into a new viewport. The visible area grows
    /// along the axis with spare room.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32, world_width: f32, world_height: f32) {
        let viewport = Vec2::new(viewport_width, viewport_height);
        let units_per_pixel = (Vec2::new(world_width, world_height) / viewport).max_element();
        self.width = viewport.x * units_per_pixel;
        self.height = viewport.y * units_per_pixel;
    }

    /// Move camera center to `target`.
    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
    }

    /// Check if a world-space point is visible in the viewport.
    pub fn is_visible(&self, point: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0;
        (point - self.center).abs().cmple(half).all()
    }

    /// Check if a (min x, min y, max x, max y) box overlaps the viewport.
    pub fn is_box_visible(&self, bounds: glam::Vec4) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let min = self.center - half;
        let max = self.center + half;
        bounds.z >= min.x && bounds.x <= max.x && bounds.w >= min.y && bounds.y <= max.y
    }
}
