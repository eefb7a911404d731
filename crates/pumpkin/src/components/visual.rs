use glam::{Affine2, Vec2, Vec4};

use crate::components::shape::Shape;
use crate::components::sprite::Sprite;
use crate::extensions::tweenable::{AlphaTweenable, ColorTweenable};

/// The drawable part of a node.
///
/// A visual is owned by exactly one node and reads that node's world
/// transform when its geometry is rebuilt.
pub trait Visual {
    /// Whether the geometry changed since it was last built.
    fn needs_redraw(&self) -> bool;
    fn set_needs_redraw(&mut self, needs_redraw: bool);

    fn is_hidden(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);

    /// Normalized attachment point; (0.5, 0.5) is the center.
    fn anchor_point(&self) -> Vec2 {
        Vec2::splat(0.5)
    }

    fn flip_x(&self) -> bool {
        false
    }

    fn flip_y(&self) -> bool {
        false
    }

    fn content_size(&self) -> Vec2;

    /// Texture rectangle as (u1, v1, u2, v2).
    fn tex_coords(&self) -> Vec4 {
        Vec4::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Axis-aligned bounds under `world`, as (min x, min y, max x, max y).
    fn bounding_box(&self, world: &Affine2) -> Vec4;

    /// Per-frame housekeeping such as frame animations.
    fn update(&mut self, _dt: f32) {}
}

/// The visuals a node can carry.
#[derive(Debug, Clone)]
pub enum VisualKind {
    Sprite(Sprite),
    Shape(Shape),
}

impl VisualKind {
    fn as_visual(&self) -> &dyn Visual {
        match self {
            VisualKind::Sprite(s) => s,
            VisualKind::Shape(s) => s,
        }
    }

    fn as_visual_mut(&mut self) -> &mut dyn Visual {
        match self {
            VisualKind::Sprite(s) => s,
            VisualKind::Shape(s) => s,
        }
    }

    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            VisualKind::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match self {
            VisualKind::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            VisualKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_shape_mut(&mut self) -> Option<&mut Shape> {
        match self {
            VisualKind::Shape(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Sprite> for VisualKind {
    fn from(sprite: Sprite) -> Self {
        VisualKind::Sprite(sprite)
    }
}

impl From<Shape> for VisualKind {
    fn from(shape: Shape) -> Self {
        VisualKind::Shape(shape)
    }
}

impl Visual for VisualKind {
    fn needs_redraw(&self) -> bool {
        self.as_visual().needs_redraw()
    }

    fn set_needs_redraw(&mut self, needs_redraw: bool) {
        self.as_visual_mut().set_needs_redraw(needs_redraw);
    }

    fn is_hidden(&self) -> bool {
        self.as_visual().is_hidden()
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.as_visual_mut().set_hidden(hidden);
    }

    fn anchor_point(&self) -> Vec2 {
        self.as_visual().anchor_point()
    }

    fn flip_x(&self) -> bool {
        self.as_visual().flip_x()
    }

    fn flip_y(&self) -> bool {
        self.as_visual().flip_y()
    }

    fn content_size(&self) -> Vec2 {
        self.as_visual().content_size()
    }

    fn tex_coords(&self) -> Vec4 {
        self.as_visual().tex_coords()
    }

    fn bounding_box(&self, world: &Affine2) -> Vec4 {
        self.as_visual().bounding_box(world)
    }

    fn update(&mut self, dt: f32) {
        self.as_visual_mut().update(dt);
    }
}

impl ColorTweenable for VisualKind {
    fn color(&self) -> Vec4 {
        match self {
            VisualKind::Sprite(s) => s.color(),
            VisualKind::Shape(s) => s.color(),
        }
    }

    fn set_color(&mut self, color: Vec4) {
        match self {
            VisualKind::Sprite(s) => s.set_color(color),
            VisualKind::Shape(s) => s.set_color(color),
        }
    }
}

impl AlphaTweenable for VisualKind {
    fn alpha(&self) -> f32 {
        match self {
            VisualKind::Sprite(s) => s.alpha(),
            VisualKind::Shape(s) => s.alpha(),
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        match self {
            VisualKind::Sprite(s) => s.set_alpha(alpha),
            VisualKind::Shape(s) => s.set_alpha(alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegates_to_inner_visual() {
        let mut visual = VisualKind::from(Sprite::placeholder(Vec2::new(4.0, 2.0), Vec4::ONE));
        assert_eq!(visual.content_size(), Vec2::new(4.0, 2.0));
        visual.set_needs_redraw(false);
        visual.set_hidden(true);
        assert!(visual.is_hidden());
        assert!(visual.needs_redraw());
        assert!(visual.as_shape().is_none());
    }

    #[test]
    fn color_and_alpha_reach_shapes() {
        let mut visual = VisualKind::from(Shape::rectangle(Vec2::ONE));
        visual.set_alpha(0.25);
        visual.set_color(Vec4::new(0.0, 1.0, 0.0, 1.0));
        let shape = visual.as_shape().unwrap();
        assert_eq!(shape.alpha(), 0.25);
        assert_eq!(shape.color(), Vec4::new(0.0, 1.0, 0.0, 1.0));
    }
}
