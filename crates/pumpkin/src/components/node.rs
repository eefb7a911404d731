use std::any::Any;
use std::fmt;

use glam::{Affine2, Vec2};

use crate::api::types::NodeId;
use crate::components::shape::Shape;
use crate::components::sprite::Sprite;
use crate::components::visual::VisualKind;
use crate::extensions::tweenable::{AngleTweenable, PositionTweenable, ScaleTweenable};
use crate::renderer::vertex::TexturedQuad;

/// Element of the scene graph: a local transform, tree links and an optional visual.
///
/// Nodes live inside a [`SceneGraph`](crate::core::scene::SceneGraph), which
/// owns the parent/child links. Setting position, scale or angle marks the
/// local transform dirty; the next `visit` rebuilds it.
pub struct Node {
    position: Vec2,
    scale: Vec2,
    /// Degrees, clockwise.
    angle: f32,
    pub(crate) local_transform: Affine2,
    pub(crate) world_transform: Affine2,
    pub(crate) local_transform_dirty: bool,

    /// Lookup key, not unique.
    pub name: String,
    /// Numeric lookup key, not unique.
    pub tag: i32,
    /// Opaque game data.
    pub user_data: Option<Box<dyn Any>>,

    visual: Option<VisualKind>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            angle: 0.0,
            local_transform: Affine2::IDENTITY,
            world_transform: Affine2::IDENTITY,
            local_transform_dirty: true,
            name: String::new(),
            tag: 0,
            user_data: None,
            visual: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("angle", &self.angle)
            .field("visual", &self.visual)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("user_data", &self.user_data.is_some())
            .finish()
    }
}

impl Node {
    /// Create a detached node at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.set_angle(angle);
        self
    }

    pub fn with_user_data(mut self, data: impl Any) -> Self {
        self.user_data = Some(Box::new(data));
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.visual = Some(VisualKind::Sprite(sprite));
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.visual = Some(VisualKind::Shape(shape));
        self
    }

    // -- Transform --

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.local_transform_dirty = true;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.local_transform_dirty = true;
    }

    /// Angle in degrees, clockwise.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.local_transform_dirty = true;
    }

    /// Local transform as of the last `visit`.
    pub fn local_transform(&self) -> Affine2 {
        self.local_transform
    }

    /// World transform as of the last `visit`.
    pub fn world_transform(&self) -> Affine2 {
        self.world_transform
    }

    pub fn is_local_transform_dirty(&self) -> bool {
        self.local_transform_dirty
    }

    /// Turn the node toward the heading of `velocity`, where 0 degrees points
    /// up. `rate` is the fraction of the remaining turn applied by this call,
    /// so the turn speed depends on how often this is called.
    pub fn rotate_to_velocity(&mut self, velocity: Vec2, rate: f32) {
        let target = velocity.y.atan2(velocity.x).to_degrees() + 90.0;
        let mut angle = self.angle;
        if target - angle > 180.0 {
            angle += 360.0;
        }
        if angle - target > 180.0 {
            angle -= 360.0;
        }
        self.set_angle(angle + (target - angle) * rate);
    }

    // -- Tree (read-only; mutate through SceneGraph) --

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    // -- Visual --

    pub fn visual(&self) -> Option<&VisualKind> {
        self.visual.as_ref()
    }

    pub fn visual_mut(&mut self) -> Option<&mut VisualKind> {
        self.visual.as_mut()
    }

    /// Attach a visual, returning the previous one.
    pub fn set_visual(&mut self, visual: impl Into<VisualKind>) -> Option<VisualKind> {
        self.visual.replace(visual.into())
    }

    pub fn take_visual(&mut self) -> Option<VisualKind> {
        self.visual.take()
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.visual.as_ref().and_then(VisualKind::as_sprite)
    }

    pub fn sprite_mut(&mut self) -> Option<&mut Sprite> {
        self.visual.as_mut().and_then(VisualKind::as_sprite_mut)
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.visual.as_ref().and_then(VisualKind::as_shape)
    }

    pub fn shape_mut(&mut self) -> Option<&mut Shape> {
        self.visual.as_mut().and_then(VisualKind::as_shape_mut)
    }

    /// Quad of the attached sprite under the current world transform.
    pub(crate) fn sprite_quad(&mut self) -> Option<TexturedQuad> {
        let world = self.world_transform;
        self.sprite_mut().map(|sprite| sprite.textured_quad(&world))
    }

    /// Downcast the user data.
    pub fn user_data_as<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref().and_then(|d| d.downcast_ref())
    }

    pub fn user_data_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut().and_then(|d| d.downcast_mut())
    }
}

impl PositionTweenable for Node {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        Node::set_position(self, position);
    }
}

impl ScaleTweenable for Node {
    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        Node::set_scale(self, scale);
    }
}

impl AngleTweenable for Node {
    fn angle(&self) -> f32 {
        self.angle
    }

    fn set_angle(&mut self, angle: f32) {
        Node::set_angle(self, angle);
    }
}
