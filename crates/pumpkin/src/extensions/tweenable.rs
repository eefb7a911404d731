// extensions/tweenable.rs
//
// Narrow property contracts a tween target can satisfy. A tween only asks for
// the one capability it mutates, resolved through `TweenTargets` each frame.

use glam::{Vec2, Vec4};

use crate::api::types::NodeId;
use crate::core::scene::SceneGraph;

/// Something with a mutable 2D position.
pub trait PositionTweenable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

/// Something with a mutable 2D scale.
pub trait ScaleTweenable {
    fn scale(&self) -> Vec2;
    fn set_scale(&mut self, scale: Vec2);
}

/// Something with a mutable angle, in degrees clockwise.
pub trait AngleTweenable {
    fn angle(&self) -> f32;
    fn set_angle(&mut self, angle: f32);
}

/// Something with a mutable RGBA tint.
pub trait ColorTweenable {
    fn color(&self) -> Vec4;
    fn set_color(&mut self, color: Vec4);
}

/// Something with a mutable opacity.
pub trait AlphaTweenable {
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
}

bitflags::bitflags! {
    /// Set of tweenable properties a target exposes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const POSITION = 1 << 0;
        const SCALE    = 1 << 1;
        const ANGLE    = 1 << 2;
        const COLOR    = 1 << 3;
        const ALPHA    = 1 << 4;
    }
}

/// Resolves tween targets by handle.
///
/// Every lookup returns `None` once the target is gone, which is how tweens
/// notice that their target was destroyed.
pub trait TweenTargets {
    /// Capabilities of a live target, or `None` if it no longer exists.
    fn capabilities(&self, target: NodeId) -> Option<Capabilities>;

    fn position_target(&mut self, target: NodeId) -> Option<&mut dyn PositionTweenable>;
    fn scale_target(&mut self, target: NodeId) -> Option<&mut dyn ScaleTweenable>;
    fn angle_target(&mut self, target: NodeId) -> Option<&mut dyn AngleTweenable>;
    fn color_target(&mut self, target: NodeId) -> Option<&mut dyn ColorTweenable>;
    fn alpha_target(&mut self, target: NodeId) -> Option<&mut dyn AlphaTweenable>;

    /// Whether the target is still alive.
    fn is_alive(&self, target: NodeId) -> bool {
        self.capabilities(target).is_some()
    }
}

impl TweenTargets for SceneGraph {
    fn capabilities(&self, target: NodeId) -> Option<Capabilities> {
        let node = self.get(target)?;
        let mut caps = Capabilities::POSITION | Capabilities::SCALE | Capabilities::ANGLE;
        if node.visual().is_some() {
            caps |= Capabilities::COLOR | Capabilities::ALPHA;
        }
        Some(caps)
    }

    fn position_target(&mut self, target: NodeId) -> Option<&mut dyn PositionTweenable> {
        self.get_mut(target).map(|n| n as &mut dyn PositionTweenable)
    }

    fn scale_target(&mut self, target: NodeId) -> Option<&mut dyn ScaleTweenable> {
        self.get_mut(target).map(|n| n as &mut dyn ScaleTweenable)
    }

    fn angle_target(&mut self, target: NodeId) -> Option<&mut dyn AngleTweenable> {
        self.get_mut(target).map(|n| n as &mut dyn AngleTweenable)
    }

    fn color_target(&mut self, target: NodeId) -> Option<&mut dyn ColorTweenable> {
        self.get_mut(target)?
            .visual_mut()
            .map(|v| v as &mut dyn ColorTweenable)
    }

    fn alpha_target(&mut self, target: NodeId) -> Option<&mut dyn AlphaTweenable> {
        self.get_mut(target)?
            .visual_mut()
            .map(|v| v as &mut dyn AlphaTweenable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::Node;
    use crate::components::shape::Shape;

    #[test]
    fn capabilities_depend_on_visual() {
        let mut scene = SceneGraph::new();
        let bare = scene.spawn(Node::new());
        let shaped = scene.spawn(Node::new().with_shape(Shape::rectangle(Vec2::ONE)));

        let caps = scene.capabilities(bare).unwrap();
        assert!(caps.contains(Capabilities::POSITION | Capabilities::SCALE | Capabilities::ANGLE));
        assert!(!caps.intersects(Capabilities::COLOR | Capabilities::ALPHA));
        assert!(scene.color_target(bare).is_none());

        assert!(scene.capabilities(shaped).unwrap().contains(Capabilities::ALPHA));
        scene.alpha_target(shaped).unwrap().set_alpha(0.5);
        assert_eq!(scene.get(shaped).unwrap().shape().unwrap().alpha(), 0.5);
    }

    #[test]
    fn destroyed_targets_resolve_to_none() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn(Node::new());
        scene.destroy(id);
        assert!(!scene.is_alive(id));
        assert!(scene.position_target(id).is_none());
    }

    #[test]
    fn position_target_marks_node_dirty() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn(Node::new());
        scene.get_mut(id).unwrap().local_transform_dirty = false;
        let target = scene.position_target(id).unwrap();
        let p = target.position();
        target.set_position(p + Vec2::X);
        assert!(scene.get(id).unwrap().is_local_transform_dirty());
    }
}
