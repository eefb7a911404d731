// extensions/transform.rs
//
// Transform propagation: one depth-first walk per frame turns each node's
// position/scale/angle into a world transform.
//
// Usage:
//   scene.get_mut(root).unwrap().set_position(Vec2::new(10.0, 0.0));
//   scene.visit(root, &mut stats);  // every descendant now sees the move

use glam::{Affine2, Vec2};

use crate::api::types::NodeId;
use crate::components::visual::Visual;
use crate::core::scene::SceneGraph;
use crate::systems::debug::FrameStats;

/// Local transform for a node: scale, then rotate clockwise by
/// `angle_degrees`, then translate.
pub fn local_transform(position: Vec2, scale: Vec2, angle_degrees: f32) -> Affine2 {
    let (s, c) = if angle_degrees == 0.0 {
        (0.0, 1.0)
    } else {
        angle_degrees.to_radians().sin_cos()
    };
    Affine2::from_cols(
        Vec2::new(c * scale.x, s * scale.x),
        Vec2::new(-s * scale.y, c * scale.y),
        position,
    )
}

impl SceneGraph {
    /// Recompute world transforms below `root`.
    ///
    /// A node is recomputed when its own transform changed or when any
    /// ancestor visited in this walk was recomputed; recomputed nodes mark
    /// their visual for redraw. If `root` has a parent, that parent's current
    /// world transform is used as the base.
    pub fn visit(&mut self, root: NodeId, stats: &mut FrameStats) {
        let base = self
            .parent(root)
            .and_then(|p| self.get(p))
            .map(|p| p.world_transform);
        self.visit_node(root, base, false, stats);
    }

    fn visit_node(
        &mut self,
        id: NodeId,
        parent_world: Option<Affine2>,
        parent_dirty: bool,
        stats: &mut FrameStats,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };

        let dirty = parent_dirty || node.local_transform_dirty;
        if dirty {
            if node.local_transform_dirty {
                node.local_transform = local_transform(node.position(), node.scale(), node.angle());
                node.local_transform_dirty = false;
            }
            node.world_transform = match parent_world {
                Some(parent) => parent * node.local_transform,
                None => node.local_transform,
            };
            if let Some(visual) = node.visual_mut() {
                visual.set_needs_redraw(true);
            }
        }
        stats.node_count += 1;

        let world = node.world_transform;
        let count = node.children.len();
        for i in 0..count {
            let Some(child) = self.get(id).and_then(|n| n.children.get(i).copied()) else {
                break;
            };
            self.visit_node(child, Some(world), dirty, stats);
        }
    }
}
