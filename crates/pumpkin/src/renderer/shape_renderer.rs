//! Draws the shape attached to one node.

use super::traits::{ColoredBatch, RenderContext, Renderer};
use crate::api::types::NodeId;
use crate::components::visual::Visual;
use crate::core::scene::SceneGraph;

/// Renderer bound to a node carrying a [`Shape`](crate::components::shape::Shape).
/// Draws nothing once the node is gone or its visual is not a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRenderer {
    pub node: NodeId,
}

impl ShapeRenderer {
    pub fn new(node: NodeId) -> Self {
        Self { node }
    }
}

impl Renderer for ShapeRenderer {
    fn render(&mut self, scene: &mut SceneGraph, ctx: &mut RenderContext) {
        let Some(node) = scene.get_mut(self.node) else {
            return;
        };
        let world = node.world_transform();
        let Some(shape) = node.shape_mut() else {
            return;
        };

        let vertices = shape.world_vertices(&world);
        shape.set_needs_redraw(false);
        if vertices.is_empty() {
            return;
        }
        ctx.draw_colored(&ColoredBatch {
            primitive: shape.primitive(),
            vertices: &vertices,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::Node;
    use crate::components::shape::Shape;
    use crate::renderer::headless::{DrawCall, RecordingBackend};
    use crate::renderer::traits::Primitive;
    use crate::systems::debug::FrameStats;
    use glam::{Mat4, Vec2, Vec4};

    fn draw(renderer: &mut ShapeRenderer, scene: &mut SceneGraph) -> (RecordingBackend, FrameStats) {
        let mut backend = RecordingBackend::new();
        let mut stats = FrameStats::default();
        {
            let mut ctx = RenderContext::new(Mat4::IDENTITY, &mut backend, &mut stats);
            renderer.render(scene, &mut ctx);
        }
        (backend, stats)
    }

    #[test]
    fn draws_rectangle_in_world_space() {
        let mut scene = SceneGraph::new();
        let shape = Shape::rectangle(Vec2::new(4.0, 2.0)).with_color(Vec4::new(1.0, 0.0, 0.0, 1.0));
        let id = scene.spawn(Node::new().with_position(Vec2::new(10.0, 20.0)).with_shape(shape));
        scene.visit(id, &mut FrameStats::default());

        let mut renderer = ShapeRenderer::new(id);
        let (backend, stats) = draw(&mut renderer, &mut scene);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.triangle_count, 2);
        match &backend.calls[0] {
            DrawCall::Colored { primitive, vertices, .. } => {
                assert_eq!(*primitive, Primitive::TriangleStrip);
                assert_eq!(vertices[0].position, [8.0, 19.0]);
                assert_eq!(vertices[0].color, [255, 0, 0, 255]);
            }
            other => panic!("unexpected draw call {other:?}"),
        }
    }

    #[test]
    fn hidden_or_missing_shape_draws_nothing() {
        let mut scene = SceneGraph::new();
        let id = scene.spawn(Node::new().with_shape(Shape::rectangle(Vec2::ONE)));
        scene.get_mut(id).unwrap().shape_mut().unwrap().set_hidden(true);
        let mut renderer = ShapeRenderer::new(id);
        let (backend, _) = draw(&mut renderer, &mut scene);
        assert!(backend.calls.is_empty());

        scene.destroy(id);
        let (backend, stats) = draw(&mut renderer, &mut scene);
        assert!(backend.calls.is_empty());
        assert_eq!(stats.draw_calls, 0);
    }
}
