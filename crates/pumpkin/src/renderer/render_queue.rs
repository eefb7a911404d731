//! Ordered list of renderers run once per frame.
//! Earlier entries draw first and appear behind later ones.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glam::Mat4;
use log::warn;

use super::traits::{RenderBackend, RenderContext, Renderer};
use crate::core::scene::SceneGraph;
use crate::error::{EngineError, Result};
use crate::systems::debug::FrameStats;

/// Handle to a renderer in a [`RenderQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(pub u32);

/// Shared renderer. The game keeps a clone to add sprites to a batch while
/// the queue holds it.
pub type SharedRenderer = Rc<RefCell<dyn Renderer>>;

#[derive(Default)]
pub struct RenderQueue {
    queue: Vec<(RendererId, SharedRenderer)>,
    next_id: u32,
}

impl fmt::Debug for RenderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderQueue")
            .field("renderers", &self.queue.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .finish()
    }
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a renderer; it draws on top of everything already queued.
    pub fn add<R: Renderer + 'static>(&mut self, renderer: Rc<RefCell<R>>) -> RendererId {
        let renderer: SharedRenderer = renderer;
        let id = self.next_renderer_id();
        self.queue.push((id, renderer));
        id
    }

    /// Insert a renderer at `index` in draw order.
    pub fn insert<R: Renderer + 'static>(&mut self, renderer: Rc<RefCell<R>>, index: usize) -> Result<RendererId> {
        if index > self.queue.len() {
            return Err(EngineError::IndexOutOfBounds { index, len: self.queue.len() });
        }
        let renderer: SharedRenderer = renderer;
        let id = self.next_renderer_id();
        self.queue.insert(index, (id, renderer));
        Ok(id)
    }

    fn next_renderer_id(&mut self) -> RendererId {
        let id = RendererId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn remove(&mut self, id: RendererId) -> Result<()> {
        let index = self
            .queue
            .iter()
            .position(|(rid, _)| *rid == id)
            .ok_or(EngineError::RendererNotFound)?;
        self.queue.remove(index);
        Ok(())
    }

    pub fn remove_all_renderers(&mut self) {
        self.queue.clear();
    }

    /// Renderer ids in draw order.
    pub fn ids(&self) -> impl Iterator<Item = RendererId> + '_ {
        self.queue.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Give every renderer its per-frame update, in order.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        for (id, renderer) in &self.queue {
            match renderer.try_borrow_mut() {
                Ok(mut r) => r.update(dt, scene),
                Err(_) => warn!("Renderer {:?} is borrowed elsewhere, skipping update", id),
            }
        }
    }

    /// Draw every renderer in order. Each one starts from `matrix`.
    pub fn render(
        &mut self,
        scene: &mut SceneGraph,
        matrix: Mat4,
        backend: &mut dyn RenderBackend,
        stats: &mut FrameStats,
    ) {
        for (id, renderer) in &self.queue {
            let Ok(mut r) = renderer.try_borrow_mut() else {
                warn!("Renderer {:?} is borrowed elsewhere, skipping render", id);
                continue;
            };
            let mut ctx = RenderContext::new(matrix, &mut *backend, &mut *stats);
            r.render(scene, &mut ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::Node;
    use crate::components::shape::Shape;
    use crate::components::sprite::Sprite;
    use crate::renderer::headless::{DrawCall, RecordingBackend};
    use crate::renderer::shape_renderer::ShapeRenderer;
    use crate::renderer::sprite_batch::SpriteBatch;
    use glam::{Vec2, Vec4};

    /// Records the order it was called in.
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Renderer for Probe {
        fn update(&mut self, _dt: f32, _scene: &mut SceneGraph) {
            self.log.borrow_mut().push(format!("update {}", self.name));
        }

        fn render(&mut self, _scene: &mut SceneGraph, ctx: &mut RenderContext) {
            ctx.matrix = Mat4::ZERO;
            self.log.borrow_mut().push(format!("render {}", self.name));
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Rc<RefCell<Probe>> {
        Rc::new(RefCell::new(Probe { name, log: log.clone() }))
    }

    #[test]
    fn renderers_run_in_list_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = RenderQueue::new();
        let mut scene = SceneGraph::new();
        let mut backend = RecordingBackend::new();
        let mut stats = FrameStats::default();

        queue.add(probe("b", &log));
        queue.insert(probe("a", &log), 0).unwrap();
        queue.add(probe("c", &log));
        queue.update(0.016, &mut scene);
        queue.render(&mut scene, Mat4::IDENTITY, &mut backend, &mut stats);

        assert_eq!(
            *log.borrow(),
            vec!["update a", "update b", "update c", "render a", "render b", "render c"]
        );
    }

    #[test]
    fn remove_by_id() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = RenderQueue::new();
        let a = queue.add(probe("a", &log));
        let b = queue.add(probe("b", &log));
        queue.remove(a).unwrap();
        assert_eq!(queue.ids().collect::<Vec<_>>(), vec![b]);
        assert!(matches!(queue.remove(a), Err(EngineError::RendererNotFound)));
        assert!(queue.insert(probe("c", &log), 5).is_err());
        queue.remove_all_renderers();
        assert!(queue.is_empty());
    }

    #[test]
    fn batch_and_shape_draw_back_to_front() {
        let mut scene = SceneGraph::new();
        let backdrop = scene.spawn(Node::new().with_shape(Shape::rectangle(Vec2::splat(100.0))));
        let ball = scene.spawn(Node::new().with_sprite(Sprite::placeholder(Vec2::splat(8.0), Vec4::ONE)));
        scene.visit(backdrop, &mut FrameStats::default());
        scene.visit(ball, &mut FrameStats::default());

        let batch = Rc::new(RefCell::new(SpriteBatch::new()));
        batch.borrow_mut().add(ball).unwrap();

        let mut queue = RenderQueue::new();
        queue.add(Rc::new(RefCell::new(ShapeRenderer::new(backdrop))));
        queue.add(batch.clone());

        let mut backend = RecordingBackend::new();
        let mut stats = FrameStats::default();
        queue.render(&mut scene, Mat4::IDENTITY, &mut backend, &mut stats);

        assert_eq!(stats.draw_calls, 2);
        assert!(matches!(backend.calls[0], DrawCall::Colored { .. }));
        assert!(matches!(backend.calls[1], DrawCall::Textured { .. }));
        assert_eq!(batch.borrow().quad_count(), 1);
    }

    #[test]
    fn matrix_changes_do_not_leak_between_renderers() {
        struct Draw;
        impl Renderer for Draw {
            fn render(&mut self, _scene: &mut SceneGraph, ctx: &mut RenderContext) {
                ctx.draw_colored(&crate::renderer::traits::ColoredBatch {
                    primitive: crate::renderer::traits::Primitive::Triangles,
                    vertices: &[],
                });
            }
        }

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = RenderQueue::new();
        queue.add(probe("zeroes the matrix", &log));
        queue.add(Rc::new(RefCell::new(Draw)));

        let mut scene = SceneGraph::new();
        let mut backend = RecordingBackend::new();
        let mut stats = FrameStats::default();
        queue.render(&mut scene, Mat4::IDENTITY, &mut backend, &mut stats);
        match &backend.calls[0] {
            DrawCall::Colored { matrix, .. } => assert_eq!(*matrix, Mat4::IDENTITY),
            other => panic!("unexpected draw call {other:?}"),
        }
    }

    #[test]
    fn busy_renderer_is_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = RenderQueue::new();
        let p = probe("busy", &log);
        queue.add(p.clone());
        let _guard = p.borrow_mut();
        queue.update(0.1, &mut SceneGraph::new());
        assert!(log.borrow().is_empty());
    }
}
