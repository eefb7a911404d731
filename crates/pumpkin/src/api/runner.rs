//! Frame driver. The host calls [`GameRunner::frame`] once per display
//! refresh with the seconds elapsed since the previous one.

use log::info;

use crate::api::game::{EngineContext, Game};
use crate::error::Result;
use crate::renderer::traits::RenderBackend;
use crate::systems::debug::FrameStats;

/// Owns a game and its engine state and runs the per-frame pipeline:
/// clock, tweens, timers, game logic, renderer updates, one transform walk,
/// then the render queue.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    stats: FrameStats,
}

impl<G: Game> GameRunner<G> {
    /// Build the context from the game's config and run its init.
    pub fn new(mut game: G) -> Result<Self> {
        let config = game.config();
        let mut ctx = EngineContext::new(config)?;
        game.init(&mut ctx)?;
        info!(
            "Engine initialized: world {}x{}, {} nodes, {} renderers",
            ctx.config().world_width,
            ctx.config().world_height,
            ctx.scene.len(),
            ctx.render_queue.len()
        );
        Ok(Self {
            game,
            ctx,
            stats: FrameStats::default(),
        })
    }

    /// Run one frame. `elapsed` is wall-clock seconds since the last call.
    pub fn frame(&mut self, elapsed: f32, backend: &mut dyn RenderBackend) {
        let ctx = &mut self.ctx;
        ctx.debug.begin_frame(elapsed, &mut self.stats);
        ctx.clear_frame_data();

        if let Some(dt) = ctx.clock.advance(elapsed) {
            ctx.tweens.update_tweens(dt, &mut ctx.scene);
            ctx.timers.update_timers(dt);
            ctx.events.extend(ctx.tweens.drain_completed());
            ctx.events.extend(ctx.timers.drain_fired());

            self.game.update(ctx, dt);
            ctx.render_queue.update(dt, &mut ctx.scene);
        }

        ctx.scene.visit(ctx.root, &mut self.stats);

        backend.begin_frame(ctx.config().clear_color());
        let matrix = ctx.camera.view_projection();
        ctx.render_queue.render(&mut ctx.scene, matrix, backend, &mut self.stats);
        backend.end_frame();

        ctx.debug.end_frame(&self.stats);
    }

    /// Fit the world into a new viewport.
    pub fn resize(&mut self, width: u32, height: u32, backend: &mut dyn RenderBackend) {
        let world = self.ctx.config().world_size();
        self.ctx.camera.resize(width as f32, height as f32, world.x, world.y);
        backend.resize(width, height);
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    /// Counters of the last frame.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::NodeId;
    use crate::components::node::Node;
    use crate::renderer::headless::RecordingBackend;
    use glam::Vec2;

    #[derive(Default)]
    struct Mover {
        node: Option<NodeId>,
        updates: u32,
    }

    impl Game for Mover {
        fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
            let node = ctx.spawn(Node::new())?;
            let tween = ctx
                .tweens
                .move_to_tween(Vec2::new(10.0, 0.0), 0.1)
                .with_target(node)
                .with_completion_event(1);
            ctx.tweens.add(tween, &ctx.scene)?;
            ctx.timers.after_delay_event(0.05, 2);
            self.node = Some(node);
            Ok(())
        }

        fn update(&mut self, _ctx: &mut EngineContext, _dt: f32) {
            self.updates += 1;
        }
    }

    #[test]
    fn frames_advance_tweens_and_collect_events() {
        let mut runner = GameRunner::new(Mover::default()).unwrap();
        let mut backend = RecordingBackend::new();
        let mut events = Vec::new();
        for _ in 0..12 {
            runner.frame(1.0 / 60.0, &mut backend);
            events.extend(runner.context().events.iter().copied());
        }
        events.sort_unstable();
        assert_eq!(events, vec![1, 2]);
        assert_eq!(runner.game().updates, 12);

        let node = runner.game().node.unwrap();
        let world = runner.context().scene.get(node).unwrap().world_transform();
        assert!((world.translation - Vec2::new(10.0, 0.0)).length() < 1e-4);
        assert_eq!(runner.stats().node_count, 2);
        assert_eq!(backend.frames, 12);
    }

    #[test]
    fn paused_clock_freezes_the_game() {
        let mut runner = GameRunner::new(Mover::default()).unwrap();
        let mut backend = RecordingBackend::new();
        runner.context_mut().clock.pause();
        runner.frame(0.5, &mut backend);
        assert_eq!(runner.game().updates, 0);
        assert_eq!(runner.context().tweens.len(), 1);
        // Still rendered.
        assert_eq!(backend.frames, 1);
    }

    #[test]
    fn resize_reaches_camera_and_backend() {
        let mut runner = GameRunner::new(Mover::default()).unwrap();
        let mut backend = RecordingBackend::new();
        runner.resize(640, 960, &mut backend);
        assert_eq!(backend.viewport, (640, 960));
        assert!((runner.context().camera.width - 320.0).abs() < 1e-4);
    }
}
