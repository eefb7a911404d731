use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::api::types::NodeId;
use crate::assets::texture::Texture;
use crate::components::node::Node;
use crate::core::scene::SceneGraph;
use crate::core::time::GameClock;
use crate::error::{EngineError, Result};
use crate::extensions::timer::TimerPool;
use crate::extensions::tween_pool::TweenPool;
use crate::renderer::camera::Camera2D;
use crate::renderer::render_queue::RenderQueue;
use crate::renderer::sprite_batch::{SpriteBatch, MAX_BATCH_SPRITES};
use crate::systems::debug::DebugLayer;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of sprite batches created through the context (default: 500).
    pub max_sprites: usize,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Longest frame step in seconds; slower frames are clamped (default: 0.25).
    pub max_frame_dt: f32,
    /// Log the stats line every frame.
    pub debug_enabled: bool,
    /// RGBA the backend clears to each frame.
    pub clear_color: [f32; 4],
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_sprites: 500,
            world_width: 320.0,
            world_height: 480.0,
            max_frame_dt: 0.25,
            debug_enabled: false,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sprites == 0 || self.max_sprites > MAX_BATCH_SPRITES {
            return Err(EngineError::InvalidConfig(format!(
                "max_sprites must be in 1..={}, got {}",
                MAX_BATCH_SPRITES, self.max_sprites
            )));
        }
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if !(self.max_frame_dt > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "max_frame_dt must be positive, got {}",
                self.max_frame_dt
            )));
        }
        Ok(())
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn clear_color(&self) -> Vec4 {
        Vec4::from_array(self.clear_color)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Build the initial scene, batches and tweens.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Per-frame game logic. Runs after tweens and timers have advanced and
    /// before transforms are recomputed. Not called while the clock is paused.
    fn update(&mut self, ctx: &mut EngineContext, dt: f32);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
#[derive(Debug)]
pub struct EngineContext {
    pub scene: SceneGraph,
    /// Root of the displayed tree. Only nodes below it are visited.
    pub root: NodeId,
    pub tweens: TweenPool,
    pub timers: TimerPool,
    pub render_queue: RenderQueue,
    pub camera: Camera2D,
    pub clock: GameClock,
    pub debug: DebugLayer,
    /// Completion events from tweens and timers, collected this frame.
    pub events: Vec<u32>,
    config: EngineConfig,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut scene = SceneGraph::new();
        let root = scene.spawn(Node::new().with_name("root"));
        Ok(Self {
            scene,
            root,
            tweens: TweenPool::new(),
            timers: TimerPool::new(),
            render_queue: RenderQueue::new(),
            camera: Camera2D::new(config.world_width, config.world_height),
            clock: GameClock::new(config.max_frame_dt),
            debug: DebugLayer::new(config.debug_enabled),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spawn a node and attach it to the root.
    pub fn spawn(&mut self, node: Node) -> Result<NodeId> {
        self.spawn_under(self.root, node)
    }

    /// Spawn a node and attach it to `parent`.
    pub fn spawn_under(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        let id = self.scene.spawn(node);
        if let Err(e) = self.scene.add(parent, id) {
            self.scene.destroy(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Create a sprite batch sized from the config and append it to the
    /// render queue. The returned handle is shared with the queue.
    pub fn add_sprite_batch(&mut self, texture: Option<Texture>) -> Result<Rc<RefCell<SpriteBatch>>> {
        let mut batch = SpriteBatch::with_max_sprites(self.config.max_sprites)?;
        batch.texture = texture;
        let batch = Rc::new(RefCell::new(batch));
        self.render_queue.add(batch.clone());
        Ok(batch)
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}
