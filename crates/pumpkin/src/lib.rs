pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod extensions;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineConfig, EngineContext, Game};
pub use api::runner::GameRunner;
pub use api::types::{NodeId, TextureId};
pub use assets::{SpriteFrame, SpriteSheet, Texture};
pub use components::{Animation, Node, Shape, Sprite, Visual, VisualKind};
pub use crate::core::{GameClock, SceneGraph};
pub use error::{EngineError, Result};
pub use renderer::{
    Camera2D, ColoredVertex, Primitive, RecordingBackend, RenderBackend, RenderContext,
    RenderQueue, Renderer, ShapeRenderer, SpriteBatch, TexturedQuad, TexturedVertex,
};
pub use systems::debug::{DebugLayer, FrameStats};

// Extensions: tweening, timers, transform propagation
pub use extensions::{
    Easing, lerp, lerp_vec2, lerp_vec4, ease, ease_vec2,
    Tween, TweenAction, TweenId, TweenKind, TweenPool,
    Timer, TimerId, TimerPool, TimerRepeat,
    Capabilities, TweenTargets,
};
