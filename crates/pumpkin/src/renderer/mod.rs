pub mod camera;
pub mod headless;
pub mod render_queue;
pub mod shape_renderer;
pub mod sprite_batch;
pub mod traits;
pub mod vertex;

// Re-export key types for convenient access
pub use camera::Camera2D;
pub use headless::{DrawCall, RecordingBackend};
pub use render_queue::{RenderQueue, RendererId, SharedRenderer};
pub use shape_renderer::ShapeRenderer;
pub use sprite_batch::{SpriteBatch, DEFAULT_MAX_SPRITES, MAX_BATCH_SPRITES};
pub use traits::{
    BlendMode, ColoredBatch, Primitive, RenderBackend, RenderContext, Renderer, TexturedBatch,
};
pub use vertex::{ColoredVertex, TexturedQuad, TexturedVertex};
