//! Renderer traits.
//!
//! Two layers: a [`RenderBackend`] owns the graphics API and executes draw
//! calls; a [`Renderer`] (sprite batch, shape renderer, or game-provided)
//! turns scene content into those draw calls. The [`RenderQueue`] runs the
//! renderers in order each frame.
//!
//! [`RenderQueue`]: super::render_queue::RenderQueue

use glam::{Mat4, Vec4};

use super::vertex::{ColoredVertex, TexturedVertex};
use crate::api::types::TextureId;
use crate::core::scene::SceneGraph;
use crate::systems::debug::FrameStats;

/// How the colored vertex path assembles triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Every three vertices form a triangle.
    Triangles,
    /// Each vertex after the first two forms a triangle with the previous two.
    TriangleStrip,
}

impl Primitive {
    /// Number of triangles `vertex_count` vertices produce.
    pub fn triangle_count(self, vertex_count: usize) -> usize {
        match self {
            Primitive::Triangles => vertex_count / 3,
            Primitive::TriangleStrip => vertex_count.saturating_sub(2),
        }
    }
}

/// Blend equation for textured draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `src * src_alpha + dst * (1 - src_alpha)`
    #[default]
    Alpha,
    /// `src + dst * (1 - src_alpha)`, for textures with premultiplied alpha.
    Premultiplied,
}

/// One indexed triangle-list draw of textured quads.
#[derive(Debug, Clone, Copy)]
pub struct TexturedBatch<'a> {
    /// `None` draws untextured (flat vertex colors).
    pub texture: Option<TextureId>,
    pub blend: BlendMode,
    pub vertices: &'a [TexturedVertex],
    pub indices: &'a [u16],
}

/// One non-indexed draw of colored vertices.
#[derive(Debug, Clone, Copy)]
pub struct ColoredBatch<'a> {
    pub primitive: Primitive,
    pub vertices: &'a [ColoredVertex],
}

/// Executes draw calls on a graphics API.
///
/// # Example Implementation
///
/// ```ignore
/// struct GlBackend { /* programs, buffers */ }
///
/// impl RenderBackend for GlBackend {
///     fn backend(&self) -> &'static str { "opengl" }
///
///     fn draw_textured(&mut self, matrix: &Mat4, batch: &TexturedBatch) {
///         // Upload matrix, bind texture, glDrawElements...
///     }
///
///     fn draw_colored(&mut self, matrix: &Mat4, batch: &ColoredBatch) {
///         // Upload matrix, glDrawArrays...
///     }
/// }
/// ```
pub trait RenderBackend {
    /// Backend identifier (e.g., "opengl", "metal", "headless").
    fn backend(&self) -> &'static str;

    /// Start a frame by clearing to `clear_color`.
    fn begin_frame(&mut self, _clear_color: Vec4) {}

    fn draw_textured(&mut self, matrix: &Mat4, batch: &TexturedBatch);

    fn draw_colored(&mut self, matrix: &Mat4, batch: &ColoredBatch);

    /// Present the frame.
    fn end_frame(&mut self) {}

    /// Handle a viewport resize, in pixels.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Passed to every renderer during the render pass.
pub struct RenderContext<'a> {
    /// Projection times modelview for the game world. A renderer may change
    /// it for its own draws; the queue restores it before the next renderer.
    pub matrix: Mat4,
    pub backend: &'a mut dyn RenderBackend,
    pub stats: &'a mut FrameStats,
}

impl<'a> RenderContext<'a> {
    pub fn new(matrix: Mat4, backend: &'a mut dyn RenderBackend, stats: &'a mut FrameStats) -> Self {
        Self { matrix, backend, stats }
    }

    /// Submit a textured batch and count it.
    pub fn draw_textured(&mut self, batch: &TexturedBatch) {
        self.backend.draw_textured(&self.matrix, batch);
        self.stats.draw_calls += 1;
        self.stats.triangle_count += (batch.indices.len() / 3) as u32;
    }

    /// Submit a colored batch and count it.
    pub fn draw_colored(&mut self, batch: &ColoredBatch) {
        self.backend.draw_colored(&self.matrix, batch);
        self.stats.draw_calls += 1;
        self.stats.triangle_count += batch.primitive.triangle_count(batch.vertices.len()) as u32;
    }
}

/// Something that can sit in the render queue.
pub trait Renderer {
    /// Move animations forward. Called once per frame before the tree walk.
    fn update(&mut self, _dt: f32, _scene: &mut SceneGraph) {}

    /// Issue draw calls. Called once per frame after world transforms are current.
    fn render(&mut self, scene: &mut SceneGraph, ctx: &mut RenderContext);
}
