//! Backend that draws nothing and records what it was asked to draw.
//! Used by tests and for running the frame loop on a server.

use glam::{Mat4, Vec4};

use super::traits::{BlendMode, ColoredBatch, Primitive, RenderBackend, TexturedBatch};
use super::vertex::{ColoredVertex, TexturedVertex};
use crate::api::types::TextureId;

/// Copy of one submitted draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Textured {
        matrix: Mat4,
        texture: Option<TextureId>,
        blend: BlendMode,
        vertices: Vec<TexturedVertex>,
        indices: Vec<u16>,
    },
    Colored {
        matrix: Mat4,
        primitive: Primitive,
        vertices: Vec<ColoredVertex>,
    },
}

impl DrawCall {
    pub fn vertex_count(&self) -> usize {
        match self {
            DrawCall::Textured { vertices, .. } => vertices.len(),
            DrawCall::Colored { vertices, .. } => vertices.len(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Draw calls of the current frame, in submission order.
    pub calls: Vec<DrawCall>,
    pub clear_color: Vec4,
    pub frames: u32,
    pub viewport: (u32, u32),
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textured_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Textured { .. }))
    }

    pub fn colored_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Colored { .. }))
    }
}

impl RenderBackend for RecordingBackend {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn begin_frame(&mut self, clear_color: Vec4) {
        self.calls.clear();
        self.clear_color = clear_color;
    }

    fn draw_textured(&mut self, matrix: &Mat4, batch: &TexturedBatch) {
        self.calls.push(DrawCall::Textured {
            matrix: *matrix,
            texture: batch.texture,
            blend: batch.blend,
            vertices: batch.vertices.to_vec(),
            indices: batch.indices.to_vec(),
        });
    }

    fn draw_colored(&mut self, matrix: &Mat4, batch: &ColoredBatch) {
        self.calls.push(DrawCall::Colored {
            matrix: *matrix,
            primitive: batch.primitive,
            vertices: batch.vertices.to_vec(),
        });
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::traits::RenderContext;
    use crate::renderer::vertex::quad_indices;
    use crate::systems::debug::FrameStats;
    use glam::Vec2;

    #[test]
    fn context_counts_draws_and_triangles() {
        let mut backend = RecordingBackend::new();
        let mut stats = FrameStats::default();
        let vertices = [TexturedVertex::default(); 8];
        let indices = quad_indices(2);
        let colored = [ColoredVertex::new(Vec2::ZERO, [255; 4]); 4];
        {
            let mut ctx = RenderContext::new(Mat4::IDENTITY, &mut backend, &mut stats);
            ctx.draw_textured(&TexturedBatch {
                texture: Some(TextureId(3)),
                blend: BlendMode::Premultiplied,
                vertices: &vertices,
                indices: &indices,
            });
            ctx.draw_colored(&ColoredBatch {
                primitive: Primitive::TriangleStrip,
                vertices: &colored,
            });
        }
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.triangle_count, 6);
        assert_eq!(backend.textured_calls().count(), 1);
        assert_eq!(backend.colored_calls().next().map(DrawCall::vertex_count), Some(4));
    }

    #[test]
    fn begin_frame_clears_previous_calls() {
        let mut backend = RecordingBackend::new();
        backend.draw_colored(&Mat4::IDENTITY, &ColoredBatch { primitive: Primitive::Triangles, vertices: &[] });
        backend.begin_frame(Vec4::new(0.1, 0.2, 0.3, 1.0));
        assert!(backend.calls.is_empty());
        assert_eq!(backend.clear_color.x, 0.1);
        backend.end_frame();
        assert_eq!(backend.frames, 1);
    }
}
