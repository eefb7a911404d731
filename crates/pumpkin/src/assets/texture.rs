use glam::Vec2;

use crate::api::types::TextureId;

/// Texture metadata the engine needs for layout. Pixel data lives in the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    /// Backend handle.
    pub id: TextureId,
    /// Size in points (pixels divided by the content scale).
    pub content_size: Vec2,
    /// Whether the color channels are already multiplied by alpha.
    pub premultiplied_alpha: bool,
}

impl Texture {
    pub fn new(id: TextureId, content_size: Vec2) -> Self {
        Self {
            id,
            content_size,
            premultiplied_alpha: false,
        }
    }

    pub fn with_premultiplied_alpha(mut self, premultiplied: bool) -> Self {
        self.premultiplied_alpha = premultiplied;
        self
    }
}
