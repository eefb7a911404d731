use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Textured, colored vertex used for sprites.
/// 32 bytes stride: position at offset 0, tex coord at 8, RGBA8 color at 16.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
    pub color: [u8; 4],
    _pad: [u32; 3],
}

impl TexturedVertex {
    pub const STRIDE_BYTES: usize = 32;

    pub fn new(position: Vec2, tex_coord: Vec2, color: [u8; 4]) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
            color,
            _pad: [0; 3],
        }
    }
}

/// The four corners of a sprite.
/// Field order matches the batched index pattern (see [`quad_indices`]).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TexturedQuad {
    pub tl: TexturedVertex,
    pub tr: TexturedVertex,
    pub br: TexturedVertex,
    pub bl: TexturedVertex,
}

impl TexturedQuad {
    pub fn vertices(&self) -> [TexturedVertex; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// True for the all-zero quad emitted by hidden sprites.
    pub fn is_degenerate(&self) -> bool {
        self.vertices().iter().all(|v| v.position == [0.0, 0.0])
    }
}

/// Colored vertex used for shapes. 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 2],
    pub color: [u8; 4],
    _pad: u32,
}

impl ColoredVertex {
    pub const STRIDE_BYTES: usize = 16;

    pub fn new(position: Vec2, color: [u8; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
            _pad: 0,
        }
    }
}

/// Index buffer for `quad_count` quads laid out as tl, tr, br, bl.
/// Two counter-clockwise triangles per quad: (0, 2, 1) and (0, 3, 2).
pub fn quad_indices(quad_count: usize) -> Vec<u16> {
    let mut indices = Vec::with_capacity(quad_count * 6);
    for quad in 0..quad_count {
        let v = (quad * 4) as u16;
        indices.extend_from_slice(&[v, v + 2, v + 1, v, v + 3, v + 2]);
    }
    indices
}

/// Pack a float RGBA color into bytes.
/// The alpha channel is additionally multiplied by `alpha`.
pub fn pack_color(color: glam::Vec4, alpha: f32) -> [u8; 4] {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    [
        to_byte(color.x),
        to_byte(color.y),
        to_byte(color.z),
        to_byte(color.w * alpha),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn vertex_strides() {
        assert_eq!(std::mem::size_of::<TexturedVertex>(), TexturedVertex::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<ColoredVertex>(), ColoredVertex::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<TexturedQuad>(), 4 * TexturedVertex::STRIDE_BYTES);
    }

    #[test]
    fn indices_follow_quad_pattern() {
        let indices = quad_indices(2);
        assert_eq!(indices, vec![0, 2, 1, 0, 3, 2, 4, 6, 5, 4, 7, 6]);
    }

    #[test]
    fn pack_color_scales_alpha() {
        assert_eq!(pack_color(Vec4::ONE, 1.0), [255, 255, 255, 255]);
        assert_eq!(pack_color(Vec4::new(1.0, 0.0, 0.0, 1.0), 0.5), [255, 0, 0, 127]);
        // Overbright input is clamped instead of wrapping.
        assert_eq!(pack_color(Vec4::splat(2.0), 1.0), [255, 255, 255, 255]);
    }

    #[test]
    fn default_quad_is_degenerate() {
        assert!(TexturedQuad::default().is_degenerate());
    }
}
