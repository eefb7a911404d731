//! Draws many sprites that share one texture in a single call.
//!
//! The batch keeps an ordered list of sprite node handles and a fixed buffer
//! of quads. Only sprites that changed since the last frame get their quad
//! rebuilt, unless the list itself changed, in which case every quad is.

use log::{debug, warn};

use super::traits::{BlendMode, RenderContext, Renderer, TexturedBatch};
use super::vertex::{quad_indices, TexturedQuad, TexturedVertex};
use crate::api::types::NodeId;
use crate::assets::texture::Texture;
use crate::core::scene::SceneGraph;
use crate::error::{EngineError, Result};

/// Default capacity of a batch.
pub const DEFAULT_MAX_SPRITES: usize = 500;

/// Largest capacity whose quad indices fit in `u16`.
pub const MAX_BATCH_SPRITES: usize = (u16::MAX as usize + 1) / 4;

/// Renderer for sprites with a common texture (or none, for placeholders).
///
/// List order is draw order. Call
/// [`sort_sprites_by_draw_order`](Self::sort_sprites_by_draw_order) after
/// changing any sprite's `draw_order`; the batch never re-sorts on its own.
#[derive(Debug)]
pub struct SpriteBatch {
    /// Texture bound for the draw. `None` draws flat vertex colors.
    pub texture: Option<Texture>,
    sprites: Vec<NodeId>,
    max_sprites: usize,
    quads: Vec<TexturedQuad>,
    indices: Vec<u16>,
    quad_count: usize,
    force_update: bool,
    overflowing: bool,
}

impl Default for SpriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteBatch {
    /// Batch with room for [`DEFAULT_MAX_SPRITES`] sprites.
    pub fn new() -> Self {
        Self::with_capacity_unchecked(DEFAULT_MAX_SPRITES)
    }

    /// Batch with room for `max_sprites` sprites.
    pub fn with_max_sprites(max_sprites: usize) -> Result<Self> {
        if max_sprites == 0 {
            return Err(EngineError::InvalidConfig("sprite batch capacity must be positive".into()));
        }
        if max_sprites > MAX_BATCH_SPRITES {
            return Err(EngineError::CapacityTooLarge(max_sprites));
        }
        Ok(Self::with_capacity_unchecked(max_sprites))
    }

    fn with_capacity_unchecked(max_sprites: usize) -> Self {
        Self {
            texture: None,
            sprites: Vec::new(),
            max_sprites,
            quads: vec![TexturedQuad::default(); max_sprites],
            indices: quad_indices(max_sprites),
            quad_count: 0,
            force_update: false,
            overflowing: false,
        }
    }

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    // -- Sprite list --

    /// Append a sprite node. It draws on top of the sprites already added.
    pub fn add(&mut self, sprite: NodeId) -> Result<()> {
        self.insert(sprite, self.sprites.len())
    }

    pub fn insert(&mut self, sprite: NodeId, index: usize) -> Result<()> {
        if self.sprites.contains(&sprite) {
            return Err(EngineError::DuplicateSprite(sprite));
        }
        if index > self.sprites.len() {
            return Err(EngineError::IndexOutOfBounds { index, len: self.sprites.len() });
        }
        self.sprites.insert(index, sprite);
        self.force_update = true;
        Ok(())
    }

    pub fn remove(&mut self, sprite: NodeId) -> Result<()> {
        let index = self
            .sprites
            .iter()
            .position(|s| *s == sprite)
            .ok_or(EngineError::SpriteNotFound(sprite))?;
        self.sprites.remove(index);
        self.force_update = true;
        Ok(())
    }

    pub fn remove_all_sprites(&mut self) {
        self.sprites.clear();
        self.force_update = true;
    }

    pub fn contains(&self, sprite: NodeId) -> bool {
        self.sprites.contains(&sprite)
    }

    /// Sprite handles in draw order.
    pub fn sprites(&self) -> &[NodeId] {
        &self.sprites
    }

    /// Stable sort by each sprite's `draw_order`, ascending. Handles that no
    /// longer resolve to a sprite go last.
    pub fn sort_sprites_by_draw_order(&mut self, scene: &SceneGraph) {
        self.sprites.sort_by_key(|&id| {
            scene
                .get(id)
                .and_then(|node| node.sprite())
                .map_or(i32::MAX, |sprite| sprite.draw_order)
        });
        self.force_update = true;
    }

    pub fn max_sprites(&self) -> usize {
        self.max_sprites
    }

    /// Quads submitted by the last render.
    pub fn quad_count(&self) -> usize {
        self.quad_count
    }

    /// Quads of the last render, in draw order.
    pub fn quads(&self) -> &[TexturedQuad] {
        &self.quads[..self.quad_count]
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    // -- Rendering --

    /// Drop handles whose node is gone or no longer carries a sprite.
    fn prune(&mut self, scene: &SceneGraph) {
        let before = self.sprites.len();
        self.sprites.retain(|&id| scene.get(id).is_some_and(|n| n.sprite().is_some()));
        let pruned = before - self.sprites.len();
        if pruned > 0 {
            debug!("SpriteBatch: dropped {} stale sprite handle(s)", pruned);
            self.force_update = true;
        }
    }

    /// Refresh the quads of dirty sprites, up to capacity. After a list
    /// change every slot is rewritten, since sprites may have moved slots.
    /// Returns how many sprites did not fit.
    fn update_quads(&mut self, scene: &mut SceneGraph, rewritten: &mut u32) -> usize {
        self.quad_count = 0;
        for &id in &self.sprites {
            if self.quad_count == self.max_sprites {
                break;
            }
            let Some(node) = scene.get_mut(id) else {
                continue;
            };
            let dirty = node.sprite().is_some_and(|s| s.needs_redraw());
            if self.force_update || dirty {
                *rewritten += 1;
                // Rebuilds the sprite's quad only if it is dirty.
                if let Some(quad) = node.sprite_quad() {
                    self.quads[self.quad_count] = quad;
                }
            }
            self.quad_count += 1;
        }
        self.force_update = false;
        self.sprites.len() - self.quad_count
    }

    fn blend_mode(&self) -> BlendMode {
        match self.texture {
            Some(t) if t.premultiplied_alpha => BlendMode::Premultiplied,
            _ => BlendMode::Alpha,
        }
    }
}

impl Renderer for SpriteBatch {
    fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        for &id in &self.sprites {
            if let Some(sprite) = scene.get_mut(id).and_then(|n| n.sprite_mut()) {
                sprite.update(dt);
            }
        }
    }

    fn render(&mut self, scene: &mut SceneGraph, ctx: &mut RenderContext) {
        self.prune(scene);
        let dropped = self.update_quads(scene, &mut ctx.stats.dirty_count);

        if dropped > 0 {
            ctx.stats.dropped_sprites += dropped as u32;
            if !self.overflowing {
                warn!(
                    "SpriteBatch over capacity: {} sprites, drawing the first {}",
                    self.sprites.len(),
                    self.max_sprites
                );
            }
        }
        self.overflowing = dropped > 0;

        if self.quad_count == 0 {
            return;
        }

        let vertices: &[TexturedVertex] = bytemuck::cast_slice(&self.quads[..self.quad_count]);
        let batch = TexturedBatch {
            texture: self.texture.map(|t| t.id),
            blend: self.blend_mode(),
            vertices,
            indices: &self.indices[..self.quad_count * 6],
        };
        ctx.draw_textured(&batch);
    }
}
