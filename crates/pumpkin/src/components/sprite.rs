use std::collections::HashMap;
use std::rc::Rc;

use glam::{Affine2, Vec2, Vec4};

use crate::assets::sprite_sheet::SpriteFrame;
use crate::assets::texture::Texture;
use crate::components::animation::Animation;
use crate::components::visual::Visual;
use crate::error::{EngineError, Result};
use crate::extensions::tweenable::{AlphaTweenable, ColorTweenable};
use crate::renderer::vertex::{pack_color, TexturedQuad, TexturedVertex};

/// Playback state of the animation a sprite is currently running.
#[derive(Debug, Clone)]
struct ActiveAnimation {
    name: String,
    animation: Rc<Animation>,
    frame_index: usize,
    elapsed: f32,
    current_loop: u32,
}

/// Visual that draws a rectangle of a texture (or a flat colored placeholder).
///
/// Every property setter marks the sprite for redraw; the cached quad is
/// rebuilt lazily the next time [`textured_quad`](Self::textured_quad) runs.
#[derive(Debug, Clone)]
pub struct Sprite {
    needs_redraw: bool,
    hidden: bool,
    anchor_point: Vec2,
    flip_x: bool,
    flip_y: bool,
    color: Vec4,
    alpha: f32,
    sprite_frame: Option<SpriteFrame>,
    texture: Option<Texture>,
    placeholder_content_size: Vec2,
    /// Lower values draw first and therefore appear behind other sprites.
    /// Batches only pick up changes when re-sorted.
    pub draw_order: i32,
    quad: TexturedQuad,

    animations: HashMap<String, Rc<Animation>>,
    active_animation: Option<ActiveAnimation>,
    active_frame: Option<SpriteFrame>,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            needs_redraw: true,
            hidden: false,
            anchor_point: Vec2::splat(0.5),
            flip_x: false,
            flip_y: false,
            color: Vec4::ONE,
            alpha: 1.0,
            sprite_frame: None,
            texture: None,
            placeholder_content_size: Vec2::ZERO,
            draw_order: 0,
            quad: TexturedQuad::default(),
            animations: HashMap::new(),
            active_animation: None,
            active_frame: None,
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprite showing one frame of an atlas.
    pub fn from_frame(frame: SpriteFrame) -> Self {
        Self {
            sprite_frame: Some(frame),
            ..Self::default()
        }
    }

    /// Sprite showing a whole texture.
    pub fn from_texture(texture: Texture) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }

    /// Untextured sprite of the given size, drawn in its flat color.
    pub fn placeholder(size: Vec2, color: Vec4) -> Self {
        Self {
            placeholder_content_size: size,
            color,
            ..Self::default()
        }
    }

    // -- Builder pattern --

    pub fn with_texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_anchor_point(mut self, anchor: Vec2) -> Self {
        self.anchor_point = anchor;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_draw_order(mut self, draw_order: i32) -> Self {
        self.draw_order = draw_order;
        self
    }

    // -- Properties --

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_needs_redraw(&mut self, needs_redraw: bool) {
        self.needs_redraw = needs_redraw;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.needs_redraw = true;
    }

    pub fn anchor_point(&self) -> Vec2 {
        self.anchor_point
    }

    /// Normalized attachment point; (0.5, 0.5) is the center.
    pub fn set_anchor_point(&mut self, anchor: Vec2) {
        self.anchor_point = anchor;
        self.needs_redraw = true;
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn set_flip_x(&mut self, flip: bool) {
        self.flip_x = flip;
        self.needs_redraw = true;
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn set_flip_y(&mut self, flip: bool) {
        self.flip_y = flip;
        self.needs_redraw = true;
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.needs_redraw = true;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.needs_redraw = true;
    }

    pub fn sprite_frame(&self) -> Option<SpriteFrame> {
        self.sprite_frame
    }

    pub fn set_sprite_frame(&mut self, frame: Option<SpriteFrame>) {
        self.sprite_frame = frame;
        self.needs_redraw = true;
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Option<Texture>) {
        self.texture = texture;
        self.needs_redraw = true;
    }

    pub fn set_placeholder_content_size(&mut self, size: Vec2) {
        self.placeholder_content_size = size;
        self.needs_redraw = true;
    }

    /// Size of the drawn rectangle, from the first source that is set:
    /// animation frame, sprite frame, texture, placeholder size.
    pub fn content_size(&self) -> Vec2 {
        if let Some(frame) = self.active_frame.as_ref().or(self.sprite_frame.as_ref()) {
            frame.content_size
        } else if let Some(texture) = &self.texture {
            texture.content_size
        } else {
            self.placeholder_content_size
        }
    }

    /// Texture rectangle as (u1, v1, u2, v2).
    pub fn tex_coords(&self) -> Vec4 {
        self.active_frame
            .as_ref()
            .or(self.sprite_frame.as_ref())
            .map_or(Vec4::new(0.0, 0.0, 1.0, 1.0), |frame| frame.tex_coords)
    }

    // -- Geometry --

    /// Corners (tl, tr, br, bl) in the sprite's local space, anchor applied.
    fn local_corners(&self) -> [Vec2; 4] {
        let size = self.content_size();
        let a1 = -self.anchor_point * size;
        let a2 = a1 + size;
        [
            Vec2::new(a1.x, a1.y),
            Vec2::new(a2.x, a1.y),
            Vec2::new(a2.x, a2.y),
            Vec2::new(a1.x, a2.y),
        ]
    }

    /// The quad used to draw this sprite, recomputed only if the sprite
    /// needs a redraw. Clears the redraw flag.
    pub fn textured_quad(&mut self, world: &Affine2) -> TexturedQuad {
        if self.needs_redraw {
            self.quad = self.compute_quad(world);
            self.needs_redraw = false;
        }
        self.quad
    }

    fn compute_quad(&self, world: &Affine2) -> TexturedQuad {
        if self.hidden {
            return TexturedQuad::default();
        }

        let tc = self.tex_coords();
        let (tx1, tx2) = if self.flip_x { (tc.z, tc.x) } else { (tc.x, tc.z) };
        let (ty1, ty2) = if self.flip_y { (tc.w, tc.y) } else { (tc.y, tc.w) };
        let color = pack_color(self.color, self.alpha);

        let [tl, tr, br, bl] = self.local_corners().map(|p| world.transform_point2(p));
        TexturedQuad {
            tl: TexturedVertex::new(tl, Vec2::new(tx1, ty1), color),
            tr: TexturedVertex::new(tr, Vec2::new(tx2, ty1), color),
            br: TexturedVertex::new(br, Vec2::new(tx2, ty2), color),
            bl: TexturedVertex::new(bl, Vec2::new(tx1, ty2), color),
        }
    }

    /// Axis-aligned bounds of the transformed rectangle as
    /// (min x, min y, max x, max y). Ignores `hidden`.
    pub fn bounding_box(&self, world: &Affine2) -> Vec4 {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for corner in self.local_corners() {
            let p = world.transform_point2(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Vec4::new(min.x, min.y, max.x, max.y)
    }

    // -- Animations --

    /// Register an animation under a name. Names are unique per sprite.
    pub fn add_animation(&mut self, name: impl Into<String>, animation: impl Into<Rc<Animation>>) -> Result<()> {
        let name = name.into();
        let animation = animation.into();
        if animation.frames.is_empty() {
            return Err(EngineError::EmptyAnimation(name));
        }
        if self.animations.contains_key(&name) {
            return Err(EngineError::DuplicateAnimation(name));
        }
        self.animations.insert(name, animation);
        Ok(())
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Play an animation from its first frame.
    pub fn play_animation(&mut self, name: &str) -> Result<()> {
        self.play_animation_from_frame(name, 0)
    }

    /// Play an animation starting at `frame_index`.
    pub fn play_animation_from_frame(&mut self, name: &str, frame_index: usize) -> Result<()> {
        let animation = self
            .animations
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownAnimation(name.to_string()))?;
        let len = animation.frames.len();
        let frame = *animation
            .frames
            .get(frame_index)
            .ok_or(EngineError::IndexOutOfBounds { index: frame_index, len })?;

        self.active_animation = Some(ActiveAnimation {
            name: name.to_string(),
            animation,
            frame_index,
            elapsed: 0.0,
            current_loop: 0,
        });
        self.active_frame = Some(frame);
        self.needs_redraw = true;
        Ok(())
    }

    /// Stop the current animation and restore the sprite's own frame.
    pub fn stop_animation(&mut self) {
        self.active_animation = None;
        self.active_frame = None;
        self.needs_redraw = true;
    }

    /// Name of the animation being played, if any.
    pub fn current_animation(&self) -> Option<&str> {
        self.active_animation.as_ref().map(|a| a.name.as_str())
    }

    pub fn is_animating(&self) -> bool {
        self.active_animation.is_some()
    }

    /// Advance the running animation.
    ///
    /// One frame step per call at most: once `time_per_frame` has accumulated
    /// the next frame is shown and the timer restarts.
    pub fn update(&mut self, dt: f32) {
        let Some(active) = self.active_animation.as_mut() else {
            return;
        };

        if active.elapsed < active.animation.time_per_frame {
            active.elapsed += dt;
            return;
        }

        self.needs_redraw = true;
        active.elapsed = 0.0;
        active.frame_index += 1;

        if active.frame_index == active.animation.frames.len() {
            active.frame_index = 0;
            active.current_loop += 1;
            if active.animation.loop_limit() == Some(active.current_loop) {
                if active.animation.restore_original_frame {
                    self.active_frame = None;
                }
                self.active_animation = None;
                return;
            }
        }

        self.active_frame = active.animation.frames.get(active.frame_index).copied();
    }
}

impl Visual for Sprite {
    fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn set_needs_redraw(&mut self, needs_redraw: bool) {
        self.needs_redraw = needs_redraw;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        Sprite::set_hidden(self, hidden);
    }

    fn anchor_point(&self) -> Vec2 {
        self.anchor_point
    }

    fn flip_x(&self) -> bool {
        self.flip_x
    }

    fn flip_y(&self) -> bool {
        self.flip_y
    }

    fn content_size(&self) -> Vec2 {
        Sprite::content_size(self)
    }

    fn tex_coords(&self) -> Vec4 {
        Sprite::tex_coords(self)
    }

    fn bounding_box(&self, world: &Affine2) -> Vec4 {
        Sprite::bounding_box(self, world)
    }

    fn update(&mut self, dt: f32) {
        Sprite::update(self, dt);
    }
}

impl ColorTweenable for Sprite {
    fn color(&self) -> Vec4 {
        self.color
    }

    fn set_color(&mut self, color: Vec4) {
        Sprite::set_color(self, color);
    }
}

impl AlphaTweenable for Sprite {
    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        Sprite::set_alpha(self, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TextureId;

    fn frame(size: f32, u: f32) -> SpriteFrame {
        SpriteFrame {
            content_size: Vec2::splat(size),
            tex_coords: Vec4::new(u, 0.0, u + 0.25, 0.25),
        }
    }

    #[test]
    fn content_size_priority() {
        let mut sprite = Sprite::placeholder(Vec2::new(5.0, 5.0), Vec4::ONE);
        assert_eq!(sprite.content_size(), Vec2::new(5.0, 5.0));

        sprite.set_texture(Some(Texture::new(TextureId(1), Vec2::new(64.0, 32.0))));
        assert_eq!(sprite.content_size(), Vec2::new(64.0, 32.0));

        sprite.set_sprite_frame(Some(frame(16.0, 0.0)));
        assert_eq!(sprite.content_size(), Vec2::splat(16.0));

        sprite.add_animation("spin", Animation::new(vec![frame(8.0, 0.5)], 0.1)).unwrap();
        sprite.play_animation("spin").unwrap();
        assert_eq!(sprite.content_size(), Vec2::splat(8.0));
        assert_eq!(sprite.tex_coords(), Vec4::new(0.5, 0.0, 0.75, 0.25));
    }

    #[test]
    fn quad_is_centered_and_translated() {
        let mut sprite = Sprite::placeholder(Vec2::new(10.0, 4.0), Vec4::ONE);
        let world = Affine2::from_translation(Vec2::new(100.0, 50.0));
        let quad = sprite.textured_quad(&world);

        assert_eq!(quad.tl.position, [95.0, 48.0]);
        assert_eq!(quad.br.position, [105.0, 52.0]);
        assert_eq!(quad.tl.tex_coord, [0.0, 0.0]);
        assert_eq!(quad.br.tex_coord, [1.0, 1.0]);
        assert_eq!(quad.tl.color, [255, 255, 255, 255]);
        assert!(!sprite.needs_redraw());
    }

    #[test]
    fn flips_swap_tex_coords() {
        let mut sprite = Sprite::from_frame(frame(4.0, 0.0));
        sprite.set_flip_x(true);
        let quad = sprite.textured_quad(&Affine2::IDENTITY);
        assert_eq!(quad.tl.tex_coord, [0.25, 0.0]);
        assert_eq!(quad.tr.tex_coord, [0.0, 0.0]);

        sprite.set_flip_y(true);
        let quad = sprite.textured_quad(&Affine2::IDENTITY);
        assert_eq!(quad.tl.tex_coord, [0.25, 0.25]);
        assert_eq!(quad.bl.tex_coord, [0.25, 0.0]);
    }

    #[test]
    fn hidden_sprite_yields_zero_quad() {
        let mut sprite = Sprite::placeholder(Vec2::splat(10.0), Vec4::ONE);
        sprite.set_hidden(true);
        let quad = sprite.textured_quad(&Affine2::from_translation(Vec2::new(3.0, 3.0)));
        assert!(quad.is_degenerate());
    }

    #[test]
    fn cached_quad_reused_until_dirty() {
        let mut sprite = Sprite::placeholder(Vec2::splat(2.0), Vec4::ONE);
        let first = sprite.textured_quad(&Affine2::IDENTITY);
        // A different transform is ignored while the sprite is clean.
        let second = sprite.textured_quad(&Affine2::from_translation(Vec2::new(50.0, 0.0)));
        assert_eq!(first, second);

        sprite.set_needs_redraw(true);
        let third = sprite.textured_quad(&Affine2::from_translation(Vec2::new(50.0, 0.0)));
        assert_eq!(third.tl.position, [49.0, -1.0]);
    }

    #[test]
    fn bounding_box_of_rotated_sprite() {
        let sprite = Sprite::placeholder(Vec2::new(4.0, 2.0), Vec4::ONE);
        let world = Affine2::from_angle(std::f32::consts::FRAC_PI_2);
        let bb = sprite.bounding_box(&world);
        assert!((bb.x + 1.0).abs() < 1e-5);
        assert!((bb.y + 2.0).abs() < 1e-5);
        assert!((bb.z - 1.0).abs() < 1e-5);
        assert!((bb.w - 2.0).abs() < 1e-5);
    }

    #[test]
    fn duplicate_and_unknown_animations() {
        let mut sprite = Sprite::new();
        let anim = Rc::new(Animation::new(vec![frame(1.0, 0.0)], 0.1));
        sprite.add_animation("a", Rc::clone(&anim)).unwrap();
        assert!(matches!(sprite.add_animation("a", anim), Err(EngineError::DuplicateAnimation(_))));
        assert!(matches!(sprite.play_animation("b"), Err(EngineError::UnknownAnimation(_))));
        assert!(matches!(
            sprite.play_animation_from_frame("a", 3),
            Err(EngineError::IndexOutOfBounds { index: 3, len: 1 })
        ));
        assert!(matches!(
            sprite.add_animation("empty", Animation::new(Vec::new(), 0.1)),
            Err(EngineError::EmptyAnimation(_))
        ));
    }

    #[test]
    fn bounded_animation_restores_original_frame() {
        let original = frame(32.0, 0.75);
        let mut sprite = Sprite::from_frame(original);
        let anim = Animation::new(vec![frame(1.0, 0.0), frame(2.0, 0.25)], 0.1).with_loops(1);
        sprite.add_animation("blink", anim).unwrap();
        sprite.play_animation("blink").unwrap();
        assert_eq!(sprite.content_size(), Vec2::splat(1.0));

        // Accumulate, then step to frame 1.
        sprite.update(0.1);
        sprite.update(0.1);
        assert_eq!(sprite.content_size(), Vec2::splat(2.0));

        // Accumulate, then wrap: one loop done, animation ends.
        sprite.update(0.1);
        sprite.update(0.1);
        assert!(!sprite.is_animating());
        assert_eq!(sprite.content_size(), Vec2::splat(32.0));
    }

    #[test]
    fn animation_can_hold_last_frame() {
        let mut sprite = Sprite::from_frame(frame(32.0, 0.75));
        let anim = Animation::new(vec![frame(1.0, 0.0), frame(2.0, 0.25)], 0.1)
            .with_loops(1)
            .with_restore_original_frame(false);
        sprite.add_animation("once", anim).unwrap();
        sprite.play_animation("once").unwrap();
        for _ in 0..4 {
            sprite.update(0.1);
        }
        assert!(!sprite.is_animating());
        assert_eq!(sprite.content_size(), Vec2::splat(2.0));
    }

    #[test]
    fn stop_restores_frame() {
        let mut sprite = Sprite::from_frame(frame(32.0, 0.75));
        sprite.add_animation("loop", Animation::new(vec![frame(1.0, 0.0)], 0.1)).unwrap();
        sprite.play_animation("loop").unwrap();
        assert_eq!(sprite.current_animation(), Some("loop"));
        sprite.stop_animation();
        assert_eq!(sprite.current_animation(), None);
        assert_eq!(sprite.content_size(), Vec2::splat(32.0));
    }
}
