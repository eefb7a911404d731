//! Sprite frame animations.
//!
//! An [`Animation`] is a stateless sequence of frames; the playback state lives
//! in the [`Sprite`](crate::components::sprite::Sprite) that plays it, so one
//! animation can be shared by many sprites.

use crate::assets::sprite_sheet::{SpriteFrame, SpriteSheet};
use crate::error::Result;

/// A sequence of sprite frames shown at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Frames in playback order.
    pub frames: Vec<SpriteFrame>,
    /// Seconds each frame stays on screen.
    pub time_per_frame: f32,
    /// When the animation runs out of loops, go back to the sprite's own
    /// frame (true) or stay on the last animation frame (false).
    /// Stopping an animation early always restores the original frame.
    pub restore_original_frame: bool,
    /// Number of loops to play. `None` (or `Some(0)`) loops forever.
    pub loops: Option<u32>,
}

impl Animation {
    /// Create a looping animation.
    pub fn new(frames: Vec<SpriteFrame>, time_per_frame: f32) -> Self {
        Self {
            frames,
            time_per_frame,
            restore_original_frame: true,
            loops: None,
        }
    }

    /// Create a looping animation running at `fps` frames per second.
    pub fn from_fps(frames: Vec<SpriteFrame>, fps: f32) -> Self {
        Self::new(frames, 1.0 / fps)
    }

    /// Build an animation from named frames of a sprite sheet.
    pub fn from_sheet(sheet: &SpriteSheet, names: &[&str], time_per_frame: f32) -> Result<Self> {
        let frames = names
            .iter()
            .map(|name| sheet.require(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(frames, time_per_frame))
    }

    // -- Builder pattern --

    pub fn with_loops(mut self, loops: u32) -> Self {
        self.loops = Some(loops);
        self
    }

    pub fn with_restore_original_frame(mut self, restore: bool) -> Self {
        self.restore_original_frame = restore;
        self
    }

    /// Loop count after which playback stops, if bounded.
    pub fn loop_limit(&self) -> Option<u32> {
        self.loops.filter(|&n| n > 0)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Duration of a single pass through all frames.
    pub fn total_duration(&self) -> f32 {
        self.time_per_frame * self.frames.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use glam::Vec2;

    fn frame(w: f32) -> SpriteFrame {
        SpriteFrame {
            content_size: Vec2::new(w, w),
            ..Default::default()
        }
    }

    #[test]
    fn fps_constructor() {
        let anim = Animation::from_fps(vec![frame(1.0), frame(2.0)], 10.0);
        assert!((anim.time_per_frame - 0.1).abs() < 1e-6);
        assert!((anim.total_duration() - 0.2).abs() < 1e-6);
        assert_eq!(anim.loop_limit(), None);
    }

    #[test]
    fn zero_loops_means_forever() {
        let anim = Animation::new(vec![frame(1.0)], 0.1).with_loops(0);
        assert_eq!(anim.loop_limit(), None);
        let anim = anim.with_loops(3);
        assert_eq!(anim.loop_limit(), Some(3));
    }

    #[test]
    fn from_sheet_looks_up_names() {
        let mut sheet = SpriteSheet::default();
        sheet.insert("a", frame(1.0));
        sheet.insert("b", frame(2.0));

        let anim = Animation::from_sheet(&sheet, &["b", "a"], 0.2).unwrap();
        assert_eq!(anim.frames, vec![frame(2.0), frame(1.0)]);

        let missing = Animation::from_sheet(&sheet, &["a", "c"], 0.2);
        assert!(matches!(missing, Err(EngineError::UnknownFrame(name)) if name == "c"));
    }
}
