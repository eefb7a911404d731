use std::collections::HashMap;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A rectangle inside a texture atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    /// Size in points.
    pub content_size: Vec2,
    /// Normalized texture coordinates as (u1, v1, u2, v2).
    pub tex_coords: Vec4,
}

impl Default for SpriteFrame {
    fn default() -> Self {
        Self {
            content_size: Vec2::ZERO,
            tex_coords: Vec4::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// Named sprite frames of one texture atlas.
///
/// Loaded from a Zwoptex / TexturePacker style frame dictionary:
///
/// ```json
/// {
///   "texture": { "width": 256, "height": 256 },
///   "scale": 2,
///   "frames": { "Ball@2x.png": { "x": 0, "y": 0, "width": 32, "height": 32 } }
/// }
/// ```
///
/// Frame names lose their file extension and any `@2x` suffix, so the frame
/// above is looked up as `"Ball"`.
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet {
    frames: HashMap<String, SpriteFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SheetDescriptor {
    texture: TextureDescriptor,
    /// Content scale of the atlas pixels (2 for retina art).
    #[serde(default = "default_scale")]
    scale: f32,
    frames: HashMap<String, FrameDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextureDescriptor {
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FrameDescriptor {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl SpriteSheet {
    /// Parse a sprite sheet from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let desc: SheetDescriptor = serde_json::from_str(json)?;
        if desc.texture.width <= 0.0 || desc.texture.height <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "sprite sheet texture size must be positive, got {}x{}",
                desc.texture.width, desc.texture.height
            )));
        }
        if desc.scale <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "sprite sheet scale must be positive, got {}",
                desc.scale
            )));
        }

        let tw = desc.texture.width;
        let th = desc.texture.height;
        let frames = desc
            .frames
            .into_iter()
            .map(|(key, f)| {
                let (nx, ny) = (f.x / tw, f.y / th);
                let (nw, nh) = (f.width / tw, f.height / th);
                let frame = SpriteFrame {
                    content_size: Vec2::new(f.width, f.height) / desc.scale,
                    tex_coords: Vec4::new(nx, ny, nx + nw, ny + nh),
                };
                (frame_name(&key).to_string(), frame)
            })
            .collect();

        Ok(Self { frames })
    }

    /// Look up a frame by name.
    pub fn sprite_frame(&self, name: &str) -> Option<SpriteFrame> {
        self.frames.get(name).copied()
    }

    /// Like [`sprite_frame`](Self::sprite_frame), but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<SpriteFrame> {
        self.sprite_frame(name)
            .ok_or_else(|| EngineError::UnknownFrame(name.to_string()))
    }

    /// Insert or replace a frame.
    pub fn insert(&mut self, name: impl Into<String>, frame: SpriteFrame) {
        self.frames.insert(name.into(), frame);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// "Paddle@2x.png" -> "Paddle"
fn frame_name(key: &str) -> &str {
    let stem = match key.rfind('.') {
        Some(dot) if dot > 0 => &key[..dot],
        _ => key,
    };
    stem.strip_suffix("@2x").unwrap_or(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "texture": { "width": 256, "height": 128 },
        "scale": 2,
        "frames": {
            "Ball@2x.png": { "x": 0, "y": 0, "width": 32, "height": 32 },
            "Paddle.png": { "x": 64, "y": 32, "width": 128, "height": 32 },
            "Brick": { "x": 0, "y": 64, "width": 64, "height": 32 }
        }
    }"#;

    #[test]
    fn strips_extension_and_retina_suffix() {
        let sheet = SpriteSheet::from_json(SHEET).unwrap();
        assert_eq!(sheet.len(), 3);
        assert!(sheet.sprite_frame("Ball").is_some());
        assert!(sheet.sprite_frame("Paddle").is_some());
        assert!(sheet.sprite_frame("Brick").is_some());
        assert!(sheet.sprite_frame("Ball@2x").is_none());
    }

    #[test]
    fn normalizes_tex_coords_and_scales_size() {
        let sheet = SpriteSheet::from_json(SHEET).unwrap();
        let paddle = sheet.sprite_frame("Paddle").unwrap();
        assert_eq!(paddle.content_size, Vec2::new(64.0, 16.0));
        assert_eq!(paddle.tex_coords, Vec4::new(0.25, 0.25, 0.75, 0.5));
    }

    #[test]
    fn scale_defaults_to_one() {
        let json = r#"{
            "texture": { "width": 100, "height": 100 },
            "frames": { "a.png": { "x": 0, "y": 0, "width": 10, "height": 20 } }
        }"#;
        let sheet = SpriteSheet::from_json(json).unwrap();
        assert_eq!(sheet.sprite_frame("a").unwrap().content_size, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(SpriteSheet::from_json("{"), Err(EngineError::Json(_))));
        let zero = r#"{ "texture": { "width": 0, "height": 10 }, "frames": {} }"#;
        assert!(matches!(SpriteSheet::from_json(zero), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn require_reports_missing_frame() {
        let sheet = SpriteSheet::default();
        assert!(matches!(sheet.require("nope"), Err(EngineError::UnknownFrame(name)) if name == "nope"));
    }
}
