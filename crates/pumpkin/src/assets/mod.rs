pub mod sprite_sheet;
pub mod texture;

pub use sprite_sheet::{SpriteFrame, SpriteSheet};
pub use texture::Texture;
