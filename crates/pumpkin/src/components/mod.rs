pub mod animation;
pub mod node;
pub mod shape;
pub mod sprite;
pub mod visual;

pub use animation::Animation;
pub use node::Node;
pub use shape::Shape;
pub use sprite::Sprite;
pub use visual::{Visual, VisualKind};
