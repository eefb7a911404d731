// extensions/mod.rs
//
// Animation and scheduling on top of the scene graph.
// Tweens and timers never hold nodes, only handles resolved each frame.

pub mod easing;
pub mod timer;
pub mod transform;
pub mod tween;
pub mod tween_pool;
pub mod tweenable;

pub use easing::{Easing, lerp, lerp_vec2, lerp_vec4, ease, ease_vec2};
pub use timer::{Timer, TimerCallback, TimerId, TimerPool, TimerRepeat};
pub use transform::local_transform;
pub use tween::{Tween, TweenAction, TweenCallback, TweenId, TweenKind};
pub use tween_pool::TweenPool;
pub use tweenable::{
    AlphaTweenable, AngleTweenable, Capabilities, ColorTweenable, PositionTweenable,
    ScaleTweenable, TweenTargets,
};
