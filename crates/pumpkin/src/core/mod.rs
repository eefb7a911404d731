pub mod math;
pub mod scene;
pub mod time;

pub use scene::SceneGraph;
pub use time::GameClock;
