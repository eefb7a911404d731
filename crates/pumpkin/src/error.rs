use crate::api::types::NodeId;
use crate::extensions::tween::TweenId;
use crate::extensions::tweenable::Capabilities;

/// Errors reported by the engine.
///
/// Almost every variant signals a caller bug (an invariant of the scene graph,
/// a pool or a batch would be broken). Destroyed targets are not errors; the
/// update and render passes skip them silently.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("node {0:?} already has a parent")]
    AlreadyHasParent(NodeId),
    #[error("node {child:?} is already a child of {parent:?}")]
    DuplicateChild { parent: NodeId, child: NodeId },
    #[error("cannot attach node {0:?} below itself")]
    CycleDetected(NodeId),
    #[error("node {0:?} does not exist (destroyed or never spawned)")]
    StaleNode(NodeId),
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("node {0:?} is already in this sprite batch")]
    DuplicateSprite(NodeId),
    #[error("node {0:?} is not in this sprite batch")]
    SpriteNotFound(NodeId),
    #[error("sprite batch capacity {0} exceeds the 16-bit index limit")]
    CapacityTooLarge(usize),

    #[error("tween {0:?} is not active")]
    TweenNotActive(TweenId),
    #[error("tween has no target")]
    MissingTarget,
    #[error("node {target:?} cannot be tweened with {required:?}")]
    MissingCapability { target: NodeId, required: Capabilities },

    #[error("animation {0:?} already exists on this sprite")]
    DuplicateAnimation(String),
    #[error("unknown animation {0:?}")]
    UnknownAnimation(String),
    #[error("animation {0:?} has no frames")]
    EmptyAnimation(String),
    #[error("sprite sheet has no frame named {0:?}")]
    UnknownFrame(String),

    #[error("renderer is not in the render queue")]
    RendererNotFound,

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
