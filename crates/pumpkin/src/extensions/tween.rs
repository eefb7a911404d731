// extensions/tween.rs
//
// Tweens: time-driven changes to one property of a node.
// Decoupled from node storage; targets are resolved through `TweenTargets`.
//
// The additive kinds (move, rotate, scale) apply the difference between this
// step's eased value and the previous one, so several tweens on the same
// property stack instead of overwriting each other. Tint and fade assign.
//
// Usage:
//   let tween = Tween::move_to(Vec2::new(100.0, 0.0), 0.5)
//       .with_target(node)
//       .with_easing(Easing::QuadOut);
//   let id = pool.add(tween, &scene)?;
//   pool.update_tweens(dt, &mut scene);  // once per frame

use std::fmt;

use glam::{Vec2, Vec4};

use crate::api::types::NodeId;
use super::easing::{lerp, lerp_vec4, Easing};
use super::tweenable::{Capabilities, TweenTargets};

/// Handle to an active tween in a [`TweenPool`](super::tween_pool::TweenPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Callback run once when a tween completes on its own.
pub type TweenCallback = Box<dyn FnOnce()>;

/// Concrete tween kinds. The pool recycles tweens per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenKind {
    MoveFrom,
    MoveTo,
    RotateFrom,
    RotateTo,
    ScaleFrom,
    ScaleTo,
    Tint,
    Fade,
}

impl TweenKind {
    pub const COUNT: usize = 8;

    pub const ALL: [TweenKind; Self::COUNT] = [
        TweenKind::MoveFrom,
        TweenKind::MoveTo,
        TweenKind::RotateFrom,
        TweenKind::RotateTo,
        TweenKind::ScaleFrom,
        TweenKind::ScaleTo,
        TweenKind::Tint,
        TweenKind::Fade,
    ];

    /// Dense index, for per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The target capability this kind mutates.
    pub fn required_capability(self) -> Capabilities {
        match self {
            TweenKind::MoveFrom | TweenKind::MoveTo => Capabilities::POSITION,
            TweenKind::RotateFrom | TweenKind::RotateTo => Capabilities::ANGLE,
            TweenKind::ScaleFrom | TweenKind::ScaleTo => Capabilities::SCALE,
            TweenKind::Tint => Capabilities::COLOR,
            TweenKind::Fade => Capabilities::ALPHA,
        }
    }

    /// Action of this kind with all amounts zeroed.
    pub fn default_action(self) -> TweenAction {
        match self {
            TweenKind::MoveFrom => TweenAction::MoveFrom { amount: Vec2::ZERO },
            TweenKind::MoveTo => TweenAction::MoveTo { amount: Vec2::ZERO },
            TweenKind::RotateFrom => TweenAction::RotateFrom { amount: 0.0 },
            TweenKind::RotateTo => TweenAction::RotateTo { amount: 0.0 },
            TweenKind::ScaleFrom => TweenAction::ScaleFrom { amount: Vec2::ZERO },
            TweenKind::ScaleTo => TweenAction::ScaleTo { amount: Vec2::ZERO },
            TweenKind::Tint => TweenAction::Tint { start: Vec4::ZERO, end: Vec4::ZERO },
            TweenKind::Fade => TweenAction::Fade { start: 0.0, end: 0.0 },
        }
    }

    /// Identity baseline for the incremental kinds.
    fn baseline(self) -> Vec2 {
        match self {
            TweenKind::ScaleFrom | TweenKind::ScaleTo => Vec2::ONE,
            _ => Vec2::ZERO,
        }
    }
}

/// What a tween does to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenAction {
    /// Jump the position by `amount`, then ease the offset back to zero.
    MoveFrom { amount: Vec2 },
    /// Ease the position by `amount` away from where it started.
    MoveTo { amount: Vec2 },
    /// Jump the angle by `amount` degrees, then ease back.
    RotateFrom { amount: f32 },
    /// Ease the angle by `amount` degrees.
    RotateTo { amount: f32 },
    /// Multiply the scale by `amount`, then ease the factor back to (1, 1).
    ScaleFrom { amount: Vec2 },
    /// Ease a scale factor from (1, 1) to `amount`.
    ScaleTo { amount: Vec2 },
    /// Assign a color interpolated between two endpoints.
    Tint { start: Vec4, end: Vec4 },
    /// Assign an alpha interpolated between two endpoints, clamped to [0, 1].
    Fade { start: f32, end: f32 },
}

impl TweenAction {
    pub fn kind(&self) -> TweenKind {
        match self {
            TweenAction::MoveFrom { .. } => TweenKind::MoveFrom,
            TweenAction::MoveTo { .. } => TweenKind::MoveTo,
            TweenAction::RotateFrom { .. } => TweenKind::RotateFrom,
            TweenAction::RotateTo { .. } => TweenKind::RotateTo,
            TweenAction::ScaleFrom { .. } => TweenKind::ScaleFrom,
            TweenAction::ScaleTo { .. } => TweenKind::ScaleTo,
            TweenAction::Tint { .. } => TweenKind::Tint,
            TweenAction::Fade { .. } => TweenKind::Fade,
        }
    }
}

/// A single tween.
///
/// Runs through `delay`, then `duration`, then reports completion. The last
/// step always uses the eased value at t = 1, so the target lands exactly on
/// the end state whatever the frame timing.
pub struct Tween {
    /// Node to animate. A tween whose target is missing counts as completed.
    pub target: Option<NodeId>,
    /// Lookup key, not unique.
    pub name: String,
    /// Seconds, not counting the delay.
    pub duration: f32,
    /// Seconds before the tween starts moving.
    pub delay: f32,
    pub easing: Easing,
    /// Keyframe chaining: do not touch the target until the delay is over.
    pub wait_until_after_delay: bool,
    pub action: TweenAction,
    /// Event ID queued on the pool when the tween completes on its own.
    pub completion_event: Option<u32>,
    on_complete: Option<TweenCallback>,

    previous: Vec2,
    elapsed: f32,
    delay_elapsed: f32,
    completed: bool,
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("action", &self.action)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("easing", &self.easing)
            .field("elapsed", &self.elapsed)
            .field("completed", &self.completed)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl Tween {
    /// Create an untargeted tween.
    pub fn new(action: TweenAction, duration: f32) -> Self {
        Self {
            target: None,
            name: String::new(),
            duration,
            delay: 0.0,
            easing: Easing::Linear,
            wait_until_after_delay: false,
            action,
            completion_event: None,
            on_complete: None,
            previous: action.kind().baseline(),
            elapsed: 0.0,
            delay_elapsed: 0.0,
            completed: false,
        }
    }

    pub fn move_from(amount: Vec2, duration: f32) -> Self {
        Self::new(TweenAction::MoveFrom { amount }, duration)
    }

    pub fn move_to(amount: Vec2, duration: f32) -> Self {
        Self::new(TweenAction::MoveTo { amount }, duration)
    }

    pub fn rotate_from(amount: f32, duration: f32) -> Self {
        Self::new(TweenAction::RotateFrom { amount }, duration)
    }

    pub fn rotate_to(amount: f32, duration: f32) -> Self {
        Self::new(TweenAction::RotateTo { amount }, duration)
    }

    pub fn scale_from(amount: Vec2, duration: f32) -> Self {
        Self::new(TweenAction::ScaleFrom { amount }, duration)
    }

    pub fn scale_to(amount: Vec2, duration: f32) -> Self {
        Self::new(TweenAction::ScaleTo { amount }, duration)
    }

    pub fn tint(start: Vec4, end: Vec4, duration: f32) -> Self {
        Self::new(TweenAction::Tint { start, end }, duration)
    }

    pub fn fade(start: f32, end: f32, duration: f32) -> Self {
        Self::new(TweenAction::Fade { start, end }, duration)
    }

    // -- Builder methods --

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn with_completion_event(mut self, event_id: u32) -> Self {
        self.completion_event = Some(event_id);
        self
    }

    pub fn waiting_until_after_delay(mut self) -> Self {
        self.wait_until_after_delay = true;
        self
    }

    pub fn set_on_complete(&mut self, callback: Option<TweenCallback>) {
        self.on_complete = callback;
    }

    pub(crate) fn take_on_complete(&mut self) -> Option<TweenCallback> {
        self.on_complete.take()
    }

    pub fn kind(&self) -> TweenKind {
        self.action.kind()
    }

    /// Normalized progress through the duration [0, 1].
    pub fn progress(&self) -> f32 {
        if self.completed {
            1.0
        } else if self.duration <= 0.0 {
            0.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the tween ran to its end or lost its target.
    pub fn is_completed<T: TweenTargets + ?Sized>(&self, targets: &T) -> bool {
        self.completed || !self.target.is_some_and(|t| targets.is_alive(t))
    }

    /// Reset the incremental baseline. Called when the tween is added to a pool.
    pub(crate) fn start(&mut self) {
        self.previous = self.kind().baseline();
    }

    /// Advance by `dt` seconds and apply the new value to the target.
    pub(crate) fn update<T: TweenTargets + ?Sized>(&mut self, dt: f32, targets: &mut T) {
        let t = if self.delay_elapsed < self.delay {
            self.delay_elapsed += dt;
            if self.wait_until_after_delay {
                return;
            }
            0.0
        } else if self.elapsed < self.duration {
            let t = self.elapsed / self.duration;
            self.elapsed += dt;
            t
        } else {
            self.completed = true;
            1.0
        };

        self.step(self.easing.apply(t), targets);
    }

    /// Jump to the end state. No-op once completed.
    pub(crate) fn finish<T: TweenTargets + ?Sized>(&mut self, targets: &mut T) {
        if !self.is_completed(targets) {
            self.step(self.easing.apply(1.0), targets);
            self.completed = true;
        }
    }

    fn step<T: TweenTargets + ?Sized>(&mut self, t: f32, targets: &mut T) {
        let Some(target) = self.target else {
            return;
        };

        match self.action {
            TweenAction::MoveFrom { amount } => {
                let diff = self.advance_baseline(amount * (1.0 - t));
                if let Some(p) = targets.position_target(target) {
                    let position = p.position();
                    p.set_position(position + diff);
                }
            }
            TweenAction::MoveTo { amount } => {
                let diff = self.advance_baseline(amount * t);
                if let Some(p) = targets.position_target(target) {
                    let position = p.position();
                    p.set_position(position + diff);
                }
            }
            TweenAction::RotateFrom { amount } => {
                let diff = self.advance_baseline(Vec2::new(amount * (1.0 - t), 0.0));
                if let Some(a) = targets.angle_target(target) {
                    let angle = a.angle();
                    a.set_angle(angle + diff.x);
                }
            }
            TweenAction::RotateTo { amount } => {
                let diff = self.advance_baseline(Vec2::new(amount * t, 0.0));
                if let Some(a) = targets.angle_target(target) {
                    let angle = a.angle();
                    a.set_angle(angle + diff.x);
                }
            }
            TweenAction::ScaleFrom { amount } => {
                self.step_scale(amount * (1.0 - t) + Vec2::splat(t), target, targets);
            }
            TweenAction::ScaleTo { amount } => {
                self.step_scale(amount * t + Vec2::splat(1.0 - t), target, targets);
            }
            TweenAction::Tint { start, end } => {
                if let Some(c) = targets.color_target(target) {
                    c.set_color(lerp_vec4(start, end, t));
                }
            }
            TweenAction::Fade { start, end } => {
                if let Some(a) = targets.alpha_target(target) {
                    a.set_alpha(lerp(start, end, t).clamp(0.0, 1.0));
                }
            }
        }
    }

    /// Store `value` as the new baseline and return the additive difference.
    fn advance_baseline(&mut self, value: Vec2) -> Vec2 {
        let diff = value - self.previous;
        self.previous = value;
        diff
    }

    /// Scale composes by ratio. A zero baseline component cannot be divided
    /// out, so that component is assigned outright instead.
    fn step_scale<T: TweenTargets + ?Sized>(&mut self, value: Vec2, target: NodeId, targets: &mut T) {
        let previous = self.previous;
        self.previous = value;
        if let Some(s) = targets.scale_target(target) {
            let current = s.scale();
            let apply = |cur: f32, val: f32, prev: f32| if prev == 0.0 { val } else { cur * (val / prev) };
            s.set_scale(Vec2::new(
                apply(current.x, value.x, previous.x),
                apply(current.y, value.y, previous.y),
            ));
        }
    }

    /// Clear every field so a recycled tween carries nothing over.
    pub(crate) fn prepare_for_reuse(&mut self) {
        let kind = self.kind();
        self.target = None;
        self.name.clear();
        self.duration = 0.0;
        self.delay = 0.0;
        self.easing = Easing::Linear;
        self.wait_until_after_delay = false;
        self.action = kind.default_action();
        self.completion_event = None;
        self.on_complete = None;
        self.previous = kind.baseline();
        self.elapsed = 0.0;
        self.delay_elapsed = 0.0;
        self.completed = false;
    }
}
