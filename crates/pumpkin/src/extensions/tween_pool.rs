// extensions/tween_pool.rs
//
// Owns every active tween, steps them once per frame and recycles finished
// ones per kind so steady-state animation does not allocate.
//
// Usage:
//   let mut tweens = TweenPool::new();
//   let tween = tweens.move_to_tween(Vec2::new(0.0, -20.0), 0.3)
//       .with_target(paddle)
//       .with_name("bump");
//   tweens.replace(tween, true, &mut scene)?;  // restarts any running "bump"
//   tweens.update_tweens(dt, &mut scene);

use std::panic::{self, AssertUnwindSafe};

use glam::{Vec2, Vec4};
use log::{error, trace};

use crate::api::types::NodeId;
use crate::error::{EngineError, Result};
use super::easing::Easing;
use super::tween::{Tween, TweenAction, TweenId, TweenKind};
use super::tweenable::TweenTargets;

/// Active tweens in insertion order, plus per-kind free lists.
#[derive(Debug, Default)]
pub struct TweenPool {
    active: Vec<(TweenId, Tween)>,
    recycled: [Vec<Tween>; TweenKind::COUNT],
    next_id: u32,
    /// Completion events to be polled.
    completed_events: Vec<u32>,
}

impl TweenPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reset tween of `kind` from the free list, or allocate one.
    pub fn obtain(&mut self, kind: TweenKind) -> Tween {
        self.recycled[kind.index()]
            .pop()
            .unwrap_or_else(|| Tween::new(kind.default_action(), 0.0))
    }

    fn obtain_with(&mut self, action: TweenAction, duration: f32) -> Tween {
        let mut tween = self.obtain(action.kind());
        tween.action = action;
        tween.duration = duration;
        tween
    }

    pub fn move_from_tween(&mut self, amount: Vec2, duration: f32) -> Tween {
        self.obtain_with(TweenAction::MoveFrom { amount }, duration)
    }

    pub fn move_to_tween(&mut self, amount: Vec2, duration: f32) -> Tween {
        self.obtain_with(TweenAction::MoveTo { amount }, duration)
    }

    pub fn rotate_from_tween(&mut self, amount: f32, duration: f32) -> Tween {
        self.obtain_with(TweenAction::RotateFrom { amount }, duration)
    }

    pub fn rotate_to_tween(&mut self, amount: f32, duration: f32) -> Tween {
        self.obtain_with(TweenAction::RotateTo { amount }, duration)
    }

    pub fn scale_from_tween(&mut self, amount: Vec2, duration: f32) -> Tween {
        self.obtain_with(TweenAction::ScaleFrom { amount }, duration)
    }

    pub fn scale_to_tween(&mut self, amount: Vec2, duration: f32) -> Tween {
        self.obtain_with(TweenAction::ScaleTo { amount }, duration)
    }

    pub fn tint_tween(&mut self, start: Vec4, end: Vec4, duration: f32) -> Tween {
        self.obtain_with(TweenAction::Tint { start, end }, duration)
    }

    pub fn fade_tween(&mut self, start: f32, end: f32, duration: f32) -> Tween {
        self.obtain_with(TweenAction::Fade { start, end }, duration)
    }

    /// Start a tween. Returns a handle for later control.
    ///
    /// Fails if the target is alive but cannot take this kind of tween (a
    /// fade on a node without a visual). An untargeted or dead-target tween
    /// is accepted and completes on the next update.
    pub fn add<T: TweenTargets + ?Sized>(&mut self, mut tween: Tween, targets: &T) -> Result<TweenId> {
        if let Some(target) = tween.target {
            let required = tween.kind().required_capability();
            if let Some(caps) = targets.capabilities(target) {
                if !caps.contains(required) {
                    self.recycle(tween);
                    return Err(EngineError::MissingCapability { target, required });
                }
            }
        }

        let id = TweenId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        tween.start();
        self.active.push((id, tween));
        Ok(id)
    }

    /// Remove every active tween with the same target and name, then add
    /// this one. With `finish`, the removed tweens jump to their end state
    /// first. Their completion callbacks are not run.
    pub fn replace<T: TweenTargets + ?Sized>(
        &mut self,
        tween: Tween,
        finish: bool,
        targets: &mut T,
    ) -> Result<TweenId> {
        let Some(target) = tween.target else {
            self.recycle(tween);
            return Err(EngineError::MissingTarget);
        };
        let name = tween.name.clone();
        self.remove_where(finish, targets, |t| t.target == Some(target) && t.name == name);
        self.add(tween, targets)
    }

    /// Stop a tween without running its completion callback.
    pub fn remove<T: TweenTargets + ?Sized>(&mut self, id: TweenId, finish: bool, targets: &mut T) -> Result<()> {
        let index = self
            .active
            .iter()
            .position(|(tid, _)| *tid == id)
            .ok_or(EngineError::TweenNotActive(id))?;
        let (_, mut tween) = self.active.remove(index);
        if finish {
            tween.finish(targets);
        }
        self.recycle(tween);
        Ok(())
    }

    /// Remove every tween animating `target`. Returns how many were removed.
    pub fn remove_target<T: TweenTargets + ?Sized>(&mut self, target: NodeId, finish: bool, targets: &mut T) -> usize {
        self.remove_where(finish, targets, |t| t.target == Some(target))
    }

    /// Remove the tweens on `target` called `name`.
    pub fn remove_for_target_named<T: TweenTargets + ?Sized>(
        &mut self,
        target: NodeId,
        name: &str,
        finish: bool,
        targets: &mut T,
    ) -> usize {
        self.remove_where(finish, targets, |t| t.target == Some(target) && t.name == name)
    }

    pub fn remove_all<T: TweenTargets + ?Sized>(&mut self, finish: bool, targets: &mut T) -> usize {
        self.remove_where(finish, targets, |_| true)
    }

    fn remove_where<T, F>(&mut self, finish: bool, targets: &mut T, predicate: F) -> usize
    where
        T: TweenTargets + ?Sized,
        F: Fn(&Tween) -> bool,
    {
        let mut removed = 0;
        let mut i = 0;
        while i < self.active.len() {
            if predicate(&self.active[i].1) {
                let (_, mut tween) = self.active.remove(i);
                if finish {
                    tween.finish(targets);
                }
                self.recycle(tween);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Advance all tweens by `dt` seconds. Returns how many completed.
    ///
    /// A tween found completed (ran out, or lost its target) has its callback
    /// run, its completion event queued, and is recycled; it is not stepped
    /// again. A panicking callback is logged and does not stop the pass;
    /// neither does a tween whose step panics (a faulty `Easing::Custom`),
    /// which is removed without its callback or event.
    pub fn update_tweens<T: TweenTargets + ?Sized>(&mut self, dt: f32, targets: &mut T) -> usize {
        let mut completed = 0;
        let mut i = 0;
        while i < self.active.len() {
            if !self.active[i].1.is_completed(targets) {
                let (id, tween) = &mut self.active[i];
                let id = *id;
                if panic::catch_unwind(AssertUnwindSafe(|| tween.update(dt, targets))).is_err() {
                    // A tween that panics mid-step is dropped without completing.
                    error!("Tween {:?} ({:?}) panicked while stepping, removing it", id, tween.name);
                    let (_, tween) = self.active.remove(i);
                    self.recycle(tween);
                    continue;
                }
                i += 1;
                continue;
            }

            let (id, mut tween) = self.active.remove(i);
            if let Some(callback) = tween.take_on_complete() {
                if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                    error!("Completion callback of tween {:?} ({:?}) panicked", id, tween.name);
                }
            }
            if let Some(event_id) = tween.completion_event {
                self.completed_events.push(event_id);
            }
            trace!("Tween {:?} ({:?}) completed", id, tween.kind());
            self.recycle(tween);
            completed += 1;
        }
        completed
    }

    fn recycle(&mut self, mut tween: Tween) {
        tween.prepare_for_reuse();
        self.recycled[tween.kind().index()].push(tween);
    }

    /// Drop every pooled tween.
    pub fn flush_recycled_tweens(&mut self) {
        for list in &mut self.recycled {
            list.clear();
        }
    }

    /// Number of pooled tweens of `kind` waiting for reuse.
    pub fn recycled_count(&self, kind: TweenKind) -> usize {
        self.recycled[kind.index()].len()
    }

    /// Get a tween by handle.
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.active.iter().find(|(tid, _)| *tid == id).map(|(_, t)| t)
    }

    /// Get a tween mutably.
    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.active.iter_mut().find(|(tid, _)| *tid == id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.get(id).is_some()
    }

    /// Active tweens in update order.
    pub fn iter(&self) -> impl Iterator<Item = (TweenId, &Tween)> {
        self.active.iter().map(|(id, t)| (*id, t))
    }

    pub fn tweens_for_target(&self, target: NodeId) -> impl Iterator<Item = TweenId> + '_ {
        self.iter()
            .filter(move |(_, t)| t.target == Some(target))
            .map(|(id, _)| id)
    }

    pub fn tweens_for_target_named<'a>(&'a self, target: NodeId, name: &'a str) -> impl Iterator<Item = TweenId> + 'a {
        self.iter()
            .filter(move |(_, t)| t.target == Some(target) && t.name == name)
            .map(|(id, _)| id)
    }

    pub fn tweens_for_target_of_kind(&self, target: NodeId, kind: TweenKind) -> impl Iterator<Item = TweenId> + '_ {
        self.iter()
            .filter(move |(_, t)| t.target == Some(target) && t.kind() == kind)
            .map(|(id, _)| id)
    }

    // -- Screen effects --

    /// Shake `node` around its current position.
    pub fn screen_shake<T: TweenTargets + ?Sized>(
        &mut self,
        node: NodeId,
        amount: Vec2,
        oscillations: u32,
        duration: f32,
        targets: &T,
    ) -> Result<TweenId> {
        let tween = self
            .move_from_tween(amount, duration)
            .with_target(node)
            .with_easing(Easing::Shake { oscillations });
        self.add(tween, targets)
    }

    /// Wobble `node` around its current angle.
    pub fn screen_tumble<T: TweenTargets + ?Sized>(
        &mut self,
        node: NodeId,
        angle: f32,
        oscillations: u32,
        duration: f32,
        targets: &T,
    ) -> Result<TweenId> {
        let tween = self
            .rotate_from_tween(angle, duration)
            .with_target(node)
            .with_easing(Easing::Shake { oscillations });
        self.add(tween, targets)
    }

    /// Pulse the scale of `node` around its current scale.
    pub fn screen_zoom<T: TweenTargets + ?Sized>(
        &mut self,
        node: NodeId,
        amount: Vec2,
        oscillations: u32,
        duration: f32,
        targets: &T,
    ) -> Result<TweenId> {
        let tween = self
            .scale_from_tween(amount, duration)
            .with_target(node)
            .with_easing(Easing::Shake { oscillations });
        self.add(tween, targets)
    }

    /// Drain completion events (for game-side event handling).
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
