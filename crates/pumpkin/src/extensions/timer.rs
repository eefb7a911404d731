// extensions/timer.rs
//
// Delayed and repeating callbacks in game time. Timers only advance when the
// pool is updated, with the same dt as the tweens.
//
// Usage:
//   let mut timers = TimerPool::new();
//   timers.after_delay(1.5, || println!("serve"));
//   timers.repeating(0.25, TimerRepeat::Times(4), move || blink());
//   timers.update_timers(dt);  // once per frame

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{error, trace};

/// Handle to an active timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Callback run each time a timer fires.
pub type TimerCallback = Box<dyn FnMut()>;

/// How many times a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerRepeat {
    #[default]
    Once,
    /// Fire `n` times in total.
    Times(u32),
    Forever,
}

impl TimerRepeat {
    /// Map a raw repeat count: negative repeats forever, 0 and 1 fire once.
    pub fn from_count(count: i32) -> Self {
        match count {
            c if c < 0 => TimerRepeat::Forever,
            0 | 1 => TimerRepeat::Once,
            c => TimerRepeat::Times(c as u32),
        }
    }

    fn is_done(self, repetition: u32) -> bool {
        match self {
            TimerRepeat::Once => true,
            TimerRepeat::Times(n) => repetition >= n,
            TimerRepeat::Forever => false,
        }
    }
}

/// A pending action.
#[derive(Default)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
    repeat: TimerRepeat,
    repetition: u32,
    callback: Option<TimerCallback>,
    event: Option<u32>,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("repeat", &self.repeat)
            .field("repetition", &self.repetition)
            .field("event", &self.event)
            .finish()
    }
}

impl Timer {
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn repeat(&self) -> TimerRepeat {
        self.repeat
    }

    /// How many times the timer has fired so far.
    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    fn prepare_for_reuse(&mut self) {
        *self = Self::default();
    }
}

/// Owns the active timers and recycles finished ones.
#[derive(Debug, Default)]
pub struct TimerPool {
    active: Vec<(TimerId, Timer)>,
    recycled: Vec<Timer>,
    next_id: u32,
    /// Event IDs of timers that fired, to be polled.
    fired_events: Vec<u32>,
}

impl TimerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once, `delay` seconds from now.
    pub fn after_delay(&mut self, delay: f32, callback: impl FnMut() + 'static) -> TimerId {
        self.schedule(delay, TimerRepeat::Once, Some(Box::new(callback)), None)
    }

    /// Run `callback` every `interval` seconds, starting one interval from now.
    pub fn repeating(&mut self, interval: f32, repeat: TimerRepeat, callback: impl FnMut() + 'static) -> TimerId {
        self.schedule(interval, repeat, Some(Box::new(callback)), None)
    }

    /// Queue `event_id` for `drain_fired` after `delay` seconds.
    pub fn after_delay_event(&mut self, delay: f32, event_id: u32) -> TimerId {
        self.schedule(delay, TimerRepeat::Once, None, Some(event_id))
    }

    fn schedule(
        &mut self,
        duration: f32,
        repeat: TimerRepeat,
        callback: Option<TimerCallback>,
        event: Option<u32>,
    ) -> TimerId {
        let mut timer = self.recycled.pop().unwrap_or_default();
        timer.duration = duration;
        timer.repeat = repeat;
        timer.callback = callback;
        timer.event = event;

        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push((id, timer));
        id
    }

    /// Cancel a timer before it fires. Returns false if it was not active.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.active.iter().position(|(tid, _)| *tid == id) {
            Some(index) => {
                let (_, timer) = self.active.remove(index);
                self.recycle(timer);
                true
            }
            None => false,
        }
    }

    /// Cancel every active timer without firing it.
    pub fn cancel_all(&mut self) {
        for (_, mut timer) in self.active.drain(..) {
            timer.prepare_for_reuse();
            self.recycled.push(timer);
        }
    }

    /// Advance all timers by `dt` seconds. Returns how many fired.
    ///
    /// A timer fires when its elapsed time reaches its duration. Repeating
    /// timers restart from zero and keep counting in the same pass.
    pub fn update_timers(&mut self, dt: f32) -> usize {
        let mut fired = 0;
        let mut i = 0;
        while i < self.active.len() {
            let (id, timer) = &mut self.active[i];
            if timer.elapsed < timer.duration {
                timer.elapsed += dt;
                i += 1;
                continue;
            }

            if let Some(callback) = timer.callback.as_mut() {
                if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                    error!("Callback of timer {:?} panicked", id);
                }
            }
            if let Some(event_id) = timer.event {
                self.fired_events.push(event_id);
            }
            timer.repetition += 1;
            fired += 1;

            if timer.repeat.is_done(timer.repetition) {
                let (id, timer) = self.active.remove(i);
                trace!("Timer {:?} done after {} firings", id, timer.repetition);
                self.recycle(timer);
            } else {
                timer.elapsed = dt;
                i += 1;
            }
        }
        fired
    }

    fn recycle(&mut self, mut timer: Timer) {
        timer.prepare_for_reuse();
        self.recycled.push(timer);
    }

    /// Drop every pooled timer.
    pub fn flush_recycled_timers(&mut self) {
        self.recycled.clear();
    }

    pub fn recycled_count(&self) -> usize {
        self.recycled.len()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.active.iter().find(|(tid, _)| *tid == id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.get(id).is_some()
    }

    /// Drain events queued by `after_delay_event` timers.
    pub fn drain_fired(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.fired_events.drain(..)
    }

    /// Number of active timers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether there are no active timers.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn after_delay_fires_once() {
        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        timers.after_delay(0.25, cb);

        for _ in 0..3 {
            timers.update_timers(0.1);
        }
        assert_eq!(count.get(), 0);
        timers.update_timers(0.1);
        assert_eq!(count.get(), 1);
        assert!(timers.is_empty());
        assert_eq!(timers.recycled_count(), 1);

        for _ in 0..10 {
            timers.update_timers(0.1);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn repeat_counts_follow_observed_behavior() {
        assert_eq!(TimerRepeat::from_count(-1), TimerRepeat::Forever);
        assert_eq!(TimerRepeat::from_count(0), TimerRepeat::Once);
        assert_eq!(TimerRepeat::from_count(1), TimerRepeat::Once);
        assert_eq!(TimerRepeat::from_count(3), TimerRepeat::Times(3));

        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        timers.repeating(0.1, TimerRepeat::Times(3), cb);
        for _ in 0..50 {
            timers.update_timers(0.05);
        }
        assert_eq!(count.get(), 3);
        assert!(timers.is_empty());
    }

    #[test]
    fn forever_keeps_firing() {
        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        let id = timers.repeating(0.1, TimerRepeat::Forever, cb);
        for _ in 0..100 {
            timers.update_timers(0.05);
        }
        assert!(count.get() >= 30);
        assert_eq!(timers.get(id).unwrap().repetition(), count.get());
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
    }

    #[test]
    fn zero_interval_fires_once_per_update() {
        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        timers.repeating(0.0, TimerRepeat::Forever, cb);
        timers.update_timers(0.016);
        timers.update_timers(0.016);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn cancel_all_skips_callbacks() {
        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        timers.after_delay(0.0, cb);
        timers.after_delay_event(0.0, 9);
        timers.cancel_all();
        timers.update_timers(1.0);
        assert_eq!(count.get(), 0);
        assert_eq!(timers.drain_fired().count(), 0);
        assert_eq!(timers.recycled_count(), 2);
        timers.flush_recycled_timers();
        assert_eq!(timers.recycled_count(), 0);
    }

    #[test]
    fn event_timers_queue_ids() {
        let mut timers = TimerPool::new();
        timers.after_delay_event(0.1, 5);
        timers.update_timers(0.1);
        timers.update_timers(0.1);
        assert_eq!(timers.drain_fired().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn panicking_callback_is_isolated() {
        let mut timers = TimerPool::new();
        let (count, cb) = counter();
        timers.after_delay(0.0, || panic!("boom"));
        timers.after_delay(0.0, cb);
        assert_eq!(timers.update_timers(0.1), 2);
        assert_eq!(count.get(), 1);
        assert!(timers.is_empty());
    }
}
