/// Game time driven by display-refresh frame deltas.
///
/// Frame deltas are clamped to `max_dt` so a long stall (debugger, app in
/// background) does not teleport every tween to its end in one step.
#[derive(Debug, Clone)]
pub struct GameClock {
    time: f64,
    paused: bool,
    max_dt: f32,
}

impl GameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            time: 0.0,
            paused: false,
            max_dt,
        }
    }

    /// Feed one frame's elapsed seconds. Returns the delta the game should
    /// advance by, or `None` when paused or the delta is not positive.
    pub fn advance(&mut self, elapsed: f32) -> Option<f32> {
        if self.paused || !(elapsed > 0.0) {
            return None;
        }
        let dt = elapsed.min(self.max_dt);
        self.time += dt as f64;
        Some(dt)
    }

    /// Seconds of unpaused game time so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(0.25)
    }
}
