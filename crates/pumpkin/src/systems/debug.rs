//! Frame statistics and the debug overlay.
//!
//! `FrameStats` is owned by the frame driver and handed by reference to the
//! tree walk and the renderers; `DebugLayer` resets it each frame and logs a
//! one-line summary when enabled.

use log::info;

/// Counters collected during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Backend draw calls issued.
    pub draw_calls: u32,
    /// Triangles submitted across all draw calls.
    pub triangle_count: u32,
    /// Nodes visited by the transform walk.
    pub node_count: u32,
    /// Sprite quads rewritten into batch buffers, whether the sprite was
    /// dirty or its batch changed shape.
    pub dirty_count: u32,
    /// Sprites skipped because a batch was over capacity.
    pub dropped_sprites: u32,
}

impl FrameStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Smoothed FPS meter plus the per-frame stats line.
#[derive(Debug, Clone, Default)]
pub struct DebugLayer {
    pub enabled: bool,
    fps: f64,
}

impl DebugLayer {
    /// Weight of the newest sample in the FPS moving average.
    const FPS_SMOOTHING: f64 = 0.1;

    pub fn new(enabled: bool) -> Self {
        Self { enabled, fps: 0.0 }
    }

    /// Start a frame: clear the counters and fold `elapsed` (seconds since
    /// the previous frame) into the FPS average.
    pub fn begin_frame(&mut self, elapsed: f32, stats: &mut FrameStats) {
        stats.reset();
        if elapsed > 0.0 {
            let sample = 1.0 / elapsed as f64;
            self.fps = sample * Self::FPS_SMOOTHING + self.fps * (1.0 - Self::FPS_SMOOTHING);
        }
    }

    /// Finish a frame, logging the stats line when enabled.
    pub fn end_frame(&self, stats: &FrameStats) {
        if self.enabled {
            info!("{}", self.summary(stats));
        }
    }

    pub fn summary(&self, stats: &FrameStats) -> String {
        format!(
            "Draw calls: {}, triangles: {}, nodes: {} ({}), {:.1} FPS",
            stats.draw_calls, stats.triangle_count, stats.node_count, stats.dirty_count, self.fps
        )
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
