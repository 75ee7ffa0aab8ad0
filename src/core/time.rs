//! Frame timing utilities
//!
//! The scene advances on a fixed logical step: every ambient formula is keyed to
//! `SimClock::elapsed`, which grows by `step` once per tick regardless of how long
//! the frame actually took. `FrameTimer` measures the real frame rate separately.

use std::time::{Duration, Instant};

/// Logical step used by the aquarium animations (seconds per tick).
pub const DEFAULT_STEP: f32 = 0.016;

/// Fixed-step simulation clock.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    step: f32,
    elapsed: f32,
    frame: u64,
}

impl SimClock {
    /// Create a clock advancing `step` seconds per tick.
    pub fn new(step: f32) -> Self {
        Self {
            step,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance one tick and return the new logical time.
    pub fn tick(&mut self) -> f32 {
        self.elapsed += self.step;
        self.frame += 1;
        self.elapsed
    }

    /// Logical time in seconds.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of ticks since creation.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

/// Wall-clock frame timing for the driver.
///
/// `fps` is measured over one-second windows; until the first window closes it
/// reports the average over the whole run.
pub struct FrameTimer {
    started: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    window_start: Instant,
    window_frames: u32,
    window_fps: Option<f32>,
}

/// Length of one fps measurement window.
const FPS_WINDOW: Duration = Duration::from_secs(1);

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            started: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            window_start: now,
            window_frames: 0,
            window_fps: None,
        }
    }

    /// Mark the end of a frame.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.window_frames += 1;

        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.window_fps = Some(self.window_frames as f32 / window.as_secs_f32());
            self.window_frames = 0;
            self.window_start = now;
        }
    }

    /// Length of the last frame in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Mean frame length since creation, in seconds.
    pub fn average_delta_secs(&self) -> f32 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.last_frame.saturating_duration_since(self.started).as_secs_f32() / self.frame_count as f32
    }

    pub fn fps(&self) -> f32 {
        match self.window_fps {
            Some(fps) => fps,
            None => {
                let avg = self.average_delta_secs();
                if avg > 0.0 { 1.0 / avg } else { 0.0 }
            }
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
