//! Frame clock feeding the tween driver.
//!
//! Measures wall-clock time between redraws and hands out a scaled, clamped
//! frame delta. The clamp keeps a stalled window (dragged, minimized,
//! debugger break) from fast-forwarding every firework to completion on the
//! next frame.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // In the redraw handler:
//! let dt = clock.tick();
//! fireworks.update(&mut ctx, &mut allocator, dt);
//! log::trace!("frame {} at {:.1} fps", clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single frame delta.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Fastest playback speed the clock accepts.
pub const MAX_TIME_SCALE: f32 = 100.0;

/// Per-frame timing for the render loop.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Sum of all deltas handed out.
    elapsed: Duration,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Largest delta a single tick may return.
    max_delta: Duration,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl FrameClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first frame is measured from `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            max_delta: DEFAULT_MAX_DELTA,
            time_scale: 1.0,
        }
    }

    /// Advance to the current instant. Call once per frame.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Advance to `now` and return the frame delta.
    ///
    /// The raw delta is clamped to the max delta and then scaled. While
    /// paused the delta is zero.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let raw = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        let delta = if self.paused {
            Duration::ZERO
        } else {
            let clamped = raw.min(self.max_delta);
            if self.time_scale == 1.0 {
                clamped
            } else {
                Duration::try_from_secs_f64(clamped.as_secs_f64() * f64::from(self.time_scale))
                    .unwrap_or(Duration::MAX)
            }
        };
        self.elapsed = self.elapsed.saturating_add(delta);
        delta
    }

    /// Sum of all deltas handed out (scaled, excluding paused time).
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Toggle pause. While paused every tick returns a zero delta, so ramps
    /// freeze in place.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set time scale multiplier, clamped to `[0, MAX_TIME_SCALE]`.
    /// NaN stops time.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_nan() {
            0.0
        } else {
            scale.clamp(0.0, MAX_TIME_SCALE)
        };
    }

    /// Set the largest delta a single tick may return.
    pub fn set_max_delta(&mut self, max_delta: Duration) {
        self.max_delta = max_delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
