//! Frame clock for the render loop.
//!
//! [`Time`] can be driven two ways: [`Time::update`] reads the wall clock once
//! per displayed frame, while [`Time::advance`] steps by an explicit delta so
//! tests and offline renders are fully deterministic. Elapsed time is the sum
//! of scaled deltas in both cases, which is also what the field's jitter uses
//! as its phase.
//!
//! # Example
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // In the frame callback:
//! let (elapsed, delta) = time.update();
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the render loop.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds. Kept in f64 so small deltas still
    /// register after days of running.
    elapsed_secs: f64,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Advance by the wall-clock time since the previous frame. Call once per frame.
    ///
    /// Uses the fixed delta instead when one is set.
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if !self.paused {
            let fps_elapsed = now.duration_since(self.fps_update_time);
            if fps_elapsed >= self.fps_update_interval {
                let frames_since = self.frame_count + 1 - self.fps_frame_count;
                self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
                self.fps_frame_count = self.frame_count + 1;
                self.fps_update_time = now;
            }
        }

        self.advance(self.fixed_delta.unwrap_or(raw_delta))
    }

    /// Advance by an explicit `delta` in seconds, ignoring the wall clock.
    ///
    /// Negative deltas are treated as zero. Returns `(elapsed_time, delta_time)`.
    pub fn advance(&mut self, delta: f32) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed(), self.delta_secs);
        }

        self.delta_secs = delta.max(0.0) * self.time_scale;
        self.elapsed_secs += f64::from(self.delta_secs);
        self.frame_count += 1;

        (self.elapsed(), self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs as f32
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second (wall-clock updates only).
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

    /// Pause time progression.
    ///
    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Set a fixed delta time used by [`update`](Self::update).
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Reset the timer to its initial state.
    pub fn reset(&mut self) {
        *self = Self {
            fixed_delta: self.fixed_delta,
            time_scale: self.time_scale,
            ..Self::new()
        };
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
