//! Progress sources.
//!
//! The field only ever sees a single number in `[0, 1]` per frame. Where that
//! number comes from is up to a [`ProgressSource`]: in the viewer it is
//! [`ScrollProgress`], which binds a scroll offset over a virtual page to
//! progress with a smoothing lag; in tests it is usually [`ConstantProgress`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScrollConfig;

/// Supplies the morph progress once per frame.
pub trait ProgressSource {
    /// Current progress, always within `[0, 1]`.
    fn progress(&self) -> f32;

    /// Advance any internal smoothing by `delta` seconds.
    fn advance(&mut self, delta: f32);
}

/// Easing curves applied to smoothed progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// No easing.
    Linear,
    /// Quadratic ease-in-out: slow at both ends, fastest in the middle.
    #[default]
    Power1InOut,
}

impl Ease {
    /// Map `t` in `[0, 1]` through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// A progress value that never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantProgress(pub f32);

impl ProgressSource for ConstantProgress {
    fn progress(&self) -> f32 {
        self.0.clamp(0.0, 1.0)
    }

    fn advance(&mut self, _delta: f32) {}
}

/// Scroll position bound to progress over the full scrollable height.
///
/// The raw progress is `offset / (page_height - viewport_height)`. The value
/// handed out trails it with exponential smoothing that takes roughly
/// `lag_seconds` to settle, identically in both scroll directions, and is then
/// passed through the configured [`Ease`].
#[derive(Debug, Clone)]
pub struct ScrollProgress {
    offset: f32,
    page_height: f32,
    viewport_height: f32,
    line_height: f32,
    lag_seconds: f32,
    ease: Ease,
    smoothed: f32,
}

impl ScrollProgress {
    /// Start at the top of the page with no pending motion.
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            offset: 0.0,
            page_height: config.page_height,
            viewport_height: config.viewport_height,
            line_height: config.line_height,
            lag_seconds: config.lag_seconds.max(0.0),
            ease: config.ease,
            smoothed: 0.0,
        }
    }

    /// Distance that can actually be scrolled, never below one pixel.
    pub fn scrollable_height(&self) -> f32 {
        (self.page_height - self.viewport_height).max(1.0)
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Un-smoothed, un-eased progress implied by the scroll offset.
    pub fn target(&self) -> f32 {
        (self.offset / self.scrollable_height()).clamp(0.0, 1.0)
    }

    /// Smoothed progress before easing.
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Jump to an absolute scroll offset in pixels.
    pub fn set_scroll(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = offset.clamp(0.0, self.scrollable_height());
        }
    }

    /// Scroll by `delta` pixels (positive scrolls down the page).
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll(self.offset + delta);
    }

    /// Scroll by a number of mouse wheel lines.
    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll_by(lines * self.line_height);
    }

    /// Scroll by whole viewports (page up/down).
    pub fn scroll_pages(&mut self, pages: f32) {
        self.scroll_by(pages * self.viewport_height);
    }

    /// Track a viewport resize; the offset is re-clamped to the new range.
    pub fn set_viewport_height(&mut self, height: f32) {
        if height.is_finite() && height > 0.0 {
            self.viewport_height = height;
            self.set_scroll(self.offset);
            debug!(
                viewport_height = height,
                scrollable = self.scrollable_height(),
                "scroll range updated"
            );
        }
    }

    /// Snap the smoothed value to the scroll target, skipping the lag.
    pub fn settle(&mut self) {
        self.smoothed = self.target();
    }
}

impl ProgressSource for ScrollProgress {
    fn progress(&self) -> f32 {
        self.ease.apply(self.smoothed)
    }

    fn advance(&mut self, delta: f32) {
        let target = self.target();
        if self.lag_seconds <= 0.0 {
            self.smoothed = target;
            return;
        }

        // Three time constants per lag period leaves ~5% of the gap.
        let rate = 3.0 / self.lag_seconds;
        let blend = 1.0 - (-delta.max(0.0) * rate).exp();
        self.smoothed += (target - self.smoothed) * blend;
        self.smoothed = self.smoothed.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroll(lag: f32, ease: Ease) -> ScrollProgress {
        ScrollProgress::new(&ScrollConfig {
            page_height: 1100.0,
            viewport_height: 100.0,
            lag_seconds: lag,
            ease,
            line_height: 10.0,
        })
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in [Ease::Linear, Ease::Power1InOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
        assert_eq!(Ease::Power1InOut.apply(0.5), 0.5);
        assert_eq!(Ease::Power1InOut.apply(0.25), 0.125);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = Ease::Power1InOut.apply(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_constant_progress_clamps() {
        assert_eq!(ConstantProgress(2.0).progress(), 1.0);
        assert_eq!(ConstantProgress(-1.0).progress(), 0.0);
    }

    #[test]
    fn test_scroll_maps_linearly() {
        let mut s = scroll(0.0, Ease::Linear);
        s.set_scroll(250.0);
        s.advance(0.016);
        assert!((s.progress() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_offset_clamped() {
        let mut s = scroll(0.0, Ease::Linear);
        s.scroll_by(-50.0);
        assert_eq!(s.offset(), 0.0);
        s.scroll_lines(500.0);
        assert_eq!(s.offset(), 1000.0);
        assert_eq!(s.target(), 1.0);
    }

    #[test]
    fn test_lag_is_symmetric() {
        let mut down = scroll(1.5, Ease::Linear);
        down.set_scroll(1000.0);
        down.advance(0.5);
        let rise = down.smoothed();

        let mut up = scroll(1.5, Ease::Linear);
        up.set_scroll(1000.0);
        up.settle();
        up.set_scroll(0.0);
        up.advance(0.5);
        let fall = 1.0 - up.smoothed();

        assert!(rise > 0.0 && rise < 1.0);
        assert!((rise - fall).abs() < 1e-5);
    }

    #[test]
    fn test_lag_settles_within_period() {
        let mut s = scroll(1.5, Ease::Linear);
        s.set_scroll(1000.0);
        for _ in 0..90 {
            s.advance(1.0 / 60.0);
        }
        assert!(s.smoothed() > 0.94);
        assert!(s.smoothed() <= 1.0);
    }

    #[test]
    fn test_viewport_resize_reclamps() {
        let mut s = scroll(0.0, Ease::Linear);
        s.set_scroll(1000.0);
        s.set_viewport_height(600.0);
        assert_eq!(s.scrollable_height(), 500.0);
        assert_eq!(s.offset(), 500.0);
        assert_eq!(s.target(), 1.0);
    }
}
