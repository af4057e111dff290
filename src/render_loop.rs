//! Frame-driven loop tying the field to a display.
//!
//! The host owns the actual frame callback (a winit redraw, a test loop, an
//! offline exporter) and calls [`RenderLoop::tick`] or [`RenderLoop::step`]
//! from it. Each call reads the progress source once, rewrites the field and
//! hands a complete [`Frame`] to a [`DisplaySurface`].

use glam::Mat4;

use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::progress::ProgressSource;
use crate::time::Time;
use crate::Vec3;

/// Everything a display needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Live positions, one per particle.
    pub positions: &'a [Vec3],
    /// Static colors, same length and order as `positions`.
    pub colors: &'a [Vec3],
    /// Object rotation applied to the whole field.
    pub model: Mat4,
    /// Progress the positions were computed with.
    pub progress: f32,
    /// Elapsed seconds the jitter was computed with.
    pub time: f32,
    /// Field generation; changes when buffers were rebuilt.
    pub generation: u64,
}

/// Consumer of finished frames.
pub trait DisplaySurface {
    type Error;

    /// Draw `frame`. Called at most once per loop iteration.
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// Constant spin of the whole field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotation {
    /// Radians per second about the y axis.
    pub y_speed: f32,
    /// Radians per second about the z axis.
    pub z_speed: f32,
}

impl Default for AutoRotation {
    fn default() -> Self {
        Self {
            y_speed: 0.1,
            z_speed: 0.05,
        }
    }
}

impl AutoRotation {
    /// No rotation at all.
    pub const NONE: Self = Self {
        y_speed: 0.0,
        z_speed: 0.0,
    };

    /// Model matrix at `time` seconds. Matches an XYZ Euler rotation with x = 0.
    pub fn model_at(&self, time: f32) -> Mat4 {
        Mat4::from_rotation_y(time * self.y_speed) * Mat4::from_rotation_z(time * self.z_speed)
    }
}

/// Drives a [`ParticleField`] from a [`ProgressSource`] once per frame.
pub struct RenderLoop<P: ProgressSource> {
    field: ParticleField,
    source: P,
    time: Time,
    rotation: AutoRotation,
    last_progress: f32,
}

impl<P: ProgressSource> RenderLoop<P> {
    pub fn new(field: ParticleField, source: P) -> Self {
        Self {
            field,
            source,
            time: Time::new(),
            rotation: AutoRotation::default(),
            last_progress: 0.0,
        }
    }

    /// Replace the default auto-rotation.
    pub fn with_rotation(mut self, rotation: AutoRotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Run one frame using wall-clock time.
    pub fn tick<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        self.time.update();
        self.render(surface)
    }

    /// Run one frame advancing time by exactly `delta` seconds.
    pub fn step<S: DisplaySurface>(&mut self, delta: f32, surface: &mut S) -> Result<(), S::Error> {
        self.time.advance(delta);
        self.render(surface)
    }

    fn render<S: DisplaySurface>(&mut self, surface: &mut S) -> Result<(), S::Error> {
        let elapsed = self.time.elapsed();
        self.source.advance(self.time.delta());
        let progress = self.source.progress();
        self.last_progress = progress;

        self.field.update(progress, elapsed);

        let frame = Frame {
            positions: self.field.positions(),
            colors: self.field.colors(),
            model: self.rotation.model_at(elapsed),
            progress,
            time: elapsed,
            generation: self.field.generation(),
        };
        surface.present(&frame)?;

        self.field.mark_uploaded();
        Ok(())
    }

    /// Rebuild the field from a new config. The next frame carries the new buffers.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        self.field.reinitialize(config)
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    /// Progress used by the most recent frame.
    pub fn last_progress(&self) -> f32 {
        self.last_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConstantProgress;

    #[derive(Default)]
    struct CountingSurface {
        frames: usize,
        last_len: usize,
    }

    impl DisplaySurface for CountingSurface {
        type Error = ();

        fn present(&mut self, frame: &Frame<'_>) -> Result<(), ()> {
            assert_eq!(frame.positions.len(), frame.colors.len());
            self.frames += 1;
            self.last_len = frame.positions.len();
            Ok(())
        }
    }

    struct FailingSurface;

    impl DisplaySurface for FailingSurface {
        type Error = &'static str;

        fn present(&mut self, _frame: &Frame<'_>) -> Result<(), Self::Error> {
            Err("lost")
        }
    }

    fn field(count: u32) -> ParticleField {
        ParticleField::new(FieldConfig::default().with_particle_count(count).with_seed(1)).unwrap()
    }

    #[test]
    fn test_rotation_at_zero_is_identity() {
        let m = AutoRotation::default().model_at(0.0);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_rotation_speeds() {
        let rot = AutoRotation::default();
        // Half a turn about y, a quarter turn about z.
        let m = rot.model_at(10.0 * std::f32::consts::PI);
        let x = m.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::Y, 1e-5));
        let z = m.transform_vector3(Vec3::Z);
        assert!(z.abs_diff_eq(-Vec3::Z, 1e-5));
    }

    #[test]
    fn test_step_presents_and_clears_upload_flag() {
        let mut looper = RenderLoop::new(field(32), ConstantProgress(0.5));
        let mut surface = CountingSurface::default();
        looper.step(1.0 / 60.0, &mut surface).unwrap();
        assert_eq!(surface.frames, 1);
        assert_eq!(surface.last_len, 32);
        assert!(!looper.field().needs_upload());
        assert_eq!(looper.last_progress(), 0.5);
    }

    #[test]
    fn test_failed_present_keeps_upload_pending() {
        let mut looper = RenderLoop::new(field(8), ConstantProgress(0.0));
        assert_eq!(looper.step(0.1, &mut FailingSurface), Err("lost"));
        assert!(looper.field().needs_upload());
    }

    #[test]
    fn test_reconfigure_changes_frame_size() {
        let mut looper = RenderLoop::new(field(10), ConstantProgress(1.0));
        let mut surface = CountingSurface::default();
        looper.step(0.1, &mut surface).unwrap();
        looper
            .reconfigure(FieldConfig::default().with_particle_count(25))
            .unwrap();
        looper.step(0.1, &mut surface).unwrap();
        assert_eq!(surface.last_len, 25);
        assert_eq!(looper.field().generation(), 1);
    }
}
