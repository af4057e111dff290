//! The morphing particle field.
//!
//! A [`ParticleField`] owns four equally sized buffers: the scattered start
//! positions, the sphere end positions, the gradient colors, and the live
//! positions that are actually displayed. Only the live buffer changes after
//! construction, and it is rewritten from scratch on every [`update`].
//!
//! [`update`]: ParticleField::update

use tracing::{debug, info};

use crate::config::FieldConfig;
use crate::distribution::PointDistributor;
use crate::error::ConfigError;
use crate::Vec3;

/// Jitter amplitude at progress 0.
pub const NOISE_AMPLITUDE: f32 = 0.05;

/// Fraction of the jitter removed at progress 1.
pub const NOISE_DAMPING: f32 = 0.5;

/// Jitter amplitude for a given (clamped) progress.
///
/// Falls linearly from [`NOISE_AMPLITUDE`] to half of it, so the sphere keeps
/// a faint shimmer even when fully formed.
#[inline]
pub fn noise_amplitude(progress: f32) -> f32 {
    NOISE_AMPLITUDE * (1.0 - progress * NOISE_DAMPING)
}

/// Displayed position of one particle.
///
/// Linear interpolation between `start` and `end`, plus a sine/cosine wobble
/// on x and y whose phase is the particle's own interpolated coordinate.
/// z is never perturbed.
#[inline]
pub fn morph_position(start: Vec3, end: Vec3, progress: f32, time: f32) -> Vec3 {
    let base = start + (end - start) * progress;
    let amplitude = noise_amplitude(progress);
    Vec3::new(
        base.x + (time + base.x).sin() * amplitude,
        base.y + (time + base.y).cos() * amplitude,
        base.z,
    )
}

/// Clamp a progress value into `[0, 1]`, mapping NaN to 0.
#[inline]
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Fixed-size set of particles morphing between a scattered cloud and a sphere.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    start: Vec<Vec3>,
    end: Vec<Vec3>,
    colors: Vec<Vec3>,
    live: Vec<Vec3>,
    /// Bumped whenever the buffers are rebuilt.
    generation: u64,
    needs_upload: bool,
}

impl ParticleField {
    /// Validate `config` and build all buffers.
    ///
    /// The live buffer starts equal to the scattered positions, whatever the
    /// progress source currently reports.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let count = config.particle_count as usize;
        let mut field = Self {
            config: config.clone(),
            start: Vec::with_capacity(count),
            end: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            live: Vec::with_capacity(count),
            generation: 0,
            needs_upload: true,
        };
        field.populate();

        info!(
            particle_count = config.particle_count,
            sphere_radius = config.sphere_radius,
            scatter_radius = config.scatter_radius,
            seeded = config.seed.is_some(),
            "particle field initialized"
        );
        Ok(field)
    }

    /// Replace every buffer using a new config.
    ///
    /// If `config` is invalid the field is left exactly as it was.
    pub fn reinitialize(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let previous = self.start.len();
        self.config = config;
        self.populate();
        self.generation += 1;
        self.needs_upload = true;

        info!(
            previous,
            particle_count = self.config.particle_count,
            generation = self.generation,
            "particle field reinitialized"
        );
        Ok(())
    }

    fn populate(&mut self) {
        let mut distributor = PointDistributor::new(&self.config);
        let count = distributor.count();

        self.start.clear();
        self.end.clear();
        self.colors.clear();
        self.live.clear();

        for i in 0..count {
            let point = distributor.point(i);
            self.start.push(point.start);
            self.end.push(point.end);
            self.colors.push(point.color);
        }
        self.live.extend_from_slice(&self.start);

        self.start.shrink_to_fit();
        self.end.shrink_to_fit();
        self.colors.shrink_to_fit();
        self.live.shrink_to_fit();

        debug!(count, "populated particle buffers");
    }

    /// Recompute every live position for `progress` and `time` (seconds).
    ///
    /// Progress is clamped to `[0, 1]`. The result depends only on the
    /// arguments and the static buffers, never on the previous live values.
    pub fn update(&mut self, progress: f32, time: f32) -> &[Vec3] {
        debug_assert!(progress.is_finite(), "progress must be finite, got {}", progress);
        let progress = clamp_progress(progress);

        for ((live, &start), &end) in self.live.iter_mut().zip(&self.start).zip(&self.end) {
            *live = morph_position(start, end, progress, time);
        }

        self.needs_upload = true;
        &self.live
    }

    /// Currently displayed positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.live
    }

    /// Displayed positions as a flat `[x, y, z, x, y, z, ...]` slice.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.live)
    }

    /// Scattered start positions.
    pub fn start_positions(&self) -> &[Vec3] {
        &self.start
    }

    /// Sphere end positions.
    pub fn end_positions(&self) -> &[Vec3] {
        &self.end
    }

    /// Per-particle linear RGB colors.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Colors as a flat `[r, g, b, r, g, b, ...]` slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Always false for a constructed field; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Incremented by every [`reinitialize`](Self::reinitialize).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the live buffer changed since the display last consumed it.
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Record that the display has consumed the live buffer.
    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_field() -> ParticleField {
        ParticleField::new(FieldConfig::default().with_particle_count(64).with_seed(9)).unwrap()
    }

    #[test]
    fn test_new_starts_in_chaos() {
        let field = small_field();
        assert_eq!(field.len(), 64);
        assert_eq!(field.positions(), field.start_positions());
        assert!(field.needs_upload());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = ParticleField::new(FieldConfig::default().with_particle_count(0));
        assert!(matches!(result, Err(ConfigError::InvalidParticleCount)));
    }

    #[test]
    fn test_noise_amplitude_range() {
        assert_eq!(noise_amplitude(0.0), 0.05);
        assert!((noise_amplitude(1.0) - 0.025).abs() < 1e-7);
        assert!((noise_amplitude(0.5) - 0.0375).abs() < 1e-7);
    }

    #[test]
    fn test_morph_leaves_z_untouched() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let end = Vec3::new(-1.0, 0.0, 1.0);
        for t in [0.0, 0.7, 13.0] {
            let p = morph_position(start, end, 0.5, t);
            assert_eq!(p.z, 2.0);
        }
    }

    #[test]
    fn test_update_clamps_progress() {
        let mut a = small_field();
        let mut b = a.clone();
        let over = a.update(1.7, 2.0).to_vec();
        let one = b.update(1.0, 2.0).to_vec();
        assert_eq!(over, one);

        let under = a.update(-3.0, 2.0).to_vec();
        let zero = b.update(0.0, 2.0).to_vec();
        assert_eq!(under, zero);
    }

    #[test]
    fn test_update_marks_upload() {
        let mut field = small_field();
        field.mark_uploaded();
        assert!(!field.needs_upload());
        field.update(0.3, 0.1);
        assert!(field.needs_upload());
    }

    #[test]
    fn test_flat_views_match_vectors() {
        let field = small_field();
        let flat = field.positions_flat();
        assert_eq!(flat.len(), 64 * 3);
        assert_eq!(flat[3], field.positions()[1].x);
        assert_eq!(field.colors_flat()[2], field.colors()[0].z);
    }

    #[test]
    fn test_failed_reinitialize_keeps_state() {
        let mut field = small_field();
        let before = field.start_positions().to_vec();
        let err = field.reinitialize(FieldConfig::default().with_sphere_radius(-1.0));
        assert!(err.is_err());
        assert_eq!(field.start_positions(), before.as_slice());
        assert_eq!(field.generation(), 0);
    }
}
