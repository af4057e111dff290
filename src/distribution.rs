//! Point distributions for the two field states.
//!
//! Every particle index maps to a scattered position (the "chaos" cloud), a
//! position on a Fibonacci sphere and a gradient color. The sphere and color
//! are pure functions of the index; the scatter draws from an RNG that is
//! either seeded for reproducible clouds or seeded from entropy.

use crate::config::FieldConfig;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random point in the axis-aligned cube of edge `scatter_radius` centered at the origin.
///
/// Each coordinate is drawn independently from `[-scatter_radius / 2, scatter_radius / 2)`.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R, scatter_radius: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * scatter_radius,
        (rng.gen::<f32>() - 0.5) * scatter_radius,
        (rng.gen::<f32>() - 0.5) * scatter_radius,
    )
}

/// Point `index` of a `count`-point golden-spiral distribution on a sphere.
///
/// The polar angle `phi = acos(-1 + 2i/N)` walks pole to pole; the azimuth
/// `theta = sqrt(N * PI) * phi` winds around it fast enough that neighbouring
/// turns interleave instead of banding. Angles are evaluated in f64 since
/// `theta` grows into the hundreds of radians for a few thousand points.
pub fn sphere_position(index: u32, count: u32, radius: f32) -> Vec3 {
    let n = count as f64;
    let phi = (-1.0 + 2.0 * index as f64 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * std::f64::consts::PI).sqrt() * phi;
    let r = radius as f64;

    Vec3::new(
        (r * theta.cos() * phi.sin()) as f32,
        (r * theta.sin() * phi.sin()) as f32,
        (r * phi.cos()) as f32,
    )
}

/// Linear RGB gradient from `primary` (index 0) towards `secondary`.
///
/// The blend factor is `index / count`, so the last particle lands one step
/// short of `secondary`.
#[inline]
pub fn blended_color(index: u32, count: u32, primary: Vec3, secondary: Vec3) -> Vec3 {
    primary + (secondary - primary) * (index as f32 / count as f32)
}

/// The three static attributes of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributedPoint {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec3,
}

/// Produces the static attributes for every index of a validated config.
pub struct PointDistributor {
    count: u32,
    sphere_radius: f32,
    scatter_radius: f32,
    primary: Vec3,
    secondary: Vec3,
    rng: SmallRng,
}

impl PointDistributor {
    /// Build a distributor for `config`. The config must already be validated.
    pub fn new(config: &FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            count: config.particle_count,
            sphere_radius: config.sphere_radius,
            scatter_radius: config.scatter_radius,
            primary: config.primary_color,
            secondary: config.secondary_color,
            rng,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Attributes of particle `index`.
    ///
    /// Scatter positions consume the RNG, so calling this in index order is
    /// what makes a seeded cloud reproducible.
    pub fn point(&mut self, index: u32) -> DistributedPoint {
        DistributedPoint {
            start: scatter_position(&mut self.rng, self.scatter_radius),
            end: sphere_position(index, self.count, self.sphere_radius),
            color: blended_color(index, self.count, self.primary, self.secondary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_within_cube() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            let p = scatter_position(&mut rng, 25.0);
            assert!(p.abs().max_element() <= 12.5);
        }
    }

    #[test]
    fn test_first_sphere_point_is_south_pole() {
        let p = sphere_position(0, 4, 2.2);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -2.2), 1e-5));
    }

    #[test]
    fn test_sphere_points_on_surface() {
        for i in 0..500 {
            let p = sphere_position(i, 500, 1.5);
            assert!((p.length() - 1.5).abs() < 1e-5, "point {} has length {}", i, p.length());
        }
    }

    #[test]
    fn test_blended_color_endpoints() {
        let a = Vec3::new(0.0, 0.2, 1.0);
        let b = Vec3::ONE;
        assert_eq!(blended_color(0, 10, a, b), a);
        let mid = blended_color(5, 10, a, b);
        assert!(mid.abs_diff_eq(Vec3::new(0.5, 0.6, 1.0), 1e-6));
    }

    #[test]
    fn test_seeded_distributor_is_reproducible() {
        let config = FieldConfig::default().with_particle_count(16).with_seed(42);
        let mut a = PointDistributor::new(&config);
        let mut b = PointDistributor::new(&config);
        for i in 0..16 {
            assert_eq!(a.point(i), b.point(i));
        }
    }
}
