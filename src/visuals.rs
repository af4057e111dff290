//! Visual style of the rendered field.
//!
//! These settings only affect how the display draws the particles, never
//! where they are. By default sprites are small additive glows without depth
//! writes, seen through a light exponential fog by a camera 8 units back on +z.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Blend mode for particle rendering.
///
/// Controls how particle colors combine with the background and each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Standard alpha blending.
    Alpha,

    /// Additive blending (default).
    ///
    /// Overlapping particles become brighter, which is what makes the dense
    /// sphere glow.
    #[default]
    Additive,
}

/// Exponential-squared distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fog {
    /// Linear RGB fog color.
    pub color: [f32; 3],
    pub density: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0],
            density: 0.03,
        }
    }
}

impl Fog {
    /// How much of the fog color replaces the particle color at `depth`.
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

/// Fixed perspective camera looking at the origin from +z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            distance: 8.0,
        }
    }
}

impl CameraConfig {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }
}

/// Rendering options for the particle sprites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Sprite edge length in world units.
    pub point_size: f32,
    /// Global sprite opacity.
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// Whether sprites write depth. Off so overlapping glows accumulate.
    pub depth_write: bool,
    /// `None` disables fog.
    pub fog: Option<Fog>,
    pub camera: CameraConfig,
    /// Upper bound on the device pixel ratio used for the surface.
    pub max_pixel_ratio: f64,
    /// Linear RGBA clear color.
    pub clear_color: [f64; 4],
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            point_size: 0.1,
            opacity: 0.8,
            blend_mode: BlendMode::Additive,
            depth_write: false,
            fog: Some(Fog::default()),
            camera: CameraConfig::default(),
            max_pixel_ratio: 2.0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl VisualConfig {
    /// Set the blend mode.
    pub fn blend_mode(&mut self, mode: BlendMode) -> &mut Self {
        self.blend_mode = mode;
        self
    }

    /// Set the sprite size in world units.
    pub fn point_size(&mut self, size: f32) -> &mut Self {
        self.point_size = size.max(0.0);
        self
    }

    /// Set the global opacity (clamped to 0.0-1.0).
    pub fn opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set or clear the fog.
    pub fn fog(&mut self, fog: Option<Fog>) -> &mut Self {
        self.fog = fog;
        self
    }

    /// Reject settings the renderer cannot draw with.
    ///
    /// Config files bypass the clamping setters, so this is checked at load.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |name: &'static str, value: f32| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidVisual { name, value })
        };
        let camera = &self.camera;

        if !(0.0..=1.0).contains(&self.opacity) {
            return invalid("opacity", self.opacity);
        }
        if !self.point_size.is_finite() || self.point_size < 0.0 {
            return invalid("point_size", self.point_size);
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid("camera.fov_degrees", camera.fov_degrees);
        }
        if !(camera.near.is_finite() && camera.near > 0.0) {
            return invalid("camera.near", camera.near);
        }
        if !(camera.far.is_finite() && camera.far > camera.near) {
            return invalid("camera.far", camera.far);
        }
        if !camera.distance.is_finite() {
            return invalid("camera.distance", camera.distance);
        }
        if !(self.max_pixel_ratio.is_finite() && self.max_pixel_ratio > 0.0) {
            return invalid("max_pixel_ratio", self.max_pixel_ratio as f32);
        }
        if let Some(fog) = &self.fog {
            if !(fog.density.is_finite() && fog.density >= 0.0) {
                return invalid("fog.density", fog.density);
            }
        }
        Ok(())
    }

    /// Pixel ratio actually used for a display reporting `scale_factor`.
    pub fn pixel_ratio(&self, scale_factor: f64) -> f64 {
        scale_factor.min(self.max_pixel_ratio).max(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let v = VisualConfig::default();
        assert_eq!(v.blend_mode, BlendMode::Additive);
        assert!(!v.depth_write);
        assert_eq!(v.point_size, 0.1);
        assert_eq!(v.opacity, 0.8);
        assert_eq!(v.camera.distance, 8.0);
    }

    #[test]
    fn test_fog_factor() {
        let fog = Fog::default();
        assert_eq!(fog.factor(0.0), 0.0);
        let at_camera_distance = fog.factor(8.0);
        assert!(at_camera_distance > 0.05 && at_camera_distance < 0.06);
        assert!(fog.factor(100.0) > 0.99);
    }

    #[test]
    fn test_pixel_ratio_capped() {
        let v = VisualConfig::default();
        assert_eq!(v.pixel_ratio(1.0), 1.0);
        assert_eq!(v.pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn test_camera_sees_origin() {
        let cam = CameraConfig::default();
        let clip = cam.projection(16.0 / 9.0) * cam.view_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(VisualConfig::default().validate().is_ok());

        let mut v = VisualConfig::default();
        v.opacity = 5.0;
        assert!(matches!(v.validate(), Err(ConfigError::InvalidVisual { name: "opacity", .. })));

        let mut v = VisualConfig::default();
        v.point_size = -1.0;
        assert!(matches!(v.validate(), Err(ConfigError::InvalidVisual { name: "point_size", .. })));

        let mut v = VisualConfig::default();
        v.camera.fov_degrees = 0.0;
        assert!(matches!(
            v.validate(),
            Err(ConfigError::InvalidVisual { name: "camera.fov_degrees", .. })
        ));

        let mut v = VisualConfig::default();
        v.camera.near = 0.0;
        assert!(matches!(v.validate(), Err(ConfigError::InvalidVisual { name: "camera.near", .. })));

        let mut v = VisualConfig::default();
        v.camera.far = 0.05;
        assert!(matches!(v.validate(), Err(ConfigError::InvalidVisual { name: "camera.far", .. })));

        let mut v = VisualConfig::default();
        v.max_pixel_ratio = 0.0;
        assert!(matches!(
            v.validate(),
            Err(ConfigError::InvalidVisual { name: "max_pixel_ratio", .. })
        ));

        let mut v = VisualConfig::default();
        v.fog(Some(Fog { color: [0.0; 3], density: -0.1 }));
        assert!(matches!(v.validate(), Err(ConfigError::InvalidVisual { name: "fog.density", .. })));
    }

    #[test]
    fn test_partial_fog_uses_defaults() {
        let fog: Fog = serde_json::from_str(r#"{ "density": 0.05 }"#).unwrap();
        assert_eq!(fog.density, 0.05);
        assert_eq!(fog.color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_builder_clamps() {
        let mut v = VisualConfig::default();
        v.opacity(1.5).point_size(-1.0).blend_mode(BlendMode::Alpha);
        assert_eq!(v.opacity, 1.0);
        assert_eq!(v.point_size, 0.0);
        assert_eq!(v.blend_mode, BlendMode::Alpha);
    }
}
