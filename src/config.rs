//! Startup configuration.
//!
//! [`FieldConfig`] fixes everything the particle field needs: how many
//! particles, the two radii and the two gradient colors. [`ScrollConfig`]
//! describes the virtual page the viewer scrolls through, and
//! [`ViewerConfig`] bundles both with the visual style for the binary.
//!
//! Configs are plain values. Nothing mutates them at runtime; to change one,
//! rebuild the field with [`ParticleField::reinitialize`](crate::ParticleField::reinitialize).
//!
//! # Example
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_particle_count(2_000)
//!     .with_sphere_radius(3.0)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ColorParseError, ConfigError};
use crate::progress::Ease;
use crate::visuals::VisualConfig;

/// Parameters of the particle field, fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles (must be > 0).
    pub particle_count: u32,
    /// Radius of the target sphere.
    pub sphere_radius: f32,
    /// Edge length of the cube the scattered cloud is drawn from.
    pub scatter_radius: f32,
    /// Gradient color of the first particle (linear RGB).
    #[serde(with = "hex_color")]
    pub primary_color: Vec3,
    /// Gradient color approached by the last particle (linear RGB).
    #[serde(with = "hex_color")]
    pub secondary_color: Vec3,
    /// Seed for the scattered cloud. `None` draws a fresh cloud every run.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 4000,
            sphere_radius: 2.2,
            scatter_radius: 25.0,
            // #0066ff
            primary_color: Vec3::new(0.0, srgb_to_linear(0x66 as f32 / 255.0), 1.0),
            // #ffffff
            secondary_color: Vec3::ONE,
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the radius of the target sphere.
    pub fn with_sphere_radius(mut self, radius: f32) -> Self {
        self.sphere_radius = radius;
        self
    }

    /// Set the extent of the scattered cloud.
    pub fn with_scatter_radius(mut self, radius: f32) -> Self {
        self.scatter_radius = radius;
        self
    }

    /// Set both gradient colors (linear RGB, 0.0-1.0).
    pub fn with_colors(mut self, primary: Vec3, secondary: Vec3) -> Self {
        self.primary_color = primary;
        self.secondary_color = secondary;
        self
    }

    /// Make the scattered cloud reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter, failing on the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::InvalidParticleCount);
        }
        check_positive("sphere_radius", self.sphere_radius).map_err(radius_error)?;
        check_positive("scatter_radius", self.scatter_radius).map_err(radius_error)?;
        if !self.primary_color.is_finite() {
            return Err(ConfigError::InvalidColor { name: "primary_color" });
        }
        if !self.secondary_color.is_finite() {
            return Err(ConfigError::InvalidColor { name: "secondary_color" });
        }
        Ok(())
    }
}

/// The virtual page the viewer scrolls through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Total page height in pixels.
    pub page_height: f32,
    /// Visible height in pixels. Scrollable distance is `page_height - viewport_height`.
    pub viewport_height: f32,
    /// Seconds the smoothed progress takes to catch up with the scroll position.
    pub lag_seconds: f32,
    /// Easing applied to the smoothed progress.
    pub ease: Ease,
    /// Pixels scrolled per mouse wheel line.
    pub line_height: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            page_height: 4000.0,
            viewport_height: 800.0,
            lag_seconds: 1.5,
            ease: Ease::Power1InOut,
            line_height: 40.0,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("page_height", self.page_height).map_err(scroll_error)?;
        check_positive("viewport_height", self.viewport_height).map_err(scroll_error)?;
        check_positive("line_height", self.line_height).map_err(scroll_error)?;
        if !self.lag_seconds.is_finite() || self.lag_seconds < 0.0 {
            return Err(ConfigError::InvalidLag(self.lag_seconds));
        }
        Ok(())
    }
}

/// Everything the windowed viewer reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub field: FieldConfig,
    pub visuals: VisualConfig,
    pub scroll: ScrollConfig,
    /// Optional PNG/JPEG replacing the generated glow sprite.
    pub sprite_path: Option<PathBuf>,
}

impl ViewerConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        self.scroll.validate()?;
        self.visuals.validate()
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<(), (&'static str, f32)> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err((name, value))
    }
}

fn radius_error((name, value): (&'static str, f32)) -> ConfigError {
    ConfigError::InvalidRadius { name, value }
}

fn scroll_error((name, value): (&'static str, f32)) -> ConfigError {
    ConfigError::InvalidScroll { name, value }
}

/// Parse a `#rrggbb`, `rrggbb` or `#rgb` sRGB hex string into linear RGB.
pub fn parse_hex_color(s: &str) -> Result<Vec3, ColorParseError> {
    let digits = s.trim().trim_start_matches('#');
    let nibbles = digits
        .chars()
        .map(|c| c.to_digit(16).ok_or(ColorParseError::InvalidDigit(c)))
        .collect::<Result<Vec<u32>, _>>()?;

    let bytes: [u32; 3] = match nibbles.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17],
        [r1, r0, g1, g0, b1, b0] => [r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0],
        other => return Err(ColorParseError::InvalidLength(other.len())),
    };

    Ok(Vec3::new(
        srgb_to_linear(bytes[0] as f32 / 255.0),
        srgb_to_linear(bytes[1] as f32 / 255.0),
        srgb_to_linear(bytes[2] as f32 / 255.0),
    ))
}

/// Format a linear RGB color as an sRGB `#rrggbb` string.
pub fn to_hex_color(color: Vec3) -> String {
    let byte = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(color.x), byte(color.y), byte(color.z))
}

/// sRGB transfer function, encoded to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB transfer function, linear to encoded.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Serde adapter storing linear colors as sRGB hex strings.
mod hex_color {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}
