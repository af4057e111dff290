//! # particle-morph
//!
//! A particle field that morphs from a scattered cloud into a Fibonacci
//! sphere as a progress value goes from 0 to 1.
//!
//! Each particle gets a random start point inside a cube, a target point on an
//! evenly spread sphere and a color blended along its index. Every frame the
//! field interpolates between the two and adds a small time-varying wobble
//! that calms down as the sphere forms.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_morph::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     particle_morph::run(ViewerConfig::default())
//! }
//! ```
//!
//! ## Headless use
//!
//! The field and the frame loop do not need a window. Anything that
//! implements [`DisplaySurface`] can consume frames:
//!
//! ```
//! use particle_morph::prelude::*;
//!
//! struct Count(usize);
//!
//! impl DisplaySurface for Count {
//!     type Error = ();
//!     fn present(&mut self, frame: &Frame<'_>) -> Result<(), ()> {
//!         self.0 += frame.positions.len();
//!         Ok(())
//!     }
//! }
//!
//! let field = ParticleField::new(FieldConfig::default().with_particle_count(100)).unwrap();
//! let mut looper = RenderLoop::new(field, ConstantProgress(0.5));
//! let mut surface = Count(0);
//! looper.step(1.0 / 60.0, &mut surface).unwrap();
//! assert_eq!(surface.0, 100);
//! ```
//!
//! ## Progress
//!
//! | Source | Behavior |
//! |--------|----------|
//! | [`ConstantProgress`] | Fixed value, useful for stills and tests |
//! | [`ScrollProgress`] | Scroll offset over the page, lagged and eased |

pub mod config;
pub mod distribution;
pub mod error;
pub mod field;
mod gpu;
pub mod progress;
pub mod render_loop;
pub mod sprite;
pub mod time;
pub mod visuals;
mod window;

pub use config::{FieldConfig, ScrollConfig, ViewerConfig};
pub use distribution::{DistributedPoint, PointDistributor};
pub use error::{ColorParseError, ConfigError, GpuError, RunError, TextureError};
pub use field::ParticleField;
pub use glam::{Mat4, Vec3};
pub use gpu::GpuSurface;
pub use progress::{ConstantProgress, Ease, ProgressSource, ScrollProgress};
pub use render_loop::{AutoRotation, DisplaySurface, Frame, RenderLoop};
pub use sprite::SpriteTexture;
pub use time::Time;
pub use visuals::{BlendMode, CameraConfig, Fog, VisualConfig};
pub use window::run;

/// Convenient re-exports for typical use.
pub mod prelude {
    pub use crate::config::{FieldConfig, ScrollConfig, ViewerConfig};
    pub use crate::error::{ConfigError, RunError};
    pub use crate::field::ParticleField;
    pub use crate::progress::{ConstantProgress, Ease, ProgressSource, ScrollProgress};
    pub use crate::render_loop::{AutoRotation, DisplaySurface, Frame, RenderLoop};
    pub use crate::sprite::SpriteTexture;
    pub use crate::time::Time;
    pub use crate::visuals::{BlendMode, VisualConfig};
    pub use crate::{Mat4, Vec3};
}
