use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::visuals::VisualConfig;

pub const SPRITE_SHADER: &str = include_str!("sprite.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub fog_color: [f32; 3],
    pub fog_density: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub _padding: [f32; 2],
}

impl Uniforms {
    pub fn new(visuals: &VisualConfig, aspect: f32, model: Mat4) -> Self {
        let camera = &visuals.camera;
        let (fog_color, fog_density) = match visuals.fog {
            Some(fog) => (fog.color, fog.density),
            None => ([0.0; 3], 0.0),
        };

        // Attenuated point sizes are pixels per half viewport height at unit
        // depth. The quad is built in view space, so scale by tan(fov / 2).
        let half_fov_tan = (camera.fov_degrees.to_radians() * 0.5).tan();

        Self {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection(aspect).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            fog_color,
            fog_density,
            point_size: visuals.point_size * half_fov_tan,
            opacity: visuals.opacity,
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_sprite_shader_validates() {
        validate_wgsl(SPRITE_SHADER).unwrap();
    }

    #[test]
    fn test_uniform_size_is_aligned() {
        let size = std::mem::size_of::<Uniforms>();
        assert_eq!(size, 224);
        assert_eq!(size % 16, 0);
    }

    #[test]
    fn test_fog_disabled_zeroes_density() {
        let mut visuals = VisualConfig::default();
        visuals.fog(None);
        let u = Uniforms::new(&visuals, 1.0, Mat4::IDENTITY);
        assert_eq!(u.fog_density, 0.0);
        assert_eq!(u.opacity, 0.8);
    }
}
