//! Error types for particle-morph.
//!
//! Configuration, color parsing and sprite loading fail at startup only.
//! GPU and windowing errors are confined to the viewer.

use std::fmt;

/// Errors produced while parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string (without `#`) was not 3 or 6 hex digits long.
    InvalidLength(usize),
    /// A character was not a hexadecimal digit.
    InvalidDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidLength(len) => {
                write!(f, "Hex color must have 3 or 6 digits, got {}", len)
            }
            ColorParseError::InvalidDigit(c) => write!(f, "Invalid hex digit '{}' in color", c),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Errors that make a configuration unusable.
#[derive(Debug)]
pub enum ConfigError {
    /// Particle count must be at least one.
    InvalidParticleCount,
    /// A radius was zero, negative or not finite.
    InvalidRadius { name: &'static str, value: f32 },
    /// A color had a non-finite component.
    InvalidColor { name: &'static str },
    /// A scroll parameter was zero, negative or not finite.
    InvalidScroll { name: &'static str, value: f32 },
    /// The scroll lag was negative or not finite.
    InvalidLag(f32),
    /// A visual setting was outside its usable range.
    InvalidVisual { name: &'static str, value: f32 },
    /// Failed to read the config file.
    Io(std::io::Error),
    /// Failed to parse the config file. Malformed hex colors land here too.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParticleCount => write!(f, "Particle count must be greater than zero"),
            ConfigError::InvalidRadius { name, value } => {
                write!(f, "{} must be a positive finite number, got {}", name, value)
            }
            ConfigError::InvalidColor { name } => write!(f, "{} has a non-finite component", name),
            ConfigError::InvalidScroll { name, value } => {
                write!(f, "{} must be a positive finite number, got {}", name, value)
            }
            ConfigError::InvalidLag(value) => {
                write!(f, "lag_seconds must be a non-negative finite number, got {}", value)
            }
            ConfigError::InvalidVisual { name, value } => {
                write!(f, "{} is out of range, got {}", name, value)
            }
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur while loading or saving a sprite texture.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode or encode the image.
    ImageLoad(image::ImageError),
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// Raw RGBA data did not match the declared dimensions.
    InvalidSize { expected: usize, got: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            TextureError::Io(e) => write!(f, "Failed to read texture file: {}", e),
            TextureError::InvalidSize { expected, got } => {
                write!(f, "RGBA data size mismatch: expected {} bytes, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
            TextureError::InvalidSize { .. } => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reported no supported formats for the adapter.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::UnsupportedSurface => write!(f, "Surface is not supported by the selected adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the viewer.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// The configuration was rejected.
    Config(ConfigError),
    /// The custom sprite could not be loaded.
    Texture(TextureError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Config(e) => write!(f, "Configuration error: {}", e),
            RunError::Texture(e) => write!(f, "Sprite error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Config(e) => Some(e),
            RunError::Texture(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<TextureError> for RunError {
    fn from(e: TextureError) -> Self {
        RunError::Texture(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidRadius { name: "sphere_radius", value: -1.0 };
        assert_eq!(
            err.to_string(),
            "sphere_radius must be a positive finite number, got -1"
        );
    }

    #[test]
    fn test_io_error_is_source() {
        let err: ConfigError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_lag_error_says_non_negative() {
        let err = ConfigError::InvalidLag(-1.0);
        assert_eq!(
            err.to_string(),
            "lag_seconds must be a non-negative finite number, got -1"
        );
    }
}
