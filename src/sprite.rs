//! Point sprite texture.
//!
//! Every particle is drawn as the same small glow: a radial gradient with an
//! opaque white core fading to transparent at the edge. [`SpriteTexture::glow`]
//! generates it procedurally; a PNG or JPEG can replace it via
//! [`SpriteTexture::from_file`].

use std::path::Path;

use crate::error::TextureError;

/// Default edge length of the generated glow, in pixels.
pub const DEFAULT_SPRITE_SIZE: u32 = 32;

/// Gradient stops of the glow as `(offset, [r, g, b, a])`, channels in 0.0-1.0.
const GLOW_STOPS: [(f32, [f32; 4]); 3] = [
    (0.0, [1.0, 1.0, 1.0, 1.0]),
    (0.4, [1.0, 1.0, 1.0, 0.3]),
    (1.0, [0.0, 0.0, 0.0, 0.0]),
];

/// RGBA8 image used as the particle sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTexture {
    /// Raw RGBA pixel data (width * height * 4 bytes), row-major.
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl SpriteTexture {
    /// Create a sprite from raw RGBA data.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::InvalidSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Radial glow of `size` x `size` pixels.
    ///
    /// Distance from the center is normalised so the gradient reaches its
    /// last stop at the middle of each edge; corners are fully transparent.
    pub fn glow(size: u32) -> Self {
        let size = size.max(1);
        let center = size as f32 / 2.0;
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let t = ((dx * dx + dy * dy).sqrt() / center).min(1.0);
                let rgba = sample_stops(&GLOW_STOPS, t);
                data.extend(rgba.iter().map(|c| (c * 255.0).round() as u8));
            }
        }

        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Load a sprite from an image file (PNG or JPEG).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// Write the sprite as a PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), TextureError> {
        image::save_buffer_with_format(
            path.as_ref(),
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

impl Default for SpriteTexture {
    fn default() -> Self {
        Self::glow(DEFAULT_SPRITE_SIZE)
    }
}

/// Piecewise-linear lookup into sorted gradient stops.
fn sample_stops(stops: &[(f32, [f32; 4])], t: f32) -> [f32; 4] {
    let (first_offset, first) = stops[0];
    if t <= first_offset {
        return first;
    }
    for pair in stops.windows(2) {
        let (a_offset, a) = pair[0];
        let (b_offset, b) = pair[1];
        if t <= b_offset {
            let span = (b_offset - a_offset).max(f32::EPSILON);
            let k = (t - a_offset) / span;
            return [
                a[0] + (b[0] - a[0]) * k,
                a[1] + (b[1] - a[1]) * k,
                a[2] + (b[2] - a[2]) * k,
                a[3] + (b[3] - a[3]) * k,
            ];
        }
    }
    stops[stops.len() - 1].1
}
