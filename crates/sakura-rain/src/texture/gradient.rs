//! Fallback gradient texture

use image::{Rgba, RgbaImage};

use super::{TextureImage, TextureSource};

/// Edge length of the square fallback texture
pub const GRADIENT_SIZE: u32 = 512;

/// Color at the top-left corner (sky blue, `#87CEEB`)
pub const GRADIENT_START: [u8; 3] = [0x87, 0xCE, 0xEB];

/// Color at the bottom-right corner (khaki, `#F0E68C`)
pub const GRADIENT_END: [u8; 3] = [0xF0, 0xE6, 0x8C];

/// Synthesize the 512x512 diagonal fallback gradient.
///
/// The gradient runs from the top-left corner to the bottom-right corner and
/// is evaluated at pixel centres, so every call yields identical pixels.
pub fn fallback_gradient() -> TextureImage {
    // Projection of a pixel centre onto the (1, 1) diagonal, normalized to [0, 1]
    let extent = (2 * GRADIENT_SIZE) as f32;

    let image = RgbaImage::from_fn(GRADIENT_SIZE, GRADIENT_SIZE, |x, y| {
        let t = (x as f32 + 0.5 + y as f32 + 0.5) / extent;
        Rgba([
            lerp_channel(GRADIENT_START[0], GRADIENT_END[0], t),
            lerp_channel(GRADIENT_START[1], GRADIENT_END[1], t),
            lerp_channel(GRADIENT_START[2], GRADIENT_END[2], t),
            u8::MAX,
        ])
    });

    TextureImage::new(image, TextureSource::Gradient)
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    let value = from as f32 + (to as f32 - from as f32) * t.clamp(0.0, 1.0);
    value.round() as u8
}
