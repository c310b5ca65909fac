//! Decoding fetched background images

use std::fmt;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{TextureImage, TextureSource};

/// Largest texture edge accepted by the WebGL2 downlevel limits
pub const MAX_TEXTURE_DIMENSION: u32 = 2048;

/// Why fetched bytes could not become a texture
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureError {
    /// Response body was empty
    Empty,
    /// Bytes are not in a recognized image format
    UnknownFormat,
    /// Format recognized but decoding failed
    Decode(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Empty => write!(f, "empty image data"),
            TextureError::UnknownFormat => write!(f, "unrecognized image format"),
            TextureError::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {}

/// Decode image bytes fetched from `url` into a texture.
///
/// Images larger than [`MAX_TEXTURE_DIMENSION`] on either edge are scaled
/// down, keeping their aspect ratio.
pub fn decode(bytes: &[u8], url: &str) -> Result<TextureImage, TextureError> {
    if bytes.is_empty() {
        return Err(TextureError::Empty);
    }

    let format = image::guess_format(bytes).map_err(|_| TextureError::UnknownFormat)?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| TextureError::Decode(e.to_string()))?;

    let rgba = fit_within(decoded.to_rgba8(), MAX_TEXTURE_DIMENSION);

    Ok(TextureImage::new(
        rgba,
        TextureSource::Loaded {
            url: url.to_string(),
        },
    ))
}

fn fit_within(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return image;
    }

    let scale = max_dimension as f64 / width.max(height) as f64;
    let scaled_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
    let scaled_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);

    imageops::resize(&image, scaled_width, scaled_height, FilterType::Triangle)
}
