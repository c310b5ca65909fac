//! Background textures sampled behind the glass
//!
//! A texture is either an image loaded from the page's background URL or a
//! procedurally generated gradient used whenever loading is impossible.
//! Both are stored as RGBA8 and share the same sampling description.

mod decode;
mod gradient;

use image::imageops::{self, FilterType};
use image::RgbaImage;

pub use decode::{decode, TextureError, MAX_TEXTURE_DIMENSION};
pub use gradient::{fallback_gradient, GRADIENT_END, GRADIENT_SIZE, GRADIENT_START};

/// Where the active texture came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureSource {
    /// Decoded from the page's background image
    Loaded { url: String },
    /// Synthesized fallback gradient
    Gradient,
}

/// Texel filtering mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Edge addressing mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
}

/// How the GPU samples a texture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampling {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    /// Filter between mip levels; `None` disables mipmapping
    pub mipmap_filter: Option<Filter>,
    pub wrap: Wrap,
}

/// Trilinear minification, linear magnification, clamped edges.
///
/// A full-screen background needs mipmaps for the blurred lookups and
/// clamping so no seam bleeds in from the opposite edge.
pub const BACKGROUND_SAMPLING: Sampling = Sampling {
    min_filter: Filter::Linear,
    mag_filter: Filter::Linear,
    mipmap_filter: Some(Filter::Linear),
    wrap: Wrap::ClampToEdge,
};

/// CPU-side texture ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    image: RgbaImage,
    source: TextureSource,
    sampling: Sampling,
}

impl TextureImage {
    /// Wrap an RGBA image, configured with [`BACKGROUND_SAMPLING`]
    pub fn new(image: RgbaImage, source: TextureSource) -> Self {
        Self {
            image,
            source,
            sampling: BACKGROUND_SAMPLING,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Base level pixels, tightly packed RGBA8 rows
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// True for the synthesized gradient
    pub fn is_fallback(&self) -> bool {
        self.source == TextureSource::Gradient
    }

    /// Number of levels in a full mip chain down to 1x1
    pub fn mip_level_count(&self) -> u32 {
        if self.sampling.mipmap_filter.is_none() {
            return 1;
        }
        let largest = self.width().max(self.height()).max(1);
        32 - largest.leading_zeros()
    }

    /// Base level followed by each successively halved level
    pub fn mip_chain(&self) -> Vec<RgbaImage> {
        let count = self.mip_level_count() as usize;
        let mut levels = Vec::with_capacity(count);
        levels.push(self.image.clone());

        for _ in 1..count {
            let Some(previous) = levels.last() else { break };
            let width = (previous.width() / 2).max(1);
            let height = (previous.height() / 2).max(1);
            let next = imageops::resize(previous, width, height, FilterType::Triangle);
            levels.push(next);
        }

        levels
    }
}
