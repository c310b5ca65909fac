//! Browser viewport measurements

/// Viewport size in CSS pixels plus the device pixel ratio
///
/// The overlay is laid out in CSS pixels while the drawing buffer (and the
/// shader's `iResolution`) uses physical pixels, so both are derived here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: f64,
    /// Height in CSS pixels
    pub height: f64,
    /// Physical pixels per CSS pixel
    pub device_pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Drawing buffer size in physical pixels, never smaller than 1x1
    pub fn drawing_size(&self) -> (u32, u32) {
        let ratio = if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        (to_pixels(self.width * ratio), to_pixels(self.height * ratio))
    }

    /// Value for the shader's `iResolution` input: `(width, height, 1.0)`
    pub fn resolution(&self) -> [f32; 3] {
        let (width, height) = self.drawing_size();
        [width as f32, height as f32, 1.0]
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value >= 1.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        1
    }
}
