//! Shader program inputs
//!
//! The names below are the wire contract with the GPU program. The WGSL
//! uniform block in [`crate::gpu`] declares fields with exactly these names.

use crate::config::RainConfig;
use crate::viewport::Viewport;

/// Scaled elapsed time in seconds
pub const INPUT_TIME: &str = "iTime";
/// Drawing buffer size as `(width, height, 1.0)`
pub const INPUT_RESOLUTION: &str = "iResolution";
/// Rain density, `drops_count / 150`
pub const INPUT_RAIN_AMOUNT: &str = "rainAmount";
/// Glass blur strength
pub const INPUT_GLASS_BLUR: &str = "glassBlur";
/// Background texture sampled behind the glass
pub const INPUT_CHANNEL0: &str = "iChannel0";

/// Every input the program declares, texture included
pub const ALL_INPUTS: [&str; 5] = [
    INPUT_TIME,
    INPUT_RESOLUTION,
    INPUT_RAIN_AMOUNT,
    INPUT_GLASS_BLUR,
    INPUT_CHANNEL0,
];

/// Scalar and vector inputs pushed to the shader program
///
/// The texture input (`iChannel0`) is bound separately through
/// [`crate::hal::RenderSession::bind_texture`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderInputs {
    pub time: f32,
    pub resolution: [f32; 3],
    pub rain_amount: f32,
    pub glass_blur: f32,
}

impl Default for ShaderInputs {
    fn default() -> Self {
        Self::new(&RainConfig::default(), Viewport::default())
    }
}

impl ShaderInputs {
    /// Inputs at construction time: zero time, current viewport, config-derived scalars
    pub fn new(config: &RainConfig, viewport: Viewport) -> Self {
        Self {
            time: 0.0,
            resolution: viewport.resolution(),
            rain_amount: config.rain_amount(),
            glass_blur: config.glass_blur,
        }
    }

    /// Refresh the config-derived scalars, leaving time and resolution alone
    pub fn apply_config(&mut self, config: &RainConfig) {
        self.rain_amount = config.rain_amount();
        self.glass_blur = config.glass_blur;
    }
}
