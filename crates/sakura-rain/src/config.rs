//! Rain effect configuration

use serde::{Deserialize, Serialize};

/// Number of drops used when the theme does not set one
pub const DEFAULT_DROPS_COUNT: u32 = 100;

/// Animation speed used when the theme does not set one
pub const DEFAULT_SPEED: f32 = 5.0;

/// Glass blur strength used when the page does not set one
pub const DEFAULT_GLASS_BLUR: f32 = 0.3;

/// Drop count that maps to a `rainAmount` of exactly 1.0
pub const DROPS_PER_RAIN_UNIT: f32 = 150.0;

/// Speed at which shader time advances at wall-clock rate
pub const REFERENCE_SPEED: f32 = 5.0;

/// Rain effect configuration
///
/// Always valid: constructors and [`RainConfig::merge`] sanitize every field,
/// so a partially invalid configuration cannot be observed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RainConfigPatch")]
pub struct RainConfig {
    /// Number of drops; drives the shader's rain density
    pub drops_count: u32,
    /// Animation speed, strictly positive
    pub speed: f32,
    /// Glass blur strength in `[0, 1]`
    pub glass_blur: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            drops_count: DEFAULT_DROPS_COUNT,
            speed: DEFAULT_SPEED,
            glass_blur: DEFAULT_GLASS_BLUR,
        }
    }
}

impl RainConfig {
    /// Create a sanitized configuration
    pub fn new(drops_count: u32, speed: f32, glass_blur: f32) -> Self {
        Self {
            drops_count,
            speed: sanitize_speed(speed),
            glass_blur: sanitize_glass_blur(glass_blur),
        }
    }

    /// Rain density fed to the shader (`drops_count / 150`)
    #[inline]
    pub fn rain_amount(&self) -> f32 {
        self.drops_count as f32 / DROPS_PER_RAIN_UNIT
    }

    /// Factor applied to elapsed seconds before it reaches the shader
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.speed / REFERENCE_SPEED
    }

    /// Merge the fields present in `patch`, sanitizing each one
    pub fn merge(&mut self, patch: &RainConfigPatch) {
        if let Some(drops_count) = patch.drops_count {
            self.drops_count = drops_count;
        }
        if let Some(speed) = patch.speed {
            self.speed = sanitize_speed(speed);
        }
        if let Some(glass_blur) = patch.glass_blur {
            self.glass_blur = sanitize_glass_blur(glass_blur);
        }
    }
}

/// Partial configuration update
///
/// Deserializes from the same camelCase keys JavaScript uses
/// (`{"dropsCount": 300}`); missing keys leave the field untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RainConfigPatch {
    pub drops_count: Option<u32>,
    pub speed: Option<f32>,
    pub glass_blur: Option<f32>,
}

impl RainConfigPatch {
    /// Parse a patch from a JSON object
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True if the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self.drops_count.is_none() && self.speed.is_none() && self.glass_blur.is_none()
    }
}

impl From<RainConfig> for RainConfigPatch {
    fn from(config: RainConfig) -> Self {
        Self {
            drops_count: Some(config.drops_count),
            speed: Some(config.speed),
            glass_blur: Some(config.glass_blur),
        }
    }
}

/// Missing fields take their defaults; present ones are sanitized
impl From<RainConfigPatch> for RainConfig {
    fn from(patch: RainConfigPatch) -> Self {
        let mut config = RainConfig::default();
        config.merge(&patch);
        config
    }
}

fn sanitize_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        DEFAULT_SPEED
    }
}

fn sanitize_glass_blur(glass_blur: f32) -> f32 {
    if glass_blur.is_finite() {
        glass_blur.clamp(0.0, 1.0)
    } else {
        DEFAULT_GLASS_BLUR
    }
}
