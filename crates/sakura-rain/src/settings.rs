//! Reading rain settings from the theme and the page
//!
//! Theme values come back as loosely typed JSON: a flag may be `true`,
//! `1` or `"on"` and a count may be `300` or `"300"`. Anything that does not
//! parse falls back to the default for that field.

use serde_json::Value;

use crate::config::{RainConfig, DEFAULT_DROPS_COUNT, DEFAULT_GLASS_BLUR, DEFAULT_SPEED};
use crate::hal::PageHal;

/// Theme section holding every rain key
pub const THEME_SECTION: &str = "theme";
/// Master switch for the effect
pub const ENABLE_KEY: &str = "enable_rain_effect";
/// Number of drops
pub const DROPS_COUNT_KEY: &str = "rain_drops_count";
/// Animation speed
pub const SPEED_KEY: &str = "rain_speed";
/// Per-theme glass blur, set on `<body>`
pub const GLASS_BLUR_ATTRIBUTE: &str = "data-rain-glass-blur";
/// Background image URL, set on `<body>`
pub const BACKGROUND_URL_ATTRIBUTE: &str = "data-bg-url";

/// Snapshot of everything the effect reads from the page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainSettings {
    pub enabled: bool,
    pub config: RainConfig,
}

impl RainSettings {
    /// Read the theme keys and body attributes through the HAL
    pub fn read<H: PageHal>(hal: &H) -> Self {
        let enabled = hal
            .theme_setting(THEME_SECTION, ENABLE_KEY)
            .as_ref()
            .is_some_and(parse_flag);

        let drops_count = hal
            .theme_setting(THEME_SECTION, DROPS_COUNT_KEY)
            .as_ref()
            .and_then(parse_count)
            .unwrap_or(DEFAULT_DROPS_COUNT);

        let speed = hal
            .theme_setting(THEME_SECTION, SPEED_KEY)
            .as_ref()
            .and_then(parse_speed)
            .unwrap_or(DEFAULT_SPEED);

        let glass_blur = parse_glass_blur(hal.body_attribute(GLASS_BLUR_ATTRIBUTE).as_deref());

        Self {
            enabled,
            config: RainConfig::new(drops_count, speed, glass_blur),
        }
    }
}

/// Background URL from `<body>`, or `None` when absent or blank
pub fn background_url<H: PageHal>(hal: &H) -> Option<String> {
    hal.body_attribute(BACKGROUND_URL_ATTRIBUTE)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Truthiness of a theme flag
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Drop count from a number or numeric string; negatives are rejected and
/// fractions truncated
pub fn parse_count(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if n < 0.0 {
        return None;
    }
    Some(n.trunc().min(u32::MAX as f64) as u32)
}

/// Speed from a number or numeric string; must be strictly positive
pub fn parse_speed(value: &Value) -> Option<f32> {
    let n = number(value)? as f32;
    (n.is_finite() && n > 0.0).then_some(n)
}

/// Glass blur from the body attribute, 0.3 when absent or unparsable
pub fn parse_glass_blur(attribute: Option<&str>) -> f32 {
    attribute
        .and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_GLASS_BLUR)
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
