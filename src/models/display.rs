//! Presentation state pushed to the render surface

use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_white(&self) -> bool {
        *self == Self::WHITE
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Everything the render surface shows for the latest probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Main widget text ("23" or "NA")
    pub text: String,
    /// Window title ("23ms" or "NA")
    pub title: String,
    /// Whether the latency tint was requested when this state was computed
    pub color_enabled: bool,
    /// Text color
    pub color: Rgb,
}

impl DisplayState {
    /// Text shown for any failed probe
    pub const NOT_AVAILABLE: &'static str = "NA";

    /// State shown before the first probe completes
    pub fn placeholder() -> Self {
        Self {
            text: "--".to_string(),
            title: crate::PKG_NAME.to_string(),
            color_enabled: false,
            color: Rgb::WHITE,
        }
    }

    /// State shown for any failed probe
    pub fn not_available(color_enabled: bool) -> Self {
        Self {
            text: Self::NOT_AVAILABLE.to_string(),
            title: Self::NOT_AVAILABLE.to_string(),
            color_enabled,
            color: Rgb::WHITE,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Toggles controlled from outside the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Tint successful latencies from white toward blue
    pub color_effect: bool,
    /// Draw the badge frame around the text
    pub skin: bool,
}

impl DisplaySettings {
    pub fn new(color_effect: bool, skin: bool) -> Self {
        Self { color_effect, skin }
    }
}
