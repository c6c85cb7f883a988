//! Core types and constants shared across mipwave crates

use serde::{Deserialize, Serialize};

/// Sample rate assumed for playback-indicator math when the decoder
/// doesn't supply one
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Maximum number of render submissions allowed in flight at once
pub const MAX_FRAMES_IN_FLIGHT: usize = 3;

/// Group size used when reducing one pyramid level into the next
pub const BIN_SIZE: usize = 2;

/// Levels stop halving once they reach this length or shorter
pub const TERMINAL_LEVEL_LEN: usize = 2;

/// RGBA color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::from_rgb(1.0, 1.0, 1.0);
    pub const BLUE: Color = Color::from_rgb(0.0, 0.48, 1.0);
    pub const CYAN: Color = Color::from_rgb(0.2, 0.68, 0.9);
    pub const RED: Color = Color::from_rgb(1.0, 0.23, 0.19);

    /// Opaque color from RGB components
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from RGBA components
    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Packed `[r, g, b, a]` for GPU uniforms
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// 8-bit RGB triple, clamped
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLUE
    }
}

/// Parameters defining the look of the waveform and the indicator time base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConstants {
    /// Sample rate used to convert playback time into a sample index
    pub sample_rate: f64,
    /// Foreground color of the envelope
    pub color: Color,
}

impl RenderConstants {
    /// Constants with the given color and the default sample rate
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

impl Default for RenderConstants {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            color: Color::default(),
        }
    }
}
