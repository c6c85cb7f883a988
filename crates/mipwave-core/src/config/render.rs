//! Render configuration

use serde::{Deserialize, Serialize};

use super::io::ConfigFile;
use crate::types::{Color, RenderConstants, DEFAULT_SAMPLE_RATE, MAX_FRAMES_IN_FLIGHT};

/// Render configuration
///
/// The sample rate should come from whoever decoded the audio; the default
/// only exists so an indicator can be drawn before that information arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Sample rate of the source audio in Hz
    /// Default: 44100.0
    pub sample_rate: f64,

    /// Foreground color of the waveform envelope
    /// Default: blue
    pub color: Color,

    /// Capacity of the frame-pacing gate
    /// Values below 1 are treated as 1.
    /// Default: 3
    pub max_frames_in_flight: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            color: Color::default(),
            max_frames_in_flight: MAX_FRAMES_IN_FLIGHT,
        }
    }
}

impl RenderConfig {
    /// Render constants derived from this config
    pub fn constants(&self) -> RenderConstants {
        RenderConstants {
            sample_rate: self.sample_rate,
            color: self.color,
        }
    }

    /// Gate capacity, never zero
    pub fn gate_capacity(&self) -> usize {
        self.max_frames_in_flight.max(1)
    }
}

impl ConfigFile for RenderConfig {
    fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            fixes.push(format!(
                "sample_rate {} is not a positive rate, using {}",
                self.sample_rate, DEFAULT_SAMPLE_RATE
            ));
            self.sample_rate = DEFAULT_SAMPLE_RATE;
        }
        if self.max_frames_in_flight == 0 {
            fixes.push("max_frames_in_flight must be at least 1".to_string());
            self.max_frames_in_flight = 1;
        }
        fixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_capacity_never_zero() {
        let config = RenderConfig {
            max_frames_in_flight: 0,
            ..RenderConfig::default()
        };
        assert_eq!(config.gate_capacity(), 1);
    }

    #[test]
    fn test_constants_follow_config() {
        let config = RenderConfig {
            sample_rate: 48000.0,
            color: Color::RED,
            max_frames_in_flight: 3,
        };
        let constants = config.constants();
        assert_eq!(constants.sample_rate, 48000.0);
        assert_eq!(constants.color, Color::RED);
    }

    #[test]
    fn test_sanitize_reports_fixes() {
        let mut config = RenderConfig {
            sample_rate: f64::NAN,
            ..RenderConfig::default()
        };
        assert_eq!(config.sanitize().len(), 1);
        assert_eq!(config.sample_rate, DEFAULT_SAMPLE_RATE);

        let mut valid = RenderConfig::default();
        assert!(valid.sanitize().is_empty());
        assert_eq!(valid, RenderConfig::default());
    }
}
