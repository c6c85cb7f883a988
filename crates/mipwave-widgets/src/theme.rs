//! Named waveform colors

use mipwave_core::Color;

/// Colors selectable by name (e.g. from the command line)
pub const NAMED_COLORS: [(&str, Color); 6] = [
    ("blue", Color::BLUE),
    ("cyan", Color::CYAN),
    ("red", Color::RED),
    ("white", Color::WHITE),
    ("green", Color::from_rgb(0.2, 0.8, 0.4)),
    ("orange", Color::from_rgb(1.0, 0.6, 0.0)),
];

/// Look up a named color (case-insensitive)
pub fn color_by_name(name: &str) -> Option<Color> {
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, color)| color)
}
