//! Terminal backend: renders the envelope as text rows

use std::io::{self, Write};

use mipwave_core::{Color, Frame, FramePermit, RenderBackend, RenderResult};

use crate::raster::rasterize_frame;

const FILL: char = '█';
const INDICATOR: char = '|';

/// Render (min, max) columns into `height` text rows
///
/// Row 0 is +1.0, the last row is -1.0. Values outside [-1, 1] are clamped.
/// Heights below 4 are raised to 4.
pub fn render_ascii(columns: &[(f32, f32)], height: usize) -> Vec<String> {
    let h = height.max(4);
    let mut lines = vec![vec![' '; columns.len()]; h];
    let to_row = |v: f32| -> usize {
        let clamped = v.clamp(-1.0, 1.0);
        let y = (0.5 - 0.5 * clamped) * (h as f32 - 1.0);
        y.round() as usize
    };

    for (x, &(min, max)) in columns.iter().enumerate() {
        let top = to_row(max);
        let bottom = to_row(min);
        let (a, b) = if top <= bottom { (top, bottom) } else { (bottom, top) };
        for row in lines.iter_mut().take(b + 1).skip(a) {
            row[x] = FILL;
        }
    }

    lines.into_iter().map(|row| row.into_iter().collect()).collect()
}

/// Draws frames as text, one character per pixel column
///
/// The frame's surface width is the number of character columns and its
/// height the number of rows.
pub struct TerminalBackend {
    ansi_color: bool,
    lines: Vec<String>,
    frames_drawn: u64,
}

impl TerminalBackend {
    pub fn new() -> Self {
        Self {
            ansi_color: false,
            lines: Vec::new(),
            frames_drawn: 0,
        }
    }

    /// Wrap output in a 24-bit ANSI color escape of the frame color
    pub fn with_ansi_color(mut self, enabled: bool) -> Self {
        self.ansi_color = enabled;
        self
    }

    /// Rows of the last drawn frame
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Write the last frame to `out`
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    fn colorize(line: String, color: Color) -> String {
        let [r, g, b] = color.to_rgb8();
        format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, line)
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for TerminalBackend {
    fn submit(&mut self, frame: Frame, permit: FramePermit) -> RenderResult<()> {
        let surface = frame.surface();
        let columns = rasterize_frame(&frame, surface.width as usize);
        let mut rows: Vec<Vec<char>> = render_ascii(&columns, surface.height as usize)
            .into_iter()
            .map(|line| line.chars().collect())
            .collect();

        if let Some(x) = frame.indicator_x() {
            let col = (x.max(0.0) as usize).min(columns.len().saturating_sub(1));
            for row in rows.iter_mut() {
                if let Some(cell) = row.get_mut(col) {
                    *cell = INDICATOR;
                }
            }
        }

        let color = frame.color();
        self.lines = rows
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .map(|line| {
                if self.ansi_color {
                    Self::colorize(line, color)
                } else {
                    line
                }
            })
            .collect();
        self.frames_drawn += 1;

        log::debug!(
            "Terminal frame {}: level {} with {} bins over {} columns",
            frame.index(),
            frame.slice().level,
            frame.bin_count(),
            columns.len()
        );

        // Drawing is synchronous; the frame is complete here
        permit.complete();
        Ok(())
    }
}
