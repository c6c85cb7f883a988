//! Frame payload handed to render backends

use crate::pyramid::Level;
use crate::render::SurfaceSize;
use crate::types::{Color, RenderConstants};
use crate::window::{LevelSlice, Viewport};

/// Uniform block for GPU backends
///
/// Layout matches a WGSL/MSL struct of the same field order (48 bytes).
/// `indicator_x` is negative when no indicator should be drawn.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub color: [f32; 4],
    /// [width, height] in device pixels
    pub surface: [f32; 2],
    pub bin_offset: u32,
    pub bin_count: u32,
    pub level: u32,
    pub indicator_x: f32,
    pub sample_rate: f32,
    pub _padding: u32,
}

/// Everything a backend needs to draw one frame
///
/// Holds its own handle on the level's storage, so replacing the pyramid
/// while the frame is in flight is safe.
#[derive(Debug, Clone)]
pub struct Frame {
    pub(crate) index: u64,
    pub(crate) level: Level,
    pub(crate) slice: LevelSlice,
    pub(crate) viewport: Viewport,
    pub(crate) surface: SurfaceSize,
    pub(crate) constants: RenderConstants,
    pub(crate) indicator: Option<usize>,
    pub(crate) indicator_x: Option<f32>,
}

impl Frame {
    /// Build a frame for `slice` of `level`
    ///
    /// The slice is clamped to the level so the bin accessors never read
    /// out of range.
    pub fn new(
        index: u64,
        level: Level,
        slice: LevelSlice,
        viewport: Viewport,
        surface: SurfaceSize,
        constants: RenderConstants,
    ) -> Self {
        let offset = slice.offset.min(level.len());
        let count = slice.count.min(level.len() - offset);
        Self {
            index,
            slice: LevelSlice {
                offset,
                count,
                level_len: level.len(),
                ..slice
            },
            level,
            viewport,
            surface,
            constants,
            indicator: None,
            indicator_x: None,
        }
    }

    /// Attach a playback indicator (sample index and pixel position)
    pub fn with_indicator(mut self, sample: usize, x: Option<f32>) -> Self {
        self.indicator = Some(sample);
        self.indicator_x = x;
        self
    }

    /// Sequence number of this frame
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn slice(&self) -> &LevelSlice {
        &self.slice
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn color(&self) -> Color {
        self.constants.color
    }

    pub fn constants(&self) -> &RenderConstants {
        &self.constants
    }

    /// Number of visible bins
    pub fn bin_count(&self) -> usize {
        self.slice.count
    }

    /// Visible part of the level's min channel
    pub fn min_values(&self) -> &[f32] {
        &self.level.min_values()[self.slice.offset..self.slice.offset + self.slice.count]
    }

    /// Visible part of the level's max channel
    pub fn max_values(&self) -> &[f32] {
        &self.level.max_values()[self.slice.offset..self.slice.offset + self.slice.count]
    }

    /// Playback position as a level-0 sample index
    pub fn indicator_sample(&self) -> Option<usize> {
        self.indicator
    }

    /// Playback position in pixels, when inside the visible window
    pub fn indicator_x(&self) -> Option<f32> {
        self.indicator_x
    }

    /// Pack this frame's scalars for a GPU uniform buffer
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            color: self.constants.color.to_array(),
            surface: [self.surface.width as f32, self.surface.height as f32],
            bin_offset: saturating_u32(self.slice.offset),
            bin_count: saturating_u32(self.slice.count),
            level: saturating_u32(self.slice.level),
            indicator_x: self.indicator_x.unwrap_or(-1.0),
            sample_rate: self.constants.sample_rate as f32,
            _padding: 0,
        }
    }
}

/// Narrow an index for the uniform block, pinning at `u32::MAX`
fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
