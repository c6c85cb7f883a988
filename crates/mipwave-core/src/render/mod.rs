//! Render seam between the envelope engine and a drawing backend
//!
//! The host drives a [`RenderSink`] (resize and draw notifications). The
//! sink implementation, [`WaveformRenderer`], owns the session state and
//! hands each frame to a [`RenderBackend`] together with a [`FramePermit`]
//! from the frame gate.

mod frame;
mod renderer;

pub use frame::{Frame, FrameUniforms};
pub use renderer::WaveformRenderer;

use crate::error::RenderResult;
use crate::pacing::FramePermit;

/// Drawable size in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Per-draw information supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub surface: SurfaceSize,
}

impl FrameContext {
    pub fn new(surface: SurfaceSize) -> Self {
        Self { surface }
    }
}

/// Summary of a frame handed to the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Submission {
    /// Sequence number, increasing in draw order
    pub frame: u64,
    /// Pyramid level drawn
    pub level: usize,
    /// First bin drawn
    pub offset: usize,
    /// Number of bins drawn
    pub count: usize,
    /// Indicator x position in pixels, if visible
    pub indicator_x: Option<f32>,
}

/// Host-facing render callbacks
pub trait RenderSink {
    /// Drawable size changed
    fn on_resize(&mut self, size: SurfaceSize);

    /// Draw one frame
    ///
    /// Returns `Ok(None)` when there is nothing to draw; no capacity is
    /// taken in that case.
    fn on_draw(&mut self, ctx: FrameContext) -> RenderResult<Option<Submission>>;
}

/// Drawing backend (GPU queue, terminal, test recorder, ...)
pub trait RenderBackend {
    /// Execute `frame`
    ///
    /// The backend owns `permit` from here on and must drop it only once
    /// the frame's work has completed. Returning an error drops the permit
    /// right away.
    fn submit(&mut self, frame: Frame, permit: FramePermit) -> RenderResult<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn submit(&mut self, frame: Frame, permit: FramePermit) -> RenderResult<()> {
        (**self).submit(frame, permit)
    }
}
