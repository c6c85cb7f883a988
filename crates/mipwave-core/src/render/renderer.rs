//! Waveform renderer session
//!
//! Owns everything one waveform view needs between redraws: the sample
//! buffer, the pyramid derived from it, the visible window, render constants
//! and the playback indicator. State is changed through explicit setters; the
//! pyramid is rebuilt synchronously whenever the sample buffer is replaced.

use std::sync::Arc;

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::pacing::FrameGate;
use crate::pyramid::Pyramid;
use crate::render::{Frame, FrameContext, RenderBackend, RenderSink, Submission, SurfaceSize};
use crate::sample_buffer::SampleBuffer;
use crate::types::RenderConstants;
use crate::window::{indicator_index, indicator_pixel, map_window, Viewport};

/// Render session for one waveform view
pub struct WaveformRenderer<B: RenderBackend> {
    backend: B,
    gate: FrameGate,
    constants: RenderConstants,
    samples: SampleBuffer,
    pyramid: Arc<Pyramid>,
    viewport: Viewport,
    current_time: Option<f64>,
    indicator: Option<usize>,
    surface: SurfaceSize,
    next_frame: u64,
}

impl<B: RenderBackend> WaveformRenderer<B> {
    /// Create a renderer drawing through `backend`
    pub fn new(backend: B, config: &RenderConfig) -> Self {
        Self {
            backend,
            gate: FrameGate::new(config.gate_capacity()),
            constants: config.constants(),
            samples: SampleBuffer::default(),
            pyramid: Arc::new(Pyramid::default()),
            viewport: Viewport::default(),
            current_time: None,
            indicator: None,
            surface: SurfaceSize::default(),
            next_frame: 0,
        }
    }

    /// Create a renderer with a backend that may fail to initialize
    ///
    /// Any factory error is reported as [`RenderError::BackendUnavailable`].
    pub fn with_backend<F>(config: &RenderConfig, factory: F) -> RenderResult<Self>
    where
        F: FnOnce() -> RenderResult<B>,
    {
        let backend = factory().map_err(|e| {
            log::error!("Render backend initialization failed: {}", e);
            match e {
                RenderError::BackendUnavailable(reason) => RenderError::BackendUnavailable(reason),
                other => RenderError::BackendUnavailable(other.to_string()),
            }
        })?;
        Ok(Self::new(backend, config))
    }

    // =========================================================================
    // Session state
    // =========================================================================

    /// Replace the sample buffer and rebuild the pyramid
    ///
    /// Assigning the buffer that is already loaded (same storage) keeps the
    /// existing pyramid. A new buffer resets the window to the full
    /// recording.
    pub fn set_samples(&mut self, samples: SampleBuffer) {
        if self.samples.ptr_eq(&samples) && self.pyramid.sample_count() == samples.len() {
            return;
        }

        log::info!("Loading {} samples into waveform renderer", samples.len());
        self.pyramid = Arc::new(Pyramid::build(&samples));
        self.viewport = Viewport::full(samples.len());
        self.samples = samples;
        self.refresh_indicator();
    }

    /// Update samples, visible window and playback time in one go
    ///
    /// `length == 0` shows everything from `start` to the end.
    pub fn set(
        &mut self,
        samples: SampleBuffer,
        start: usize,
        length: usize,
        current_time: Option<f64>,
    ) {
        self.set_samples(samples);
        self.viewport = Viewport::resolve(start, length, self.samples.len());
        self.set_current_time(current_time);
    }

    /// Set the visible window (clamped to the recording)
    pub fn set_window(&mut self, viewport: Viewport) {
        self.viewport = viewport.clamped(self.samples.len());
    }

    /// Set or clear the playback time (seconds)
    pub fn set_current_time(&mut self, current_time: Option<f64>) {
        self.current_time = current_time;
        self.refresh_indicator();
    }

    pub fn set_constants(&mut self, constants: RenderConstants) {
        self.constants = constants;
        self.refresh_indicator();
    }

    fn refresh_indicator(&mut self) {
        self.indicator = self.current_time.and_then(|time| {
            indicator_index(time, self.constants.sample_rate, self.samples.len())
        });
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn pyramid(&self) -> &Arc<Pyramid> {
        &self.pyramid
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn constants(&self) -> &RenderConstants {
        &self.constants
    }

    /// Playback position as a sample index, if a current time is set
    pub fn indicator(&self) -> Option<usize> {
        self.indicator
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn gate(&self) -> &FrameGate {
        &self.gate
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Draw at the last size reported through `on_resize`
    pub fn draw(&mut self) -> RenderResult<Option<Submission>> {
        self.on_draw(FrameContext::new(self.surface))
    }
}

impl<B: RenderBackend> RenderSink for WaveformRenderer<B> {
    fn on_resize(&mut self, size: SurfaceSize) {
        log::debug!("Waveform surface resized to {}x{}", size.width, size.height);
        self.surface = size;
    }

    fn on_draw(&mut self, ctx: FrameContext) -> RenderResult<Option<Submission>> {
        if ctx.surface.is_empty() {
            return Ok(None);
        }

        let width = ctx.surface.width as f64;
        let Some(slice) = map_window(&self.pyramid, self.viewport, width) else {
            log::trace!("Nothing to draw: no level for {:?}", self.viewport);
            return Ok(None);
        };
        if slice.count == 0 {
            return Ok(None);
        }
        let Some(level) = self.pyramid.level(slice.level).cloned() else {
            return Ok(None);
        };

        let viewport = self.viewport.clamped(self.pyramid.sample_count());
        // Frame numbers are only consumed once a permit is held
        let frame_index = self.next_frame;
        let mut permit = self.gate.acquire(frame_index)?;
        self.next_frame += 1;

        let mut frame = Frame::new(frame_index, level, slice, viewport, ctx.surface, self.constants);
        if let Some(sample) = self.indicator {
            frame = frame.with_indicator(sample, indicator_pixel(sample, viewport, width));
        }

        let submission = Submission {
            frame: frame_index,
            level: slice.level,
            offset: frame.slice().offset,
            count: frame.bin_count(),
            indicator_x: frame.indicator_x(),
        };

        permit.mark_submitted();
        self.backend.submit(frame, permit).map_err(|e| {
            log::warn!("Frame {} submission failed: {}", frame_index, e);
            e
        })?;

        log::trace!(
            "Frame {} submitted: level {} bins {}..{}",
            frame_index,
            submission.level,
            submission.offset,
            submission.offset + submission.count
        );
        Ok(Some(submission))
    }
}
