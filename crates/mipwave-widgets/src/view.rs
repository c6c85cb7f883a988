//! Host-side waveform view
//!
//! Holds the properties a host sets on a waveform widget and pushes them
//! into a [`WaveformRenderer`]. Clicks are turned into seek times and
//! reported through an optional callback.

use mipwave_core::{
    seek_time, Color, RenderBackend, RenderConstants, SampleBuffer, Viewport, WaveformRenderer,
};

/// Callback invoked with the seek time in seconds
pub type SeekCallback = Box<dyn Fn(f64) + Send>;

/// Waveform widget properties
pub struct WaveformView {
    samples: SampleBuffer,
    start: usize,
    /// 0 = until the end
    length: usize,
    constants: RenderConstants,
    current_time: Option<f64>,
    audio_duration: f64,
    on_seek: Option<SeekCallback>,
}

impl WaveformView {
    /// View over the whole of `samples`
    ///
    /// `audio_duration` is the length of the recording in seconds, used to
    /// convert clicks into seek times.
    pub fn new(samples: SampleBuffer, audio_duration: f64) -> Self {
        Self {
            samples,
            start: 0,
            length: 0,
            constants: RenderConstants::default(),
            current_time: None,
            audio_duration,
            on_seek: None,
        }
    }

    /// Show `length` samples from `start` (0 = until the end)
    pub fn with_window(mut self, start: usize, length: usize) -> Self {
        self.start = start;
        self.length = length;
        self
    }

    /// Show the part of the recording a minimap selection covers
    pub fn with_fractions(self, start: f64, length: f64) -> Self {
        let viewport = Viewport::from_fractions(start, length, self.samples.len());
        self.with_window(viewport.start, viewport.length)
    }

    pub fn current_time(mut self, time: Option<f64>) -> Self {
        self.current_time = time;
        self
    }

    /// Foreground color of the envelope; the sample rate is kept
    pub fn foreground_color(mut self, color: Color) -> Self {
        self.constants.color = color;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.constants.sample_rate = sample_rate;
        self
    }

    pub fn on_seek<F>(mut self, callback: F) -> Self
    where
        F: Fn(f64) + Send + 'static,
    {
        self.on_seek = Some(Box::new(callback));
        self
    }

    pub fn set_current_time(&mut self, time: Option<f64>) {
        self.current_time = time;
    }

    pub fn constants(&self) -> &RenderConstants {
        &self.constants
    }

    pub fn audio_duration(&self) -> f64 {
        self.audio_duration
    }

    /// Visible window resolved against the loaded samples
    pub fn viewport(&self) -> Viewport {
        Viewport::resolve(self.start, self.length, self.samples.len())
    }

    /// Push the view's state into `renderer`
    pub fn apply<B: RenderBackend>(&self, renderer: &mut WaveformRenderer<B>) {
        renderer.set_constants(self.constants);
        renderer.set(self.samples.clone(), self.start, self.length, self.current_time);
    }

    /// Handle a click at `x` in a view `view_width` wide
    ///
    /// Returns the seek time and forwards it to the seek callback.
    pub fn handle_click(&self, x: f64, view_width: f64) -> Option<f64> {
        if view_width.is_nan() || view_width <= 0.0 {
            return None;
        }

        let time = seek_time(x, view_width, self.audio_duration);
        log::debug!("Seek to {:.3}s (x = {:.1} of {:.1})", time, x, view_width);
        if let Some(callback) = &self.on_seek {
            callback(time);
        }
        Some(time)
    }
}

impl std::fmt::Debug for WaveformView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformView")
            .field("samples", &self.samples)
            .field("start", &self.start)
            .field("length", &self.length)
            .field("constants", &self.constants)
            .field("current_time", &self.current_time)
            .field("audio_duration", &self.audio_duration)
            .field("on_seek", &self.on_seek.is_some())
            .finish()
    }
}
