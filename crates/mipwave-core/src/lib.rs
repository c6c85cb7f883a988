//! Mipwave Core - multi-resolution waveform envelopes for long recordings
//!
//! Builds a pyramid of min/max envelopes once per sample set, then answers
//! per-redraw questions cheaply: which level to draw for a given pixel width,
//! which slice of that level is visible, and where the playhead sits.
//!
//! ## Data flow
//!
//! ```text
//! samples ──► SampleBuffer ──► Pyramid::build (once per sample set)
//!                                   │
//! width + viewport ──► map_window ──┴──► LevelSlice ──► RenderBackend
//!                                             ▲
//!                                  FrameGate (max 3 frames in flight)
//! ```

pub mod config;
pub mod error;
pub mod pacing;
pub mod pyramid;
pub mod render;
pub mod sample_buffer;
pub mod types;
pub mod window;

pub use config::{
    default_config_dir, default_config_path, load_config, save_config, ConfigFile, RenderConfig,
};
pub use error::{RenderError, RenderResult};
pub use pacing::{FrameGate, FramePermit, FrameState, GateCloser};
pub use pyramid::{bin_max, bin_min, bin_reduce, Level, Pyramid};
pub use render::{
    Frame, FrameContext, FrameUniforms, RenderBackend, RenderSink, Submission, SurfaceSize,
    WaveformRenderer,
};
pub use sample_buffer::SampleBuffer;
pub use types::*;
pub use window::{indicator_index, indicator_pixel, map_window, seek_time, LevelSlice, Viewport};
