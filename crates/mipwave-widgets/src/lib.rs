//! Reference render backends and host glue for mipwave waveforms
//!
//! `mipwave-core` decides *what* to draw (level, bins, indicator). This crate
//! provides ways to actually draw it:
//!
//! - **Rasterization**: collapse a frame's bins into pixel columns
//! - **TerminalBackend**: ASCII envelope, completes synchronously
//! - **WorkerBackend**: background thread standing in for an async GPU queue
//! - **WaveformView**: host-side properties (window, playback time, seek callback)

pub mod backend;
pub mod raster;
pub mod theme;
pub mod view;

pub use backend::{
    render_ascii, RasterResult, TerminalBackend, WorkerBackend, RESULT_QUEUE_CAPACITY,
};
pub use raster::{rasterize, rasterize_frame};
pub use theme::{color_by_name, NAMED_COLORS};
pub use view::{SeekCallback, WaveformView};
