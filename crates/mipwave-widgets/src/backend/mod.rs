//! Reference render backends
//!
//! - [`TerminalBackend`]: draws into ASCII rows, completes synchronously
//! - [`WorkerBackend`]: rasterizes on a background thread, completes
//!   asynchronously (permit dropped after the work is done)

mod terminal;
mod worker;

pub use terminal::{render_ascii, TerminalBackend};
pub use worker::{RasterResult, WorkerBackend, RESULT_QUEUE_CAPACITY};
