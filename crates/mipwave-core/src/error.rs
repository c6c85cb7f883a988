//! Render error types

use thiserror::Error;

/// Errors that can surface from the rendering path
///
/// Degenerate inputs (empty buffers, zero-width surfaces, empty windows) are
/// not errors: they produce no submission. Only collaborator failures end up here.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No compatible rendering backend could be created
    #[error("Rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend rejected or failed a frame submission
    #[error("Frame submission failed: {0}")]
    SubmissionFailed(String),

    /// Frame gate was closed through its `GateCloser`
    #[error("Frame gate closed")]
    GateClosed,
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;
