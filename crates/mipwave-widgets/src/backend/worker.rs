//! Background rasterization backend
//!
//! Frames are handed to a dedicated thread which reduces them to pixel
//! columns. The frame permit travels with the job and is released only once
//! the columns have been produced and published, so the renderer's gate
//! sees real completion rather than submission.
//!
//! Finished frames wait in a small queue. A host that stops draining it
//! loses the oldest results, never the newest.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use mipwave_core::{Frame, FramePermit, RenderBackend, RenderError, RenderResult};

use crate::raster::rasterize_frame;

/// Finished frames kept for the host before the oldest is discarded
pub const RESULT_QUEUE_CAPACITY: usize = 3;

/// Rasterized frame delivered by the worker thread
#[derive(Debug, Clone)]
pub struct RasterResult {
    pub frame: u64,
    pub level: usize,
    /// One (min, max) pair per pixel column
    pub columns: Vec<(f32, f32)>,
    pub indicator_x: Option<f32>,
}

struct RasterJob {
    frame: Frame,
    permit: FramePermit,
}

/// Render backend that rasterizes on a background thread
pub struct WorkerBackend {
    tx: Option<Sender<RasterJob>>,
    results: Receiver<RasterResult>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerBackend {
    /// Spawn the worker thread
    pub fn spawn() -> RenderResult<Self> {
        Self::spawn_with_latency(Duration::ZERO)
    }

    /// Spawn a worker that sleeps `latency` before finishing each frame
    ///
    /// Useful for exercising back-pressure against a slow consumer.
    pub fn spawn_with_latency(latency: Duration) -> RenderResult<Self> {
        let (tx, rx) = channel::unbounded::<RasterJob>();
        let (result_tx, results) = channel::bounded::<RasterResult>(RESULT_QUEUE_CAPACITY);
        let backlog = results.clone();

        let handle = thread::Builder::new()
            .name("mipwave-raster".to_string())
            .spawn(move || worker_loop(rx, result_tx, backlog, latency))
            .map_err(|e| RenderError::BackendUnavailable(format!("raster thread: {}", e)))?;

        log::info!("Raster worker started");
        Ok(Self {
            tx: Some(tx),
            results,
            handle: Some(handle),
        })
    }

    /// Next finished frame, if any
    pub fn try_recv(&self) -> Option<RasterResult> {
        self.results.try_recv().ok()
    }

    /// Finished frames waiting to be received
    pub fn pending_results(&self) -> usize {
        self.results.len()
    }

    /// Wait up to `timeout` for the next finished frame
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RasterResult> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl RenderBackend for WorkerBackend {
    fn submit(&mut self, frame: Frame, permit: FramePermit) -> RenderResult<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| RenderError::SubmissionFailed("raster worker stopped".to_string()))?;

        let index = frame.index();
        tx.send(RasterJob { frame, permit })
            .map_err(|_| RenderError::SubmissionFailed(format!("raster worker gone (frame {})", index)))
    }
}

impl Drop for WorkerBackend {
    fn drop(&mut self) {
        // Closing the job channel ends the loop
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Raster worker panicked");
            }
        }
    }
}

fn worker_loop(
    rx: Receiver<RasterJob>,
    results: Sender<RasterResult>,
    backlog: Receiver<RasterResult>,
    latency: Duration,
) {
    log::debug!("Raster worker loop running");

    while let Ok(RasterJob { frame, permit }) = rx.recv() {
        let start = std::time::Instant::now();
        let columns = rasterize_frame(&frame, frame.surface().width as usize);
        if !latency.is_zero() {
            thread::sleep(latency);
        }

        let result = RasterResult {
            frame: frame.index(),
            level: frame.slice().level,
            columns,
            indicator_x: frame.indicator_x(),
        };
        log::trace!(
            "Rasterized frame {} in {:?}",
            result.frame,
            start.elapsed()
        );

        publish(&results, &backlog, result);
        permit.complete();
    }

    log::debug!("Raster worker loop exiting");
}

/// Queue `result`, discarding the oldest queued result if the host is behind
fn publish(results: &Sender<RasterResult>, backlog: &Receiver<RasterResult>, result: RasterResult) {
    let result = match results.try_send(result) {
        Ok(()) => return,
        Err(TrySendError::Full(result)) => result,
        Err(TrySendError::Disconnected(_)) => return,
    };

    if let Ok(stale) = backlog.try_recv() {
        log::trace!("Result queue full, dropped frame {}", stale.frame);
    }
    if let Err(e) = results.try_send(result) {
        log::trace!("Result queue full, dropped frame {}", e.into_inner().frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mipwave_core::{RenderConfig, RenderSink, SampleBuffer, SurfaceSize, WaveformRenderer};
    use std::time::Instant;

    fn samples() -> SampleBuffer {
        (0..8192).map(|i| (i as f32 * 0.02).sin()).collect()
    }

    fn wait_until_idle<B: RenderBackend>(renderer: &WaveformRenderer<B>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while renderer.gate().in_flight() > 0 {
            assert!(Instant::now() < deadline, "worker never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_worker_delivers_columns() {
        let backend = WorkerBackend::spawn().unwrap();
        let mut renderer = WaveformRenderer::new(backend, &RenderConfig::default());
        renderer.on_resize(SurfaceSize::new(64, 16));
        renderer.set(samples(), 0, 0, Some(0.0));

        let submission = renderer.draw().unwrap().unwrap();
        let result = renderer
            .backend()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(result.frame, submission.frame);
        assert_eq!(result.level, submission.level);
        assert_eq!(result.columns.len(), 64);
        assert_eq!(result.indicator_x, Some(0.0));
        assert!(result.columns.iter().all(|(min, max)| min <= max));
    }

    #[test]
    fn test_permit_released_after_completion() {
        let backend = WorkerBackend::spawn().unwrap();
        let mut renderer = WaveformRenderer::new(backend, &RenderConfig::default());
        renderer.on_resize(SurfaceSize::new(32, 8));
        renderer.set_samples(samples());

        for _ in 0..10 {
            renderer.draw().unwrap().unwrap();
        }
        wait_until_idle(&renderer);
        assert_eq!(renderer.gate().available(), 3);

        let backend = renderer.backend();
        let mut received = Vec::new();
        while let Some(result) = backend.try_recv() {
            received.push(result.frame);
        }
        // Only the newest frames survive an undrained queue
        assert_eq!(received, vec![7, 8, 9]);
    }

    #[test]
    fn test_undrained_results_stay_bounded() {
        let backend = WorkerBackend::spawn().unwrap();
        let mut renderer = WaveformRenderer::new(backend, &RenderConfig::default());
        renderer.on_resize(SurfaceSize::new(128, 8));
        renderer.set_samples(samples());

        for _ in 0..500 {
            renderer.draw().unwrap().unwrap();
            assert!(renderer.backend().pending_results() <= RESULT_QUEUE_CAPACITY);
        }
        wait_until_idle(&renderer);

        assert_eq!(renderer.backend().pending_results(), RESULT_QUEUE_CAPACITY);
        let last = std::iter::from_fn(|| renderer.backend().try_recv())
            .last()
            .unwrap();
        assert_eq!(last.frame, 499);
    }

    #[test]
    fn test_slow_worker_applies_back_pressure() {
        let latency = Duration::from_millis(40);
        let backend = WorkerBackend::spawn_with_latency(latency).unwrap();
        let mut renderer = WaveformRenderer::new(backend, &RenderConfig::default());
        renderer.on_resize(SurfaceSize::new(32, 8));
        renderer.set_samples(samples());

        let start = Instant::now();
        for _ in 0..5 {
            renderer.draw().unwrap().unwrap();
            assert!(renderer.gate().in_flight() <= 3);
        }
        // The fourth and fifth draws had to wait for earlier frames
        assert!(start.elapsed() >= latency * 2);

        wait_until_idle(&renderer);
    }

    #[test]
    fn test_drop_joins_worker() {
        let backend = WorkerBackend::spawn().unwrap();
        drop(backend);
    }
}
