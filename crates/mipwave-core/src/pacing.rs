//! Frame pacing
//!
//! Bounds how many render submissions may be in flight at once. Each frame
//! takes a permit before it is handed to the backend, and the backend drops
//! the permit only once the frame's work has fully completed. When all
//! permits are out, [`FrameGate::acquire`] blocks until one comes back.
//!
//! ```text
//! Idle ──acquire──► Acquired ──submit──► Submitted ──drop──► Completed
//!                                                        (token returned)
//! ```
//!
//! The gate is a bounded channel pre-filled with one token per permit.
//! Returning the token happens in `Drop`, so a frame that fails half-way
//! still gives its capacity back.
//!
//! A gate can be closed through a [`GateCloser`]. Closing wakes any draw
//! blocked in `acquire` with [`RenderError::GateClosed`] and refuses all
//! further permits; permits already out are unaffected.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::error::{RenderError, RenderResult};

/// Lifecycle of one frame submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No permit held yet
    Idle,
    /// Permit held, nothing handed to the backend
    Acquired,
    /// Backend accepted the frame and owns the permit
    Submitted,
    /// Backend work finished, token returned to the gate
    Completed,
}

/// Counting gate limiting in-flight frames
pub struct FrameGate {
    tokens_tx: Sender<()>,
    tokens_rx: Receiver<()>,
    capacity: usize,
    closer: GateCloser,
    // Never carries a message; disconnects when the gate is closed
    closed_rx: Receiver<()>,
}

impl FrameGate {
    /// Create a gate with `capacity` permits (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tokens_tx, tokens_rx) = channel::bounded(capacity);
        for _ in 0..capacity {
            // Cannot fail: the channel was sized for exactly this many tokens
            let _ = tokens_tx.try_send(());
        }

        log::debug!("FrameGate created with {} permits", capacity);

        let (closed_tx, closed_rx) = channel::bounded(0);
        Self {
            tokens_tx,
            tokens_rx,
            capacity,
            closer: GateCloser {
                closed_tx: Arc::new(Mutex::new(Some(closed_tx))),
            },
            closed_rx,
        }
    }

    /// Handle that closes this gate, usable from any thread
    pub fn closer(&self) -> GateCloser {
        self.closer.clone()
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.closed_rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently available
    pub fn available(&self) -> usize {
        self.tokens_rx.len()
    }

    /// Frames currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }

    /// Take a permit for `frame`, blocking until one is free
    ///
    /// Fails with [`RenderError::GateClosed`] once the gate has been closed,
    /// including while waiting.
    pub fn acquire(&self, frame: u64) -> RenderResult<FramePermit> {
        if self.is_closed() {
            return Err(RenderError::GateClosed);
        }
        if self.tokens_rx.try_recv().is_ok() {
            return Ok(self.permit(frame));
        }

        log::debug!(
            "Frame {} waiting: {} frames in flight",
            frame,
            self.capacity
        );
        let waited_from = Instant::now();
        crossbeam::select! {
            recv(self.tokens_rx) -> token => {
                token.map_err(|_| RenderError::GateClosed)?;
            }
            recv(self.closed_rx) -> _ => {
                log::debug!("Frame {} abandoned: gate closed", frame);
                return Err(RenderError::GateClosed);
            }
        }
        log::debug!("Frame {} resumed after {:?}", frame, waited_from.elapsed());
        Ok(self.permit(frame))
    }

    /// Take a permit for `frame` if one is free right now
    pub fn try_acquire(&self, frame: u64) -> Option<FramePermit> {
        if self.is_closed() {
            return None;
        }
        self.tokens_rx.try_recv().ok().map(|()| self.permit(frame))
    }

    fn permit(&self, frame: u64) -> FramePermit {
        FramePermit {
            frame,
            state: FrameState::Acquired,
            release: self.tokens_tx.clone(),
            acquired_at: Instant::now(),
        }
    }
}

impl std::fmt::Debug for FrameGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameGate")
            .field("capacity", &self.capacity)
            .field("available", &self.available())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Closes a [`FrameGate`]
#[derive(Debug, Clone)]
pub struct GateCloser {
    closed_tx: Arc<Mutex<Option<Sender<()>>>>,
}

impl GateCloser {
    /// Close the gate; closing twice is a no-op
    pub fn close(&self) {
        let Ok(mut closed_tx) = self.closed_tx.lock() else {
            return;
        };
        if closed_tx.take().is_some() {
            log::debug!("FrameGate closed");
        }
    }
}

/// Capacity held by one in-flight frame
///
/// Dropping the permit completes the frame and returns its token. Backends
/// must keep the permit alive until the frame's work is done.
#[derive(Debug)]
pub struct FramePermit {
    frame: u64,
    state: FrameState,
    release: Sender<()>,
    acquired_at: Instant,
}

impl FramePermit {
    /// Sequence number of the frame this permit belongs to
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Record that the backend has taken over the frame
    pub fn mark_submitted(&mut self) {
        self.state = FrameState::Submitted;
    }

    /// Signal completion; same as dropping the permit
    pub fn complete(self) {}
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        self.state = FrameState::Completed;
        // Fails only if the gate itself is gone, in which case nobody waits
        let _ = self.release.try_send(());
        log::trace!(
            "Frame {} completed after {:?}",
            self.frame,
            self.acquired_at.elapsed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_capacity_is_enforced() {
        let gate = FrameGate::new(3);
        let a = gate.acquire(0).unwrap();
        let b = gate.acquire(1).unwrap();
        let c = gate.acquire(2).unwrap();
        assert_eq!(gate.in_flight(), 3);
        assert!(gate.try_acquire(3).is_none());

        drop(b);
        assert_eq!(gate.available(), 1);
        let d = gate.try_acquire(3).unwrap();
        assert_eq!(d.frame(), 3);

        a.complete();
        drop(c);
        drop(d);
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn test_zero_capacity_becomes_one() {
        let gate = FrameGate::new(0);
        assert_eq!(gate.capacity(), 1);
        let permit = gate.try_acquire(0);
        assert!(permit.is_some());
        assert!(gate.try_acquire(1).is_none());
    }

    #[test]
    fn test_permit_states() {
        let gate = FrameGate::new(1);
        let mut permit = gate.acquire(7).unwrap();
        assert_eq!(permit.state(), FrameState::Acquired);
        permit.mark_submitted();
        assert_eq!(permit.state(), FrameState::Submitted);
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let gate = FrameGate::new(1);
        let held = gate.acquire(0).unwrap();

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            drop(held);
        });

        let start = Instant::now();
        let next = gate.acquire(1).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(next.frame(), 1);
        releaser.join().unwrap();
    }

    #[test]
    fn test_permit_outliving_gate_is_harmless() {
        let gate = FrameGate::new(2);
        let permit = gate.acquire(0).unwrap();
        drop(gate);
        drop(permit);
    }

    #[test]
    fn test_in_flight_never_exceeds_capacity() {
        let gate = FrameGate::new(3);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::new();

        for frame in 0..24u64 {
            let permit = gate.acquire(frame).unwrap();
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);

            let in_flight = Arc::clone(&in_flight);
            workers.push(thread::spawn(move || {
                thread::sleep(Duration::from_millis(2 + frame % 3));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                drop(permit);
            }));
        }

        for worker in workers {
            worker.join().unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.available(), 3);
    }

    #[test]
    fn test_close_wakes_blocked_acquire() {
        let gate = FrameGate::new(1);
        let _held = gate.acquire(0).unwrap();
        let closer = gate.closer();

        let closing = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            closer.close();
        });

        assert!(matches!(gate.acquire(1), Err(RenderError::GateClosed)));
        assert!(gate.is_closed());
        closing.join().unwrap();
    }

    #[test]
    fn test_closed_gate_refuses_permits() {
        let gate = FrameGate::new(3);
        let permit = gate.acquire(0).unwrap();
        gate.closer().close();
        gate.closer().close();

        assert!(gate.try_acquire(1).is_none());
        assert!(matches!(gate.acquire(1), Err(RenderError::GateClosed)));

        // Outstanding permits still return their tokens
        drop(permit);
        assert_eq!(gate.available(), 3);
    }
}
