//! Min/max envelope pyramid
//!
//! Level 0 is the raw sample sequence, used as both the min and the max
//! channel. Each following level halves the previous one with
//! [`bin_min`]/[`bin_max`], until a level of length 2 or less is reached:
//!
//! ```text
//! level 0  │▁▃▆█▆▃▁▂▅▇▅▂▁▁▂▁│  n
//! level 1  │ ▃ █ ▆ ▂ ▇ ▅ ▁ ▂│  n/2
//! level 2  │   █   ▆   ▇   ▂│  n/4
//!   ...
//! ```
//!
//! Building is O(n) in total and happens once per sample set, so redraws
//! never touch the raw samples again.

mod lod;
mod reduce;

pub use reduce::{bin_max, bin_min, bin_reduce};

use std::sync::Arc;
use std::time::Instant;

use crate::sample_buffer::SampleBuffer;
use crate::types::{BIN_SIZE, TERMINAL_LEVEL_LEN};

/// One resolution tier of the envelope
///
/// `min_values[i] <= max_values[i]` for every index, and both channels have
/// the same length.
#[derive(Clone)]
pub struct Level {
    min_values: Arc<[f32]>,
    max_values: Arc<[f32]>,
}

impl Level {
    /// Identity level: both channels are the raw samples (storage is shared)
    fn identity(samples: &SampleBuffer) -> Self {
        let shared = samples.shared();
        Self {
            min_values: Arc::clone(&shared),
            max_values: shared,
        }
    }

    /// Next coarser level
    fn reduce(&self) -> Self {
        Self {
            min_values: bin_min(&self.min_values, BIN_SIZE).into(),
            max_values: bin_max(&self.max_values, BIN_SIZE).into(),
        }
    }

    /// Number of bins in this level
    pub fn len(&self) -> usize {
        self.min_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min_values.is_empty()
    }

    pub fn min_values(&self) -> &[f32] {
        &self.min_values
    }

    pub fn max_values(&self) -> &[f32] {
        &self.max_values
    }

    /// Min/max pair of bin `index`
    pub fn bin(&self, index: usize) -> Option<(f32, f32)> {
        Some((*self.min_values.get(index)?, *self.max_values.get(index)?))
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Level {} bins>", self.len())
    }
}

/// Ordered list of levels, finest (index 0) to coarsest
#[derive(Debug, Clone, Default)]
pub struct Pyramid {
    levels: Vec<Level>,
    sample_count: usize,
}

impl Pyramid {
    /// Build every level eagerly
    ///
    /// An empty buffer produces an empty pyramid. Buffers of length 1 or 2
    /// produce level 0 only.
    pub fn build(samples: &SampleBuffer) -> Self {
        if samples.is_empty() {
            log::debug!("Pyramid build skipped: empty sample buffer");
            return Self::default();
        }

        let start_time = Instant::now();
        let mut levels = vec![Level::identity(samples)];

        while let Some(current) = levels.last() {
            if current.len() <= TERMINAL_LEVEL_LEN {
                break;
            }
            let next = current.reduce();
            levels.push(next);
        }

        log::debug!(
            "Pyramid built: {} samples -> {} levels in {:?}",
            samples.len(),
            levels.len(),
            start_time.elapsed()
        );

        Self {
            levels,
            sample_count: samples.len(),
        }
    }

    /// Sample count of the source buffer (length of level 0)
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Coarsest level
    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }
}
