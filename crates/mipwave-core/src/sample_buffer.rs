//! Immutable single-channel sample storage

use std::sync::Arc;

/// One channel of amplitude samples, nominally in [-1.0, 1.0]
///
/// Cloning is cheap and shares the underlying storage. There is no way to
/// mutate the samples; an update is a replacement with a new buffer, which
/// invalidates any pyramid built from the old one.
#[derive(Clone)]
pub struct SampleBuffer {
    samples: Arc<[f32]>,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// True when both handles share the same storage
    pub fn ptr_eq(&self, other: &SampleBuffer) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    /// Shared handle to the storage, used as level 0 of a pyramid
    pub(crate) fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<f32>> for SampleBuffer {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

impl From<&[f32]> for SampleBuffer {
    fn from(samples: &[f32]) -> Self {
        Self {
            samples: samples.into(),
        }
    }
}

impl FromIterator<f32> for SampleBuffer {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<SampleBuffer {} samples>", self.samples.len())
    }
}
