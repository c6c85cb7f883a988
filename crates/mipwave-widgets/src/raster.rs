//! Frame rasterization
//!
//! Collapses the bins of a frame into one (min, max) pair per pixel column,
//! the same job the fragment stage of a GPU backend does.

use mipwave_core::Frame;

/// Rasterize bins into `columns` (min, max) pairs
///
/// Column boundaries use integer division (`col * count / columns`), so every
/// bin lands in exactly one column and no bin is lost to rounding. When there
/// are more columns than bins, a column with no bin of its own repeats the
/// bin under it.
pub fn rasterize(min_values: &[f32], max_values: &[f32], columns: usize) -> Vec<(f32, f32)> {
    let count = min_values.len().min(max_values.len());
    if count == 0 || columns == 0 {
        return Vec::new();
    }

    (0..columns)
        .map(|col| {
            let start = col * count / columns;
            let end = (col + 1) * count / columns;

            if start >= end {
                let bin = start.min(count - 1);
                return (min_values[bin], max_values[bin]);
            }

            let mut min = f32::INFINITY;
            let mut max = f32::NEG_INFINITY;
            for i in start..end {
                min = min.min(min_values[i]);
                max = max.max(max_values[i]);
            }
            (min, max)
        })
        .collect()
}

/// Rasterize a frame across `columns` pixel columns
pub fn rasterize_frame(frame: &Frame, columns: usize) -> Vec<(f32, f32)> {
    rasterize(frame.min_values(), frame.max_values(), columns)
}
