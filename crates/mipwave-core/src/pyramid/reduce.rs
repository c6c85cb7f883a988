//! Bin-reduce primitive
//!
//! Collapses consecutive groups of `group` entries into a single value.
//! A trailing incomplete group is dropped, never padded or merged into the
//! previous group, so the min and max channels of a level always reduce to
//! the same length.

/// Reduce `samples` in groups of `group` with `combine`
///
/// Output length is `samples.len() / group`. A group size of 0 yields an
/// empty output.
pub fn bin_reduce(samples: &[f32], group: usize, combine: fn(f32, f32) -> f32) -> Vec<f32> {
    if group == 0 {
        return Vec::new();
    }

    samples
        .chunks_exact(group)
        .map(|bin| bin[1..].iter().fold(bin[0], |acc, &s| combine(acc, s)))
        .collect()
}

/// Per-group minimum
pub fn bin_min(samples: &[f32], group: usize) -> Vec<f32> {
    bin_reduce(samples, group, f32::min)
}

/// Per-group maximum
pub fn bin_max(samples: &[f32], group: usize) -> Vec<f32> {
    bin_reduce(samples, group, f32::max)
}
