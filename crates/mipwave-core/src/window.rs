//! Window mapping
//!
//! Converts the visible window (in level-0 sample indices) into a slice of
//! the level that should be drawn, and maps playback time and pointer
//! positions between seconds, samples and pixels.

use crate::pyramid::Pyramid;

// =============================================================================
// Viewport
// =============================================================================

/// Visible sub-range of the recording, in level-0 sample indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub start: usize,
    pub length: usize,
}

impl Viewport {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Whole recording of `count` samples
    pub fn full(count: usize) -> Self {
        Self::new(0, count)
    }

    /// Resolve a host-supplied window against `count` samples
    ///
    /// A `length` of 0 means "until the end". Otherwise the window is cut
    /// at the end of the recording.
    pub fn resolve(start: usize, length: usize, count: usize) -> Self {
        let start = start.min(count);
        let remaining = count - start;
        let length = if length == 0 {
            remaining
        } else {
            length.min(remaining)
        };
        Self { start, length }
    }

    /// Window from minimap fractions of the recording
    ///
    /// Both fractions are clamped to [0, 1]. The start maps onto
    /// `0..=count-1` so that a start of 1.0 still addresses a sample.
    pub fn from_fractions(start: f64, length: f64, count: usize) -> Self {
        let clamp01 = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let start = (clamp01(start) * count.saturating_sub(1) as f64).floor() as usize;
        let length = (clamp01(length) * count as f64).floor() as usize;
        Self::resolve(start, length, count)
    }

    /// This window clamped so that `start + length <= count`
    pub fn clamped(&self, count: usize) -> Self {
        let start = self.start.min(count);
        Self {
            start,
            length: self.length.min(count - start),
        }
    }

    /// Exclusive end index
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

// =============================================================================
// Level slice
// =============================================================================

/// Visible part of the selected level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSlice {
    /// Index of the selected level in the pyramid
    pub level: usize,
    /// Length of the selected level
    pub level_len: usize,
    /// First visible bin
    pub offset: usize,
    /// Number of visible bins (`offset + count <= level_len`)
    pub count: usize,
    /// Pixel width the whole recording spans at this zoom
    pub effective_width: f64,
}

/// Map a visible window onto the pyramid level to draw
///
/// `pixel_width` is the device pixel width of the view. The window is first
/// clamped to the recording. Zooming in shrinks the window's share of the
/// recording, which inflates the effective width and pushes selection toward
/// finer levels.
///
/// Returns `None` when nothing can be drawn: empty pyramid, empty window or
/// a width that isn't positive.
pub fn map_window(pyramid: &Pyramid, viewport: Viewport, pixel_width: f64) -> Option<LevelSlice> {
    let count = pyramid.sample_count();
    let viewport = viewport.clamped(count);
    if count == 0 || viewport.is_empty() {
        return None;
    }

    let start_factor = viewport.start as f64 / count as f64;
    let length_factor = viewport.length as f64 / count as f64;
    let effective_width = pixel_width / length_factor;

    let level = pyramid.select_level_index(effective_width)?;
    let level_len = pyramid.level(level)?.len();

    let offset = ((level_len as f64 * start_factor).floor() as usize).min(level_len);
    let count = ((level_len as f64 * length_factor).floor() as usize).min(level_len - offset);

    Some(LevelSlice {
        level,
        level_len,
        offset,
        count,
        effective_width,
    })
}

// =============================================================================
// Playback indicator and seeking
// =============================================================================

/// Sample index of playback time `time` (seconds)
///
/// The duration of the recording is derived from `count` and `sample_rate`.
/// The index is clamped to `0..count`. Returns `None` for an empty recording
/// or a sample rate that isn't positive.
pub fn indicator_index(time: f64, sample_rate: f64, count: usize) -> Option<usize> {
    if count == 0 || sample_rate.is_nan() || sample_rate <= 0.0 {
        return None;
    }

    let total_duration = count as f64 / sample_rate;
    let position = ((time / total_duration) * count as f64).floor();
    // NaN and negative positions saturate to 0 in the cast
    Some((position.max(0.0) as usize).min(count - 1))
}

/// Horizontal pixel position of sample `index` inside the visible window
///
/// Returns `None` when the sample isn't visible.
pub fn indicator_pixel(index: usize, viewport: Viewport, pixel_width: f64) -> Option<f32> {
    if !viewport.contains(index) || pixel_width.is_nan() || pixel_width <= 0.0 {
        return None;
    }

    let fraction = (index - viewport.start) as f64 / viewport.length as f64;
    Some((fraction * pixel_width) as f32)
}

/// Playback time for a click at `x` in a view `view_width` wide
///
/// The click position is normalized and clamped to [0, 1] before scaling
/// by `audio_duration`.
pub fn seek_time(x: f64, view_width: f64, audio_duration: f64) -> f64 {
    if view_width.is_nan() || view_width <= 0.0 {
        return 0.0;
    }
    let percent = (x / view_width).clamp(0.0, 1.0);
    percent * audio_duration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleBuffer;

    fn ramp_pyramid(len: usize) -> Pyramid {
        let samples: SampleBuffer = (0..len).map(|i| i as f32 / len as f32).collect();
        Pyramid::build(&samples)
    }

    #[test]
    fn test_full_window_selects_by_view_width() {
        let pyramid = ramp_pyramid(1024);
        let slice = map_window(&pyramid, Viewport::full(1024), 100.0).unwrap();
        assert_eq!(slice.effective_width, 100.0);
        assert_eq!(slice.level, 4);
        assert_eq!(slice.level_len, 64);
        assert_eq!(slice.offset, 0);
        assert_eq!(slice.count, 64);
    }

    #[test]
    fn test_second_half() {
        let pyramid = ramp_pyramid(1024);
        // Half the recording in 50 px: whole recording spans 100 px
        let slice = map_window(&pyramid, Viewport::new(512, 512), 50.0).unwrap();
        assert_eq!(slice.effective_width, 100.0);
        assert_eq!(slice.level_len, 64);
        assert_eq!(slice.offset, 32);
        assert_eq!(slice.count, 32);
    }

    #[test]
    fn test_zooming_in_selects_finer_levels() {
        let pyramid = ramp_pyramid(1 << 16);
        let wide = map_window(&pyramid, Viewport::full(1 << 16), 800.0).unwrap();
        let zoomed = map_window(&pyramid, Viewport::new(1000, 4096), 800.0).unwrap();
        assert!(zoomed.level < wide.level);
        // Work stays bounded by the view width
        assert!(wide.count < 800);
        assert!(zoomed.count <= 800);
    }

    #[test]
    fn test_out_of_range_window_is_clamped() {
        let pyramid = ramp_pyramid(1000);
        let slice = map_window(&pyramid, Viewport::new(900, 5000), 10.0).unwrap();
        assert!(slice.offset + slice.count <= slice.level_len);

        assert!(map_window(&pyramid, Viewport::new(5000, 10), 10.0).is_none());
    }

    #[test]
    fn test_slice_stays_inside_level() {
        for len in [3usize, 10, 333, 1024, 5000] {
            let pyramid = ramp_pyramid(len);
            for start in (0..len).step_by((len / 7).max(1)) {
                for length in [1usize, 2, len / 3, len] {
                    for width in [1.0, 3.0, 97.0, 640.0, 4000.0] {
                        let viewport = Viewport::new(start, length);
                        if let Some(slice) = map_window(&pyramid, viewport, width) {
                            assert!(
                                slice.offset + slice.count <= slice.level_len,
                                "len={} start={} length={} width={} -> {:?}",
                                len,
                                start,
                                length,
                                width,
                                slice
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_degenerate_inputs_map_to_nothing() {
        let empty = Pyramid::build(&SampleBuffer::default());
        assert!(map_window(&empty, Viewport::full(0), 100.0).is_none());

        let pyramid = ramp_pyramid(256);
        assert!(map_window(&pyramid, Viewport::full(256), 0.0).is_none());
        assert!(map_window(&pyramid, Viewport::full(256), -3.0).is_none());
        assert!(map_window(&pyramid, Viewport::new(10, 0), 100.0).is_none());
    }

    #[test]
    fn test_resolve_window() {
        assert_eq!(Viewport::resolve(100, 0, 1000), Viewport::new(100, 900));
        assert_eq!(Viewport::resolve(100, 50, 1000), Viewport::new(100, 50));
        assert_eq!(Viewport::resolve(900, 500, 1000), Viewport::new(900, 100));
        assert_eq!(Viewport::resolve(2000, 10, 1000), Viewport::new(1000, 0));
    }

    #[test]
    fn test_window_from_fractions() {
        assert_eq!(Viewport::from_fractions(0.0, 1.0, 1000), Viewport::new(0, 1000));
        assert_eq!(Viewport::from_fractions(0.5, 0.25, 1001), Viewport::new(500, 250));
        // Out-of-range fractions are clamped
        assert_eq!(Viewport::from_fractions(-1.0, 2.0, 100), Viewport::new(0, 100));
        // Start at the very end leaves a single sample
        assert_eq!(Viewport::from_fractions(1.0, 1.0, 100), Viewport::new(99, 1));
    }

    #[test]
    fn test_indicator_at_end_is_clamped() {
        // 30 s at 44.1 kHz
        let count = 1_323_000;
        assert_eq!(indicator_index(30.0, 44100.0, count), Some(count - 1));
        assert_eq!(indicator_index(15.0, 44100.0, count), Some(661_500));
        assert_eq!(indicator_index(0.0, 44100.0, count), Some(0));
        assert_eq!(indicator_index(-2.0, 44100.0, count), Some(0));
        assert_eq!(indicator_index(1e9, 44100.0, count), Some(count - 1));
    }

    #[test]
    fn test_indicator_uses_configured_rate() {
        // One second of 48 kHz audio; the assumed rate changes the mapping
        assert_eq!(indicator_index(0.5, 48000.0, 48000), Some(24000));
        assert_eq!(indicator_index(0.5, 44100.0, 48000), Some(22050));
    }

    #[test]
    fn test_indicator_without_data() {
        assert_eq!(indicator_index(1.0, 44100.0, 0), None);
        assert_eq!(indicator_index(1.0, 0.0, 100), None);
    }

    #[test]
    fn test_indicator_pixel() {
        let viewport = Viewport::new(1000, 2000);
        assert_eq!(indicator_pixel(1000, viewport, 400.0), Some(0.0));
        assert_eq!(indicator_pixel(2000, viewport, 400.0), Some(200.0));
        assert_eq!(indicator_pixel(999, viewport, 400.0), None);
        assert_eq!(indicator_pixel(3000, viewport, 400.0), None);
        assert_eq!(indicator_pixel(1500, viewport, 0.0), None);
    }

    #[test]
    fn test_seek_time() {
        assert_eq!(seek_time(50.0, 200.0, 120.0), 30.0);
        assert_eq!(seek_time(0.0, 200.0, 120.0), 0.0);
        assert_eq!(seek_time(250.0, 200.0, 120.0), 120.0);
        assert_eq!(seek_time(-5.0, 200.0, 120.0), 0.0);
        assert_eq!(seek_time(10.0, 0.0, 120.0), 0.0);
    }
}
