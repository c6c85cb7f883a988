//! Level selection
//!
//! Levels shrink strictly with their index, so scanning finest to coarsest
//! and stopping at the first level shorter than the target width picks the
//! coarsest level that still has about one bin per pixel column. The number
//! of bins handed to the backend then scales with screen width, not with
//! recording length.

use super::{Level, Pyramid};

impl Pyramid {
    /// Index of the level to render at `width` pixels
    ///
    /// `width` is the pixel width the whole recording would span at the
    /// current zoom (see [`crate::window::map_window`]). Returns the first
    /// level with `len() < width`, or the coarsest level when none is that
    /// short. Returns `None` for an empty pyramid or a width that isn't a
    /// positive number.
    pub fn select_level_index(&self, width: f64) -> Option<usize> {
        if self.is_empty() || width.is_nan() || width <= 0.0 {
            return None;
        }

        self.levels()
            .iter()
            .position(|level| (level.len() as f64) < width)
            .or(Some(self.level_count() - 1))
    }

    /// Level to render at `width` pixels, see [`Pyramid::select_level_index`]
    pub fn select_level(&self, width: f64) -> Option<&Level> {
        self.select_level_index(width).and_then(|index| self.level(index))
    }
}
