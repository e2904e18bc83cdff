//! mask generation and masking of stippled fields

pub mod compose;
pub mod letter;

use crate::field::GrayscaleField;

/// the sample value of a dot of ink.
pub const INK: f32 = 0.0;
/// the sample value of empty background.
pub const BLANK: f32 = 1.0;

/// Produces a mask field covering a `height x width` grid. samples below the compositing
/// threshold mark the locations that selection excludes.
pub trait MaskGenerator {
    fn mask(&self, height: usize, width: usize) -> crate::error::Result<GrayscaleField>;
}
