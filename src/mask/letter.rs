use crate::{
    field::GrayscaleField,
    glyph::{DEFAULT_SIZE_RATIO, FontChain, rasterize_letter},
    mask::MaskGenerator,
};

/// masks out the region covered by a single large letter.
#[derive(Debug, Clone)]
pub struct LetterMask {
    pub letter: char,
    /// em size as a fraction of the smaller side of the mask.
    pub size_ratio: f32,
    pub fonts: FontChain,
}

impl Default for LetterMask {
    fn default() -> Self {
        Self {
            letter: 'S',
            size_ratio: DEFAULT_SIZE_RATIO,
            fonts: FontChain::system_defaults(),
        }
    }
}

impl MaskGenerator for LetterMask {
    fn mask(&self, height: usize, width: usize) -> crate::error::Result<GrayscaleField> {
        rasterize_letter(height, width, self.letter, self.size_ratio, &self.fonts)
    }
}
