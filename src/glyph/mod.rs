//! glyph rasterization backed by an ordered chain of typefaces.

pub mod builtin;
pub mod outline;

use std::path::PathBuf;

use ndarray::Array2;
use ttf_parser::Face;

use crate::{
    error::{Error, Result},
    field::GrayscaleField,
    mask::BLANK,
};

use outline::{Outline, OutlineFlattener};

pub const DEFAULT_SIZE_RATIO: f32 = 0.9;

/// well-known heavy sans faces, tried in order before the built-in block font.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:/Windows/Fonts/arialbd.ttf",
    "C:/Windows/Fonts/calibrib.ttf",
    "C:/Windows/Fonts/timesbd.ttf",
    "C:/Windows/Fonts/impact.ttf",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Path(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl FontSource {
    fn name(&self) -> String {
        match self {
            FontSource::Path(path) => path.display().to_string(),
            FontSource::Bytes { name, .. } => name.clone(),
        }
    }

    fn load(&self) -> Result<Vec<u8>> {
        match self {
            FontSource::Path(path) => Ok(std::fs::read(path)?),
            FontSource::Bytes { data, .. } => Ok(data.clone()),
        }
    }
}

/// A typeface that has been loaded and can draw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Typeface {
    Outline { name: String, data: Vec<u8> },
    Builtin,
}

impl Typeface {
    pub fn name(&self) -> &str {
        match self {
            Typeface::Outline { name, .. } => name,
            Typeface::Builtin => "builtin",
        }
    }

    pub fn covers(&self, text: &str) -> bool {
        match self {
            Typeface::Outline { data, .. } => Face::parse(data, 0)
                .map(|face| {
                    text.chars()
                        .all(|c| c.is_whitespace() || face.glyph_index(c).is_some())
                })
                .unwrap_or(false),
            Typeface::Builtin => text.chars().all(builtin::covers),
        }
    }

    /// Flattens `text` laid out on a single line with an em of `size` pixels.
    pub fn outline(&self, text: &str, size: f32) -> Result<Outline> {
        let data = match self {
            Typeface::Outline { data, .. } => data,
            Typeface::Builtin => return Ok(builtin::outline(text, size)),
        };

        let face = Face::parse(data, 0)?;
        let scale = size / face.units_per_em() as f32;
        let mut outline = Outline {
            ascent: face.ascender() as f32 * scale,
            descent: -(face.descender() as f32) * scale,
            ..Default::default()
        };

        let mut pen = 0.;
        for c in text.chars() {
            let Some(id) = face.glyph_index(c) else {
                continue;
            };
            let mut flattener = OutlineFlattener::new(&mut outline, scale, pen);
            // glyphs without contours, such as spaces, still advance the pen
            let _ = face.outline_glyph(id, &mut flattener);
            pen += face.glyph_hor_advance(id).unwrap_or(0) as f32 * scale;
        }
        outline.advance = pen;

        Ok(outline)
    }
}

/// An ordered list of font candidates. resolution walks the list for the first bold candidate
/// that loads and can draw the requested text, settles for the first regular-weight one when no
/// bold candidate covers it, then falls back to the built-in block font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontChain {
    candidates: Vec<FontSource>,
}

impl FontChain {
    pub fn new(candidates: Vec<FontSource>) -> Self {
        Self { candidates }
    }

    /// a chain that goes straight to the built-in font.
    pub fn builtin_only() -> Self {
        Self::default()
    }

    pub fn from_paths<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::new(
            paths
                .into_iter()
                .map(|path| FontSource::Path(path.into()))
                .collect(),
        )
    }

    pub fn system_defaults() -> Self {
        Self::from_paths(DEFAULT_FONT_CANDIDATES.iter().copied())
    }

    pub fn push(&mut self, source: FontSource) {
        self.candidates.push(source);
    }

    pub fn candidates(&self) -> &[FontSource] {
        &self.candidates
    }

    pub fn resolve(&self, text: &str) -> Result<Typeface> {
        let mut regular = None;

        for source in &self.candidates {
            let data = match source.load() {
                Ok(data) => data,
                Err(e) => {
                    log::trace!("skipping font {}: {}", source.name(), e);
                    continue;
                }
            };

            let bold = match Face::parse(&data, 0) {
                Ok(face) => face.is_bold(),
                Err(e) => {
                    log::debug!("skipping unparsable font {}: {}", source.name(), e);
                    continue;
                }
            };

            let typeface = Typeface::Outline {
                name: source.name(),
                data,
            };
            if !typeface.covers(text) {
                log::debug!("font {} cannot draw {:?}", typeface.name(), text);
                continue;
            }
            if bold {
                log::debug!("using bold font {} for {:?}", typeface.name(), text);
                return Ok(typeface);
            }
            log::trace!("font {} is not bold, looking further", typeface.name());
            regular.get_or_insert(typeface);
        }

        if let Some(typeface) = regular {
            log::debug!("no bold font can draw {:?}, using {}", text, typeface.name());
            return Ok(typeface);
        }

        match text.chars().find(|&c| !builtin::covers(c)) {
            None => {
                log::debug!("using builtin font for {:?}", text);
                Ok(Typeface::Builtin)
            }
            Some(letter) => Err(Error::FontUnavailable { letter }),
        }
    }
}

/// Rasterize `letter` into a `height x width` field: black on white, centered on its ink, with an
/// em of `floor(min(height, width) * size_ratio)` pixels. edges are antialiased, so the result is
/// only close to binary.
pub fn rasterize_letter(
    height: usize,
    width: usize,
    letter: char,
    size_ratio: f32,
    fonts: &FontChain,
) -> Result<GrayscaleField> {
    if height == 0 || width == 0 {
        return Err(Error::InvalidDimensions { height, width });
    }

    let text = letter.to_string();
    let typeface = fonts.resolve(&text)?;

    let size = (height.min(width) as f32 * size_ratio).floor();
    if size.is_nan() || size <= 0. {
        log::debug!("font size for {:?} rounds to zero, leaving the field blank", letter);
        return Ok(GrayscaleField::blank(height, width));
    }

    let outline = typeface.outline(&text, size)?;
    let Some(bounds) = outline.bounds() else {
        return Ok(GrayscaleField::blank(height, width));
    };

    let offset = [
        (width as f32 - bounds.width()) / 2. - bounds.min[0],
        (height as f32 - bounds.height()) / 2. - bounds.min[1],
    ];
    let coverage = outline.coverage(height, width, offset);

    log::debug!(
        "rasterized {:?} at {}px into {}x{} with {}",
        letter,
        size,
        height,
        width,
        typeface.name()
    );

    Ok(GrayscaleField::from_array(coverage.mapv(|c| BLANK - c)))
}

/// Rasterize a single line of text onto a transparent strip just tall enough for the typeface's
/// line box. returns per-pixel ink coverage, `1.0` meaning fully inked.
pub fn render_line(text: &str, size: f32, typeface: &Typeface) -> Result<Array2<f32>> {
    let outline = typeface.outline(text, size)?;
    let height = (outline.ascent + outline.descent).ceil().max(1.) as usize;
    let width = outline.advance.ceil().max(1.) as usize;

    Ok(outline.coverage(height, width, [0., outline.ascent]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::INK;

    #[test]
    fn empty_chain_falls_back_to_builtin() {
        let typeface = FontChain::builtin_only().resolve("S").unwrap();
        assert_eq!(typeface, Typeface::Builtin);
    }

    #[test]
    fn missing_and_broken_candidates_are_skipped() {
        let fonts = FontChain::new(vec![
            FontSource::Path("/definitely/not/a/font.ttf".into()),
            FontSource::Bytes {
                name: "garbage".into(),
                data: vec![0, 1, 2, 3],
            },
        ]);
        assert_eq!(fonts.resolve("S").unwrap(), Typeface::Builtin);
    }

    #[test]
    fn uncovered_letter_is_unavailable() {
        let result = FontChain::builtin_only().resolve("λ");
        assert!(matches!(result, Err(Error::FontUnavailable { letter: 'λ' })));
    }

    #[test]
    fn letter_is_dark_in_the_middle_and_blank_at_the_corners() {
        let field = rasterize_letter(64, 96, 'I', DEFAULT_SIZE_RATIO, &FontChain::builtin_only())
            .unwrap();

        assert_eq!(field.shape(), (64, 96));
        assert_eq!(field.get(32, 48), Some(INK));
        assert_eq!(field.get(0, 0), Some(BLANK));
        assert_eq!(field.get(63, 95), Some(BLANK));
    }

    #[test]
    fn letter_is_centered() {
        let field = rasterize_letter(70, 70, 'O', DEFAULT_SIZE_RATIO, &FontChain::builtin_only())
            .unwrap();

        let inked: Vec<(usize, usize)> = field
            .as_array()
            .indexed_iter()
            .filter(|(_, v)| **v < 0.5)
            .map(|(index, _)| index)
            .collect();
        let (min_y, max_y) = (
            inked.iter().map(|p| p.0).min().unwrap(),
            inked.iter().map(|p| p.0).max().unwrap(),
        );
        let (min_x, max_x) = (
            inked.iter().map(|p| p.1).min().unwrap(),
            inked.iter().map(|p| p.1).max().unwrap(),
        );

        assert!(min_y.abs_diff(69 - max_y) <= 1);
        assert!(min_x.abs_diff(69 - max_x) <= 1);
    }

    #[test]
    fn rasterization_is_deterministic() {
        let fonts = FontChain::builtin_only();
        let a = rasterize_letter(40, 30, 'S', 0.8, &fonts).unwrap();
        let b = rasterize_letter(40, 30, 'S', 0.8, &fonts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_size_leaves_field_blank() {
        let field = rasterize_letter(3, 3, 'S', 0.1, &FontChain::builtin_only()).unwrap();
        assert!(field.as_array().iter().all(|&v| v == BLANK));
    }

    #[test]
    fn zero_sized_field_is_rejected() {
        let result = rasterize_letter(0, 10, 'S', DEFAULT_SIZE_RATIO, &FontChain::builtin_only());
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn rendered_line_fits_its_box() {
        let coverage = render_line("Reality", 20., &Typeface::Builtin).unwrap();
        let (height, width) = coverage.dim();

        assert!(height >= 16);
        assert!(width >= 7 * 10);
        assert!(coverage.iter().any(|&c| c == 1.));
    }
}
