use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    color::parse_color,
    error::{Error, Result},
    glyph::{DEFAULT_FONT_CANDIDATES, DEFAULT_SIZE_RATIO, FontChain},
    mask::compose::DEFAULT_THRESHOLD,
    panel::{DEFAULT_BACKGROUND, DEFAULT_DPI, PanelStyle},
};

/// Options for building a selection bias figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Letter whose shape is cut out of the stippled image.
    pub letter: char,
    /// Em size of the letter as a fraction of the smaller image side.
    pub font_size_ratio: f32,
    /// Mask samples strictly below this value are removed from the estimate.
    pub threshold: f32,
    /// Output resolution in dots per inch.
    pub dpi: u32,
    /// Figure background as any CSS color, such as `pink` or `#d3d3d3`.
    pub background_color: String,
    /// Font files tried in order for the letter and the titles.
    pub font_candidates: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            letter: 'S',
            font_size_ratio: DEFAULT_SIZE_RATIO,
            threshold: DEFAULT_THRESHOLD,
            dpi: DEFAULT_DPI,
            background_color: DEFAULT_BACKGROUND.to_string(),
            font_candidates: DEFAULT_FONT_CANDIDATES.iter().copied().map(PathBuf::from).collect(),
        }
    }
}

impl Config {
    /// loads a JSON document, filling any missing field with its default.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        log::debug!("loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::Config(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if !(self.font_size_ratio.is_finite() && self.font_size_ratio > 0.) {
            return Err(Error::Config(format!(
                "font_size_ratio must be positive, got {}",
                self.font_size_ratio
            )));
        }
        if self.dpi == 0 {
            return Err(Error::Config("dpi must be at least 1".to_string()));
        }
        parse_color(&self.background_color)?;

        Ok(())
    }

    pub fn font_chain(&self) -> FontChain {
        FontChain::from_paths(self.font_candidates.iter().cloned())
    }

    pub fn panel_style(&self) -> Result<PanelStyle> {
        PanelStyle::new(self.dpi, &self.background_color, self.font_chain())
    }
}
