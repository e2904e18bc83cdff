use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// `(height, width)` of a field.
pub type Shape = (usize, usize);

#[derive(Error, Debug)]
pub enum Error {
    /// The stippled field and the mask do not cover the same grid.
    #[error("field shapes must match: stippled {stippled:?} != mask {mask:?}")]
    ShapeMismatch { stippled: Shape, mask: Shape },

    /// No typeface in the chain, including the built-in one, can draw the letter.
    #[error("no renderable font for {letter:?}")]
    FontUnavailable { letter: char },

    #[error("failed to parse font: {0}")]
    FontParse(#[from] ttf_parser::FaceParsingError),

    #[error("unrecognized color: {0:?}")]
    InvalidColor(String),

    #[error("invalid dimensions {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("no panels to assemble")]
    NoPanels,

    #[error("plotting error: {0}")]
    Plot(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}
