pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod glyph;
pub mod imageops;
pub mod mask;
pub mod panel;
pub mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use field::GrayscaleField;
pub use mask::compose::{CompositionResult, DEFAULT_THRESHOLD, compose};
pub use pipeline::{Pipeline, Report};
