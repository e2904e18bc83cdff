use image::Rgb;

use crate::error::{Error, Result};

/// Parses a CSS color: any of the CSS named colors, `#rgb` / `#rrggbb` hex, or the functional
/// `rgb()` / `hsl()` forms. case and surrounding whitespace are ignored, and alpha is dropped
/// since the figure is written without transparency.
pub fn parse_color(value: &str) -> Result<Rgb<u8>> {
    let normalized = value.trim().to_ascii_lowercase();

    let color = csscolorparser::parse(&normalized).map_err(|e| {
        log::debug!("rejecting color {:?}: {}", value, e);
        Error::InvalidColor(value.to_string())
    })?;
    let [r, g, b, _] = color.to_rgba8();

    Ok(Rgb([r, g, b]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_ignore_case() {
        assert_eq!(parse_color("White").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color(" pink ").unwrap(), Rgb([255, 192, 203]));
        assert_eq!(parse_color("lightgrey").unwrap(), parse_color("LightGray").unwrap());
    }

    #[test]
    fn every_css_name_is_known() {
        assert_eq!(parse_color("red").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_color("rebeccapurple").unwrap(), Rgb([102, 51, 153]));
        assert_eq!(parse_color("PapayaWhip").unwrap(), Rgb([255, 239, 213]));
        assert_eq!(parse_color("darkslategrey").unwrap(), Rgb([47, 79, 79]));
    }

    #[test]
    fn hex_and_functional_colors() {
        assert_eq!(parse_color("#1a2B3c").unwrap(), Rgb([0x1a, 0x2b, 0x3c]));
        assert_eq!(parse_color("#f0a").unwrap(), Rgb([0xff, 0x00, 0xaa]));
        assert_eq!(parse_color("rgb(10, 20, 30)").unwrap(), Rgb([10, 20, 30]));
    }

    #[test]
    fn unknown_colors_are_rejected() {
        for value in ["", "chartreuse-ish", "#12", "#gggggg", "#1234567"] {
            assert!(
                matches!(parse_color(value), Err(Error::InvalidColor(v)) if v == value),
                "{value:?}"
            );
        }
    }
}
