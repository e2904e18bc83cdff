//! lays labeled fields out side by side and writes the figure to disk.

use std::path::Path;

use image::{ImageError, Rgb, RgbImage};
use itertools::Itertools;
use ndarray::Array2;
use plotters::{coord::Shift, prelude::*};

use crate::{
    color::parse_color,
    error::{Error, Result},
    field::{GrayscaleField, to_u8},
    glyph::{FontChain, render_line},
    imageops::{fit_within, resize_field},
};

/// titles of the selection bias figure, left to right.
pub const PANEL_LABELS: [&str; 4] = ["Reality", "Your Model", "Selection Bias", "Estimate"];

pub const DEFAULT_DPI: u32 = 150;
pub const DEFAULT_BACKGROUND: &str = "white";

const FIGURE_WIDTH_INCHES: f32 = 16.;
const FIGURE_HEIGHT_INCHES: f32 = 4.;
const POINTS_PER_INCH: f32 = 72.;
const TITLE_POINTS: f32 = 14.;
const TITLE_PAD_POINTS: f32 = 10.;
const OUTER_PAD_POINTS: f32 = 14.;
const GUTTER_POINTS: f32 = 14.;

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub field: GrayscaleField,
    pub label: String,
}

impl Panel {
    pub fn new(field: GrayscaleField, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelStyle {
    pub dpi: u32,
    pub background: Rgb<u8>,
    /// typefaces tried for the titles.
    pub fonts: FontChain,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            background: Rgb([u8::MAX; 3]),
            fonts: FontChain::system_defaults(),
        }
    }
}

impl PanelStyle {
    pub fn new(dpi: u32, background: &str, fonts: FontChain) -> Result<Self> {
        Ok(Self {
            dpi,
            background: parse_color(background)?,
            fonts,
        })
    }

    fn points(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }
}

/// Bring every panel to the shape of the first one. panels rendered at other sizes are resampled
/// rather than rejected.
pub fn reconcile(panels: &[Panel]) -> Result<Vec<GrayscaleField>> {
    let first = panels.first().ok_or(Error::NoPanels)?;
    let (height, width) = first.field.shape();
    if first.field.is_empty() {
        return Err(Error::InvalidDimensions { height, width });
    }

    panels
        .iter()
        .map(|panel| {
            if panel.field.shape() == (height, width) {
                return Ok(panel.field.clone());
            }
            log::warn!(
                "panel {:?} has shape {:?}, resampling to {:?}",
                panel.label,
                panel.field.shape(),
                (height, width)
            );
            resize_field(&panel.field, height, width)
        })
        .collect()
}

/// Render the panels in a single row with a bold title above each one. the figure is
/// `16 x 4` inches at `style.dpi`, split evenly into one column per panel, and each image is
/// scaled to fit its column.
pub fn render(panels: &[Panel], style: &PanelStyle) -> Result<RgbImage> {
    let fields = reconcile(panels)?;

    let labels = panels.iter().map(|panel| panel.label.as_str()).join("");
    let typeface = style.fonts.resolve(&labels)?;
    let titles: Vec<Array2<f32>> = panels
        .iter()
        .map(|panel| render_line(&panel.label, style.points(TITLE_POINTS), &typeface))
        .collect::<Result<_>>()?;

    let width = (FIGURE_WIDTH_INCHES * style.dpi as f32).round() as u32;
    let height = (FIGURE_HEIGHT_INCHES * style.dpi as f32).round() as u32;
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions {
            height: height as usize,
            width: width as usize,
        });
    }

    let pad = style.points(OUTER_PAD_POINTS).round() as u32;
    let gutter = style.points(GUTTER_POINTS).round() as u32;
    let title_band = titles.iter().map(|title| title.nrows() as u32).max().unwrap_or(0)
        + style.points(TITLE_PAD_POINTS).round() as u32;

    log::debug!(
        "figure {}x{} px at {} dpi, {} panels under a {} px title band",
        width,
        height,
        style.dpi,
        panels.len(),
        title_band
    );

    let Rgb([r, g, b]) = style.background;
    let mut buffer = vec![0; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&RGBColor(r, g, b))?;

        let columns = root.margin(pad, pad, pad, pad).split_evenly((1, panels.len()));
        for ((column, field), title) in columns.iter().zip_eq(&fields).zip_eq(&titles) {
            let (title_area, image_area) = column.split_vertically(title_band);
            draw_title(&title_area, title, style.background)?;
            draw_field(&image_area.margin(0, 0, gutter / 2, gutter / 2), field)?;
        }

        root.present()?;
    }

    RgbImage::from_raw(width, height, buffer).ok_or(Error::InvalidDimensions {
        height: height as usize,
        width: width as usize,
    })
}

/// Render the figure and write it to `output_path`, with the format picked from the extension.
pub fn assemble(panels: &[Panel], output_path: impl AsRef<Path>, style: &PanelStyle) -> Result<()> {
    let output_path = output_path.as_ref();
    let figure = render(panels, style)?;

    figure.save(output_path).map_err(|e| match e {
        ImageError::IoError(e) => Error::Io(e),
        e => Error::Image(e),
    })?;
    log::info!("Saved figure to {:?}", output_path);

    Ok(())
}

/// scales `field` to fit `area` and draws it centered, one gray pixel per sample.
fn draw_field<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    field: &GrayscaleField,
) -> Result<()> {
    let (height, width) = field.shape();
    let placement = fit_within((width as u32, height as u32), area.dim_in_pixel());
    let (scaled_width, scaled_height) = placement.processed_dims;
    let scaled = resize_field(field, scaled_height as usize, scaled_width as usize)?;

    let (pad_left, pad_top, _, _) = placement.padding;
    for ((row, col), &sample) in scaled.as_array().indexed_iter() {
        let shade = to_u8(sample);
        let position = ((pad_left as usize + col) as i32, (pad_top as usize + row) as i32);
        area.draw_pixel(position, &RGBColor(shade, shade, shade))?;
    }

    Ok(())
}

/// darkens `background` toward black in proportion to the title's coverage, centered
/// horizontally and clipped to the area.
fn draw_title<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    coverage: &Array2<f32>,
    background: Rgb<u8>,
) -> Result<()> {
    let (area_width, _) = area.dim_in_pixel();
    let left = (area_width as i32 - coverage.ncols() as i32) / 2;

    for ((row, col), &ink) in coverage.indexed_iter() {
        let x = left + col as i32;
        if ink <= 0. || !(0..area_width as i32).contains(&x) {
            continue;
        }
        let [r, g, b] = background.0.map(|channel| (channel as f32 * (1. - ink)).round() as u8);
        area.draw_pixel((x, row as i32), &RGBColor(r, g, b))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(dpi: u32) -> PanelStyle {
        PanelStyle::new(dpi, "white", FontChain::builtin_only()).unwrap()
    }

    fn panels(fields: [GrayscaleField; 4]) -> Vec<Panel> {
        fields
            .into_iter()
            .zip(PANEL_LABELS)
            .map(|(field, label)| Panel::new(field, label))
            .collect()
    }

    #[test]
    fn reconcile_resamples_to_the_first_shape() {
        let panels = panels([
            GrayscaleField::blank(10, 20),
            GrayscaleField::blank(5, 5),
            GrayscaleField::filled(10, 20, 0.),
            GrayscaleField::blank(30, 10),
        ]);

        let fields = reconcile(&panels).unwrap();

        assert!(fields.iter().all(|field| field.shape() == (10, 20)));
        assert_eq!(fields[2], panels[2].field);
    }

    #[test]
    fn reconcile_needs_panels() {
        assert!(matches!(reconcile(&[]), Err(Error::NoPanels)));
    }

    #[test]
    fn figure_size_follows_dpi() {
        let panels = panels(std::array::from_fn(|_| GrayscaleField::blank(8, 8)));

        let figure = render(&panels, &style(20)).unwrap();

        // 16 x 4 inches
        assert_eq!(figure.dimensions(), (320, 80));
    }

    #[test]
    fn titles_and_images_land_on_the_background() {
        let panels = panels(std::array::from_fn(|_| GrayscaleField::filled(8, 8, 0.)));
        let style = PanelStyle::new(40, "pink", FontChain::builtin_only()).unwrap();

        let figure = render(&panels, &style).unwrap();

        assert_eq!(*figure.get_pixel(0, 0), Rgb([255, 192, 203]));
        assert!(figure.pixels().any(|pixel| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn each_panel_stays_in_its_column() {
        let panels = panels([
            GrayscaleField::filled(8, 8, 0.),
            GrayscaleField::blank(8, 8),
            GrayscaleField::blank(8, 8),
            GrayscaleField::blank(8, 8),
        ]);
        let style = PanelStyle::new(40, "pink", FontChain::builtin_only()).unwrap();

        let figure = render(&panels, &style).unwrap();
        let (width, height) = figure.dimensions();
        let black = |x| *figure.get_pixel(x, height / 2) == Rgb([0, 0, 0]);

        // only the first quarter of the figure holds the dark image
        assert!((0..width / 4).any(black));
        assert!(!(width / 4..width).any(black));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let panels = panels(std::array::from_fn(|_| GrayscaleField::blank(8, 8)));
        let result = render(&panels, &style(0));
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }
}
