//! the grayscale sample grid shared by every stage of the figure.

use image::{DynamicImage, GrayImage, Luma};
use ndarray::{Array2, ArrayView2};

use crate::error::Shape;
use crate::mask::{BLANK, INK};

/// A `height x width` grid of samples in `[0.0, 1.0]`, where `0.0` is ink and `1.0` is blank.
///
/// Samples are indexed `[y, x]`. Every public constructor clamps into the unit interval and
/// maps NaN to blank, so a field never holds an out-of-range sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleField {
    data: Array2<f32>,
}

impl GrayscaleField {
    pub fn from_array(data: Array2<f32>) -> Self {
        Self {
            data: data.mapv(clamp_sample),
        }
    }

    /// wraps samples that are already known to lie in the unit interval.
    pub(crate) fn from_array_unchecked(data: Array2<f32>) -> Self {
        debug_assert!(data.iter().all(|v| (INK..=BLANK).contains(v)));
        Self { data }
    }

    pub fn filled(height: usize, width: usize, value: f32) -> Self {
        Self {
            data: Array2::from_elem((height, width), clamp_sample(value)),
        }
    }

    pub fn blank(height: usize, width: usize) -> Self {
        Self::filled(height, width, BLANK)
    }

    /// builds a field by calling `f(y, x)` for every coordinate.
    pub fn from_shape_fn(
        height: usize,
        width: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Self {
        Self {
            data: Array2::from_shape_fn((height, width), |(y, x)| clamp_sample(f(y, x))),
        }
    }

    /// `(height, width)`
    pub fn shape(&self) -> Shape {
        self.data.dim()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, y: usize, x: usize) -> Option<f32> {
        self.data.get((y, x)).copied()
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f32> {
        self.data
    }

    /// number of samples that hold exactly the ink value.
    pub fn count_ink(&self) -> usize {
        self.data.iter().filter(|&&v| v == INK).count()
    }

    /// normalizes an 8-bit luma image so that 0 maps to ink and 255 to blank.
    pub fn from_luma8(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_array_unchecked(Array2::from_shape_fn(
            (height as usize, width as usize),
            |(y, x)| image.get_pixel(x as _, y as _)[0] as f32 / u8::MAX as f32,
        ))
    }

    /// converts any decoded image to luma before normalizing it.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::from_luma8(&image.to_luma8())
    }

    pub fn to_luma8(&self) -> GrayImage {
        let (height, width) = self.shape();
        GrayImage::from_fn(width as _, height as _, |x, y| {
            Luma([to_u8(self.data[[y as usize, x as usize]])])
        })
    }
}

pub(crate) fn to_u8(sample: f32) -> u8 {
    (sample * u8::MAX as f32).round() as u8
}

fn clamp_sample(value: f32) -> f32 {
    if value.is_nan() {
        BLANK
    } else {
        value.clamp(INK, BLANK)
    }
}
