use image::{ImageBuffer, Luma, imageops::FilterType};
use ndarray::Array2;

use crate::{
    error::{Error, Result},
    field::GrayscaleField,
};

/// where a scaled image lands inside a fixed-size box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub original_dims: (u32, u32),
    pub processed_dims: (u32, u32),
    // padding for each side represented as (pad_left, pad_top, pad_right, pad_bottom)
    pub padding: (u32, u32, u32, u32),
}

/// Scale `(width, height)` to the largest size that fits in `bounds` without changing the aspect
/// ratio. the leftover space is split evenly, with any odd pixel going to the right & bottom.
pub fn fit_within(original_dims: (u32, u32), bounds: (u32, u32)) -> Placement {
    let (width, height) = original_dims;
    let (max_width, max_height) = bounds;

    let processed_dims = if width == 0 || height == 0 {
        (0, 0)
    } else {
        let scale = f64::min(
            max_width as f64 / width as f64,
            max_height as f64 / height as f64,
        );
        (
            ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1)),
            ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1)),
        )
    };

    let extra_x = max_width.saturating_sub(processed_dims.0);
    let extra_y = max_height.saturating_sub(processed_dims.1);
    let (pad_left, pad_top) = (extra_x / 2, extra_y / 2);

    Placement {
        original_dims,
        processed_dims,
        padding: (pad_left, pad_top, extra_x - pad_left, extra_y - pad_top),
    }
}

/// Resample a field to `height x width` with a Lanczos3 kernel. the result is clamped back into
/// the unit interval since the kernel overshoots around hard edges.
pub fn resize_field(field: &GrayscaleField, height: usize, width: usize) -> Result<GrayscaleField> {
    let (src_height, src_width) = field.shape();
    if field.is_empty() {
        return Err(Error::InvalidDimensions {
            height: src_height,
            width: src_width,
        });
    }
    if height == 0 || width == 0 {
        return Err(Error::InvalidDimensions { height, width });
    }
    if field.shape() == (height, width) {
        return Ok(field.clone());
    }

    let samples: Vec<f32> = field.as_array().iter().copied().collect();
    let buffer =
        ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(src_width as _, src_height as _, samples)
            .ok_or(Error::InvalidDimensions {
                height: src_height,
                width: src_width,
            })?;

    log::trace!(
        "resampling {}x{} -> {}x{}",
        src_height,
        src_width,
        height,
        width
    );

    let resized = image::imageops::resize(&buffer, width as _, height as _, FilterType::Lanczos3);
    let data = Array2::from_shape_vec((height, width), resized.into_raw())
        .map_err(|_| Error::InvalidDimensions { height, width })?;

    Ok(GrayscaleField::from_array(data))
}
