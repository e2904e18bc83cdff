use ndarray::Zip;

use crate::{
    error::{Error, Result},
    field::GrayscaleField,
    mask::{BLANK, INK},
};

pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// the masked field along with how much ink the mask suppressed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionResult {
    pub output: GrayscaleField,
    /// samples of the input that are exactly [`INK`].
    pub total_ink_samples: usize,
    /// ink samples that fell inside the masked region.
    pub removed_ink_samples: usize,
}

impl CompositionResult {
    /// fraction of the input ink that was removed, or `0.0` when there was no ink at all.
    pub fn removal_ratio(&self) -> f64 {
        removal_ratio(self.removed_ink_samples, self.total_ink_samples)
    }
}

/// `removed / total`, taken as `0.0` when there is nothing to remove.
pub fn removal_ratio(removed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        removed as f64 / total as f64
    }
}

/// Applies `mask` to a stippled field to build the biased estimate:
/// 1. every coordinate where `mask < threshold` is part of the masked region
/// 1. the output starts as a copy of `stippled`, and the masked region is overwritten with
///    [`BLANK`]
/// 1. ink is counted by exact equality with [`INK`], both overall and inside the masked region
///
/// Samples equal to the threshold are kept. a threshold at or below zero masks nothing and one
/// above one masks everything; neither is an error.
pub fn compose(
    stippled: &GrayscaleField,
    mask: &GrayscaleField,
    threshold: f32,
) -> Result<CompositionResult> {
    if stippled.shape() != mask.shape() {
        return Err(Error::ShapeMismatch {
            stippled: stippled.shape(),
            mask: mask.shape(),
        });
    }

    let mut output = stippled.as_array().clone();
    let mut total_ink_samples = 0;
    let mut removed_ink_samples = 0;

    Zip::from(&mut output)
        .and(stippled.as_array())
        .and(mask.as_array())
        .for_each(|out, &stipple, &region| {
            let masked = region < threshold;
            let ink = stipple == INK;

            if masked {
                *out = BLANK;
            }
            if ink {
                total_ink_samples += 1;
                if masked {
                    removed_ink_samples += 1;
                }
            }
        });

    let result = CompositionResult {
        output: GrayscaleField::from_array_unchecked(output),
        total_ink_samples,
        removed_ink_samples,
    };

    log::debug!(
        "applied mask to {:?}: removed {} of {} stipples ({:.1}%)",
        stippled.shape(),
        result.removed_ink_samples,
        result.total_ink_samples,
        100. * result.removal_ratio()
    );

    Ok(result)
}
