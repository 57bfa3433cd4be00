#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Built-in backdrop keying segmenter.
pub mod background;

/// Error types for the cutout module.
pub mod error;

/// Alpha clean-up and stroke synthesis of cutouts.
pub mod postprocess;

/// The segmentation collaborator.
pub mod segmenter;

pub use background::BackgroundKeySegmenter;
pub use error::CutoutError;
pub use postprocess::{post_process, CutoutParams};
pub use segmenter::{Segmenter, SharedSegmenter};

use trimline_core::{DegradeReason, Outcome};
use trimline_image::Image;

/// Segment an image and post-process the cutout.
///
/// Failures never surface as errors: when the segmenter fails, returns an image
/// of another size, or post-processing fails, the result is degraded and holds
/// a copy of the input image.
///
/// # Example
///
/// ```
/// use trimline_cutout::{cutout, BackgroundKeySegmenter, CutoutParams};
/// use trimline_image::Image;
///
/// let img = Image::<u8, 4>::from_size_val([8, 8].into(), 255).unwrap();
/// let result = cutout(&mut BackgroundKeySegmenter::default(), &img, &CutoutParams::default());
/// assert!(!result.is_degraded());
/// ```
pub fn cutout<S: Segmenter + ?Sized>(
    segmenter: &mut S,
    image: &Image<u8, 4>,
    params: &CutoutParams,
) -> Outcome<Image<u8, 4>> {
    let fallback = |reason: DegradeReason| {
        log::warn!("cutout kept the input image: {reason}");
        Outcome::Degraded {
            value: image.clone(),
            reason,
        }
    };

    let segmented = match segmenter.segment(image) {
        Ok(segmented) if segmented.size() == image.size() => segmented,
        Ok(segmented) => {
            let err = CutoutError::SizeMismatch {
                expected: image.size(),
                actual: segmented.size(),
            };
            return fallback(DegradeReason::SegmentationFailed(err.to_string()));
        }
        Err(err) => return fallback(DegradeReason::SegmentationFailed(err.to_string())),
    };

    match post_process(&segmented, params) {
        Ok(processed) => Outcome::Complete(processed),
        Err(err) => fallback(DegradeReason::PostProcessFailed(err.to_string())),
    }
}
