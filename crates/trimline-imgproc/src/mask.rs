use trimline_image::{Image, ImageError};

use crate::alpha::ALPHA_CHANNEL;
use crate::color::gray_from_rgba_u8;
use crate::threshold::{otsu_threshold, threshold_binary, ThresholdType};

/// Alpha values above this level count as opaque when building a mask.
pub const ALPHA_MASK_THRESHOLD: u8 = 10;

/// Derive a {0, 255} foreground mask from an RGBA8 image.
///
/// With `has_alpha`, foreground is every pixel whose alpha is above
/// [`ALPHA_MASK_THRESHOLD`]. Otherwise the image is assumed to be a dark shape on
/// a light background: it is converted to grayscale and thresholded with Otsu's
/// level, dark pixels becoming foreground.
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_imgproc::mask::binary_mask;
///
/// let img = Image::<u8, 4>::new([2, 1].into(), vec![0, 0, 0, 11, 0, 0, 0, 10]).unwrap();
/// let mask = binary_mask(&img, true).unwrap();
/// assert_eq!(mask.as_slice(), &[255, 0]);
/// ```
pub fn binary_mask(src: &Image<u8, 4>, has_alpha: bool) -> Result<Image<u8, 1>, ImageError> {
    let mut mask = Image::from_size_val(src.size(), 0u8)?;

    if has_alpha {
        let alpha = src.channel(ALPHA_CHANNEL)?;
        threshold_binary(&alpha, &mut mask, ALPHA_MASK_THRESHOLD, u8::MAX)?;
    } else {
        let mut gray = Image::from_size_val(src.size(), 0u8)?;
        gray_from_rgba_u8(src, &mut gray)?;
        let level = otsu_threshold(&gray, &mut mask, ThresholdType::BinaryInv, u8::MAX)?;
        log::debug!("luminance mask with otsu level {level}");
    }

    Ok(mask)
}
