//! Operations on the alpha channel of RGBA8 images.
//!
//! The color channels are never modified by anything in this module.

use trimline_image::{Image, ImageError};

use crate::morphology::{self, Kernel, KernelShape, MorphOp};
use crate::padding::PaddingMode;
use crate::threshold::threshold_binary;

/// Index of the alpha channel in an RGBA image.
pub const ALPHA_CHANNEL: usize = 3;

/// Replace the alpha channel of `src` with `f(alpha)`.
///
/// # Errors
///
/// Fails if `f` fails or returns a mask of a different size.
pub fn map_alpha<F>(src: &Image<u8, 4>, f: F) -> Result<Image<u8, 4>, ImageError>
where
    F: FnOnce(&Image<u8, 1>) -> Result<Image<u8, 1>, ImageError>,
{
    let alpha = src.channel(ALPHA_CHANNEL)?;
    let new_alpha = f(&alpha)?;
    let mut dst = src.clone();
    dst.set_channel(ALPHA_CHANNEL, &new_alpha)?;
    Ok(dst)
}

/// Whether any pixel of `src` is not fully opaque.
pub fn has_transparency(src: &Image<u8, 4>) -> bool {
    src.as_slice()
        .chunks_exact(4)
        .any(|px| px[ALPHA_CHANNEL] != u8::MAX)
}

/// Number of pixels whose alpha is strictly above `threshold`.
pub fn count_opaque(src: &Image<u8, 4>, threshold: u8) -> usize {
    src.as_slice()
        .chunks_exact(4)
        .filter(|px| px[ALPHA_CHANNEL] > threshold)
        .count()
}

/// A square window of radius `radius`, capped at the larger image side.
///
/// Past that radius every window already covers the whole image, so the
/// result of a min or max filter no longer changes.
fn box_window(radius: usize, src: &Image<u8, 4>) -> Kernel {
    let radius = radius.min(src.width().max(src.height()));
    Kernel::new(KernelShape::Box {
        size: 2 * radius + 1,
    })
}

/// Shrink the opaque region of an image by `shrink_px` pixels.
///
/// Applies a minimum filter with a square window of `2 * shrink_px + 1` to the
/// alpha channel. Pixels outside the canvas replicate the nearest edge pixel, so
/// an image that is opaque up to its border keeps its border opaque.
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_imgproc::alpha::shrink_alpha;
///
/// let img = Image::<u8, 4>::new([3, 1].into(), vec![
///     9, 9, 9, 0,
///     9, 9, 9, 255,
///     9, 9, 9, 255,
/// ]).unwrap();
///
/// let shrunk = shrink_alpha(&img, 1).unwrap();
/// assert_eq!(shrunk.as_slice(), &[9, 9, 9, 0, 9, 9, 9, 0, 9, 9, 9, 255]);
/// ```
pub fn shrink_alpha(src: &Image<u8, 4>, shrink_px: usize) -> Result<Image<u8, 4>, ImageError> {
    if shrink_px == 0 {
        return Ok(src.clone());
    }

    let kernel = box_window(shrink_px, src);

    map_alpha(src, |alpha| {
        let mut dst = Image::from_size_val(alpha.size(), 0u8)?;
        morphology::erode(alpha, &mut dst, &kernel, PaddingMode::Replicate, [u8::MAX])?;
        Ok(dst)
    })
}

/// Binarize the alpha channel: values above `threshold` become 255, the rest 0.
pub fn binarize_alpha(src: &Image<u8, 4>, threshold: u8) -> Result<Image<u8, 4>, ImageError> {
    map_alpha(src, |alpha| {
        let mut dst = Image::from_size_val(alpha.size(), 0u8)?;
        threshold_binary(alpha, &mut dst, threshold, u8::MAX)?;
        Ok(dst)
    })
}

/// Move the edge of the opaque region by `shift` pixels.
///
/// A positive shift erodes the alpha channel, a negative shift dilates it, both
/// with a square window of `2 * |shift| + 1`. The canvas border never contributes
/// to the result.
pub fn shift_alpha_edge(src: &Image<u8, 4>, shift: i32) -> Result<Image<u8, 4>, ImageError> {
    if shift == 0 {
        return Ok(src.clone());
    }

    let kernel = box_window(shift.unsigned_abs() as usize, src);
    let (op, border) = if shift > 0 {
        (MorphOp::Erode, u8::MAX)
    } else {
        (MorphOp::Dilate, 0)
    };

    map_alpha(src, |alpha| {
        let mut dst = Image::from_size_val(alpha.size(), 0u8)?;
        morphology::morphology(alpha, &mut dst, &kernel, PaddingMode::Constant, [border], op)?;
        Ok(dst)
    })
}
