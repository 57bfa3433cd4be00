use trimline_image::{Image, ImageError};

use crate::parallel;

/// Composite `over` on top of `under` with the Porter-Duff "over" operator.
///
/// Both images are straight (non premultiplied) RGBA8:
///
/// out_a = a_o + a_u * (1 - a_o)
/// out_rgb = (rgb_o * a_o + rgb_u * a_u * (1 - a_o)) / out_a
///
/// Fully transparent results are written as `[0, 0, 0, 0]`.
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_imgproc::composite::alpha_composite;
///
/// let under = Image::<u8, 4>::new([1, 1].into(), vec![0, 0, 255, 255]).unwrap();
/// let over = Image::<u8, 4>::new([1, 1].into(), vec![255, 0, 0, 0]).unwrap();
///
/// let out = alpha_composite(&under, &over).unwrap();
/// assert_eq!(out.as_slice(), &[0, 0, 255, 255]);
/// ```
pub fn alpha_composite(
    under: &Image<u8, 4>,
    over: &Image<u8, 4>,
) -> Result<Image<u8, 4>, ImageError> {
    if under.size() != over.size() {
        return Err(ImageError::InvalidImageSize(
            over.cols(),
            over.rows(),
            under.cols(),
            under.rows(),
        ));
    }

    let mut dst = Image::from_size_val(under.size(), 0u8)?;

    parallel::par_iter_rows_two(under, over, &mut dst, |u, o, out| {
        let a_o = o[3] as f32 / 255.0;
        let a_u = u[3] as f32 / 255.0;
        let a_out = a_o + a_u * (1.0 - a_o);
        if a_out <= 0.0 {
            out.fill(0);
            return;
        }

        for c in 0..3 {
            let v = (o[c] as f32 * a_o + u[c] as f32 * a_u * (1.0 - a_o)) / a_out;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (a_out * 255.0).round().clamp(0.0, 255.0) as u8;
    });

    Ok(dst)
}

/// A layer of one solid `color` whose alpha channel is `mask`.
pub fn solid_layer(mask: &Image<u8, 1>, color: [u8; 3]) -> Result<Image<u8, 4>, ImageError> {
    let mut dst = Image::from_size_val(mask.size(), 0u8)?;

    parallel::par_iter_rows(mask, &mut dst, |m, out| {
        out[..3].copy_from_slice(&color);
        out[3] = m[0];
    });

    Ok(dst)
}
