use crate::parallel;
use trimline_image::{Image, ImageError};

#[inline]
fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 * 77 + g as u16 * 150 + b as u16 * 29) >> 8) as u8
}

/// Convert an RGBA8 image to grayscale, ignoring the alpha channel.
///
/// Y = (77 * R + 150 * G + 29 * B) >> 8
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_imgproc::color::gray_from_rgba_u8;
///
/// let image = Image::<u8, 4>::new([1, 1].into(), vec![255, 255, 255, 0]).unwrap();
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgba_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255]);
/// ```
pub fn gray_from_rgba_u8(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma_u8(src_pixel[0], src_pixel[1], src_pixel[2]);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use trimline_image::{Image, ImageError, ImageSize};

    #[test]
    fn gray_from_rgba_u8() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::new(
            ImageSize {
                width: 1,
                height: 2,
            },
            vec![0, 128, 255, 0, 128, 0, 128, 255],
        )?;

        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        super::gray_from_rgba_u8(&image, &mut gray)?;
        assert_eq!(gray.as_slice(), &[103, 53]);

        Ok(())
    }

    #[test]
    fn gray_from_rgba_u8_ignores_alpha() -> Result<(), ImageError> {
        let rgba = Image::<u8, 4>::new([2, 1].into(), vec![10, 20, 30, 0, 200, 100, 50, 255])?;
        let mut gray = Image::<u8, 1>::from_size_val(rgba.size(), 0)?;
        super::gray_from_rgba_u8(&rgba, &mut gray)?;

        assert_eq!(
            gray.as_slice(),
            &[super::luma_u8(10, 20, 30), super::luma_u8(200, 100, 50)]
        );
        Ok(())
    }

    #[test]
    fn gray_from_rgba_u8_size_mismatch() -> Result<(), ImageError> {
        let rgba = Image::<u8, 4>::from_size_val([2, 2].into(), 0)?;
        let mut gray = Image::<u8, 1>::from_size_val([2, 1].into(), 0)?;
        assert!(super::gray_from_rgba_u8(&rgba, &mut gray).is_err());
        Ok(())
    }
}
