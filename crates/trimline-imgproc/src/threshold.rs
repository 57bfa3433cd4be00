use num_traits::Zero;
use std::cmp::PartialOrd;

use trimline_image::{Image, ImageError};

use crate::parallel;

/// The type of thresholding to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdType {
    /// Values above the threshold become `max_value`, the rest zero.
    Binary,
    /// Values above the threshold become zero, the rest `max_value`.
    BinaryInv,
}

/// Apply a binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use trimline_image::{Image, ImageSize};
/// use trimline_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Apply an inverse binary threshold to an image.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The value to use when the input value is not greater than the threshold.
pub fn threshold_binary_inverse<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            T::zero()
        } else {
            max_value
        };
    });

    Ok(())
}

/// Pick the threshold that maximizes the between-class variance of `src`.
///
/// All channels contribute to the same histogram. Returns 0 for images with a
/// single intensity.
pub fn otsu_level<const C: usize>(src: &Image<u8, C>) -> u8 {
    const BINS: usize = 256;
    let mut histogram = [0u32; BINS];
    for &pixel in src.as_slice() {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = src.as_slice().len() as f64;
    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut best_variance = 0.0;
    let mut best_threshold = 0u8;
    let mut weight_back = 0.0;
    let mut sum_back = 0.0;

    for (level, &hist_count) in histogram.iter().enumerate() {
        weight_back += hist_count as f64;
        sum_back += level as f64 * hist_count as f64;

        // skip empty classes
        if weight_back == 0.0 || weight_back == total_pixels {
            continue;
        }

        let weight_fore = total_pixels - weight_back;
        let mean_back = sum_back / weight_back;
        let mean_fore = (sum_total - sum_back) / weight_fore;
        let variance = weight_back * weight_fore * (mean_back - mean_fore).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = level as u8;
        }
    }

    best_threshold
}

/// Threshold an image with a level chosen by Otsu's method.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `thres_type` - Whether the foreground is above or below the level.
/// * `max_value` - The value written for the selected class.
///
/// # Returns
///
/// The chosen threshold level.
///
/// # Examples
///
/// ```
/// use trimline_image::{Image, ImageSize};
/// use trimline_imgproc::threshold::{otsu_threshold, ThresholdType};
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// let level = otsu_threshold(&image, &mut thresholded, ThresholdType::Binary, 255).unwrap();
/// assert_eq!(level, 100);
/// assert_eq!(thresholded.as_slice(), [0, 255, 0, 255, 255, 255]);
/// ```
pub fn otsu_threshold<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    thres_type: ThresholdType,
    max_value: u8,
) -> Result<u8, ImageError> {
    let level = otsu_level(src);
    log::trace!("otsu level {level}");

    match thres_type {
        ThresholdType::Binary => threshold_binary(src, dst, level, max_value)?,
        ThresholdType::BinaryInv => threshold_binary_inverse(src, dst, level, max_value)?,
    }

    Ok(level)
}

#[cfg(test)]
mod tests {
    use trimline_image::{Image, ImageError, ImageSize};

    use super::ThresholdType;

    fn sample() -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![100u8, 200, 50, 150, 200, 250],
        )
    }

    #[test]
    fn threshold_binary() -> Result<(), ImageError> {
        let image = sample()?;
        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;
        super::threshold_binary(&image, &mut thresholded, 100, 255)?;
        assert_eq!(thresholded.as_slice(), [0u8, 255, 0, 255, 255, 255]);
        Ok(())
    }

    #[test]
    fn threshold_binary_inverse() -> Result<(), ImageError> {
        let image = sample()?;
        let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0)?;
        super::threshold_binary_inverse(&image, &mut thresholded, 100, 255)?;
        assert_eq!(thresholded.as_slice(), [255u8, 0, 255, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn threshold_size_mismatch() -> Result<(), ImageError> {
        let image = sample()?;
        let mut wrong = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        assert!(super::threshold_binary(&image, &mut wrong, 1, 255).is_err());
        Ok(())
    }

    #[test]
    fn test_otsu_dark_shape_on_light_background() -> Result<(), ImageError> {
        let mut data = vec![240u8; 8 * 8];
        for y in 2..6 {
            for x in 2..6 {
                data[y * 8 + x] = 20;
            }
        }
        let image = Image::<u8, 1>::new([8, 8].into(), data)?;
        let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        let level = super::otsu_threshold(&image, &mut mask, ThresholdType::BinaryInv, 255)?;
        assert!((20..240).contains(&level));
        assert_eq!(mask.as_slice().iter().filter(|&&v| v == 255).count(), 16);
        assert_eq!(mask.get([3, 3, 0]), Some(&255));
        assert_eq!(mask.get([0, 0, 0]), Some(&0));
        Ok(())
    }

    #[test]
    fn test_otsu_flat_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val([4, 4].into(), 77)?;
        assert_eq!(super::otsu_level(&image), 0);
        Ok(())
    }
}
