use rayon::prelude::*;
use trimline_image::{Image, ImageError, ImageSize};

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// This border type fills the border with a single, constant color value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// This border type takes the outermost row or column of pixels and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,
}

impl PaddingMode {
    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the padding mode.
    ///
    /// `Constant` returns 0 since the border is never read back from the source.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Constant => 0,
        }
    }

    fn apply_padding<T: Copy + Send + Sync, const C: usize>(
        &self,
        new_data: &mut [T],
        old_size: ImageSize,
        new_size: ImageSize,
        padding: &Padding2D,
    ) {
        if let PaddingMode::Constant = self {
            return; // already filled
        }

        let row_stride = new_size.width * C;

        // top
        {
            let (top_section, rest) = new_data.split_at_mut(padding.top * row_stride);

            top_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    let src_y = self.map_index(y as isize - padding.top as isize, old_size.height);
                    let src_row = &rest[src_y * row_stride..(src_y + 1) * row_stride];
                    dst_row.copy_from_slice(src_row);
                });
        }

        // bottom
        {
            let split_point = (new_size.height - padding.bottom) * row_stride;
            let (rest, bottom_section) = new_data.split_at_mut(split_point);

            bottom_section
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(idx, dst_row)| {
                    let y = new_size.height - padding.bottom + idx;
                    let src_y = self.map_index(y as isize - padding.top as isize, old_size.height);
                    let src_start = (src_y + padding.top) * row_stride;
                    dst_row.copy_from_slice(&rest[src_start..src_start + row_stride]);
                });
        }

        new_data.par_chunks_exact_mut(row_stride).for_each(|row| {
            // left
            for x in 0..padding.left {
                let src_x = self.map_index(x as isize - padding.left as isize, old_size.width);
                let src_idx = (padding.left + src_x) * C;
                row.copy_within(src_idx..src_idx + C, x * C);
            }

            // right
            for x in (new_size.width - padding.right)..new_size.width {
                let src_x = self.map_index(x as isize - padding.left as isize, old_size.width);
                let src_idx = (padding.left + src_x) * C;
                row.copy_within(src_idx..src_idx + C, x * C);
            }
        });
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same padding on every side.
    pub fn uniform(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// The size of an image of `old_size` once this padding is applied.
    pub fn padded_size(&self, old_size: ImageSize) -> ImageSize {
        ImageSize {
            width: old_size.width + self.left + self.right,
            height: old_size.height + self.top + self.bottom,
        }
    }

    /// Validates that a new image size correctly matches the expected dimensions
    /// after applying this padding to an existing image.
    ///
    /// # Example
    /// ```rust
    /// use trimline_image::ImageSize;
    /// use trimline_imgproc::padding::Padding2D;
    /// let padding = Padding2D { top: 1, bottom: 1, left: 2, right: 2 };
    /// let old_size = ImageSize { width: 4, height: 4 };
    /// let new_size = ImageSize { width: 8, height: 6 };
    ///
    /// assert!(padding.validate_size(old_size, new_size));
    /// ```
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        self.padded_size(old_size) == new_size
    }
}

/// Copies `src` into the center of `dst` and fills the border according to `padding_mode`.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image where the padded output will be stored.
/// * `padding` - The amount of padding (in pixels) for all four sides.
/// * `padding_mode` - The type of border handling to use defined in [`PaddingMode`].
/// * `constant_value` - The pixel value used for constant padding, one value per channel.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match with the expected size
/// i.e. after applying padding specified in argument `padding` on `src`.
///
/// # Example
///
/// ```rust
/// use trimline_image::{ImageSize, Image};
/// use trimline_imgproc::padding::{PaddingMode, Padding2D, spatial_padding};
///
/// let src = Image::<u8, 3>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![1u8; 2 * 2 * 3],
/// ).unwrap();
///
/// let mut dst = Image::<u8, 3>::from_size_val(ImageSize { width: 4, height: 4 }, 0).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::uniform(1), PaddingMode::Constant, [0u8; 3]).unwrap();
///
/// assert_eq!(dst.as_slice()[0..3], [0, 0, 0]);
/// assert_eq!(dst.as_slice()[15..18], [1, 1, 1]);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        let expected = padding.padded_size(src.size());
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }

    let old_size = src.size();
    let new_size = dst.size();
    let new_data = dst.as_slice_mut();

    new_data
        .chunks_exact_mut(C)
        .for_each(|chunk| chunk.copy_from_slice(&constant_value));

    // nothing to replicate from an empty source
    if old_size.width == 0 || old_size.height == 0 {
        return Ok(());
    }

    // copy old image data as center of new image data
    let new_stride = new_size.width * C;
    let old_stride = old_size.width * C;
    let row_offset = padding.top * new_stride + padding.left * C;

    for (src_row, dst_row) in src
        .as_slice()
        .chunks_exact(old_stride)
        .zip(new_data[row_offset..].chunks_exact_mut(new_stride))
    {
        dst_row[..old_stride].copy_from_slice(src_row);
    }

    padding_mode.apply_padding::<T, C>(new_data, old_size, new_size, &padding);

    Ok(())
}

/// Allocate a padded copy of `src`.
///
/// Convenience wrapper around [`spatial_padding`] that creates the destination image.
pub fn pad_image<T, const C: usize>(
    src: &Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let mut dst = Image::from_size_val(padding.padded_size(src.size()), T::default())?;
    spatial_padding(src, &mut dst, padding, padding_mode, constant_value)?;
    Ok(dst)
}
