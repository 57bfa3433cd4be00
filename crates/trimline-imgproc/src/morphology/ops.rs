use std::collections::VecDeque;

use super::kernels::Kernel;
use crate::padding::{pad_image, Padding2D, PaddingMode};
use rayon::prelude::*;
use trimline_image::{Image, ImageError};

/// The extremum a morphological filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    /// Keep the minimum of the neighborhood.
    Erode,
    /// Keep the maximum of the neighborhood.
    Dilate,
}

impl MorphOp {
    /// Whether `a` wins over (or ties with) `b` for this operation.
    #[inline]
    fn prefers<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            MorphOp::Erode => a <= b,
            MorphOp::Dilate => a >= b,
        }
    }
}

/// Dilate an image using a [`Kernel`].
///
/// Dilation expands bright regions in the image. Each pixel is replaced
/// by the maximum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `padding_mode` - The border handling mode ([`PaddingMode`]).
/// * `constant_value` - The fill value for constant padding.
///
/// # Errors
///
/// Returns [`ImageError`] if the shapes of `src` and `dst` don't match.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + PartialOrd,
{
    morphology(src, dst, kernel, padding_mode, constant_value, MorphOp::Dilate)
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks bright regions in the image. Each pixel is replaced
/// by the minimum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
/// * `padding_mode` - The border handling mode ([`PaddingMode`]).
/// * `constant_value` - The fill value for constant padding.
///
/// # Errors
///
/// Returns [`ImageError`] if the shapes of `src` and `dst` don't match.
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + PartialOrd,
{
    morphology(src, dst, kernel, padding_mode, constant_value, MorphOp::Erode)
}

/// Apply a min or max filter shaped by `kernel`.
///
/// Every kernel row is a contiguous span, so each row contributes a sliding window
/// extremum computed with a monotonic deque. The cost per pixel is proportional to
/// the kernel height instead of its area.
pub fn morphology<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    padding_mode: PaddingMode,
    constant_value: [T; C],
    op: MorphOp,
) -> Result<(), ImageError>
where
    T: Copy + Default + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    if width == 0 || src.height() == 0 {
        return Ok(());
    }

    if kernel.is_empty() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let (pad_h, pad_w) = kernel.pad();
    let padding = Padding2D {
        top: pad_h,
        bottom: kernel.height() - 1 - pad_h,
        left: pad_w,
        right: kernel.width() - 1 - pad_w,
    };
    let padded = pad_image(src, padding, padding_mode, constant_value)?;

    let spans: Vec<(usize, usize, usize)> = kernel
        .row_spans()
        .into_iter()
        .enumerate()
        .filter_map(|(kr, span)| span.map(|(first, last)| (kr, first, last - first + 1)))
        .collect();

    let padded_stride = padded.width() * C;
    let padded_data = padded.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let mut window = VecDeque::new();
            for (i, &(kr, offset, len)) in spans.iter().enumerate() {
                let row_start = (y + kr) * padded_stride;
                let padded_row = &padded_data[row_start..row_start + padded_stride];
                for c in 0..C {
                    fold_sliding_extreme::<T, C>(
                        padded_row,
                        c,
                        offset,
                        len,
                        dst_row,
                        i == 0,
                        op,
                        &mut window,
                    );
                }
            }
        });

    Ok(())
}

/// Fold the extremum of every `len` wide window of `row` into `acc`.
///
/// Window `x` starts at column `offset + x`; there is one window per pixel of `acc`.
#[allow(clippy::too_many_arguments)]
fn fold_sliding_extreme<T, const C: usize>(
    row: &[T],
    c: usize,
    offset: usize,
    len: usize,
    acc: &mut [T],
    overwrite: bool,
    op: MorphOp,
    window: &mut VecDeque<usize>,
) where
    T: Copy + PartialOrd,
{
    let count = acc.len() / C;
    let value = |col: usize| row[col * C + c];

    window.clear();
    for i in 0..count + len - 1 {
        let col = offset + i;
        let v = value(col);
        while let Some(&back) = window.back() {
            if op.prefers(v, value(back)) {
                window.pop_back();
            } else {
                break;
            }
        }
        window.push_back(col);

        if i + 1 < len {
            continue;
        }

        let x = i + 1 - len;
        while let Some(&front) = window.front() {
            if front < offset + x {
                window.pop_front();
            } else {
                break;
            }
        }

        if let Some(&front) = window.front() {
            let extreme = value(front);
            let slot = &mut acc[x * C + c];
            if overwrite || op.prefers(extreme, *slot) {
                *slot = extreme;
            }
        }
    }
}
