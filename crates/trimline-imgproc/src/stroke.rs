use std::str::FromStr;

use trimline_image::{Image, ImageError};

use crate::alpha::ALPHA_CHANNEL;
use crate::composite::{alpha_composite, solid_layer};
use crate::morphology::{dilate, erode, Kernel, KernelShape};
use crate::padding::{pad_image, Padding2D, PaddingMode};
use crate::parallel;

/// Extra transparent margin added around the stroke so it is never clipped.
pub const STROKE_MARGIN: usize = 5;

/// Where the stroke sits relative to the shape boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePosition {
    /// Entirely outside the shape, drawn behind it.
    #[default]
    Outer,
    /// Entirely inside the shape, drawn on top of it.
    Inner,
    /// Straddling the boundary, drawn on top of the shape.
    Center,
}

impl StrokePosition {
    /// The lowercase name of the position.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrokePosition::Outer => "outer",
            StrokePosition::Inner => "inner",
            StrokePosition::Center => "center",
        }
    }
}

impl std::fmt::Display for StrokePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown stroke position name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown stroke position {0:?}, expected outer, inner or center")]
pub struct ParseStrokePositionError(pub String);

impl FromStr for StrokePosition {
    type Err = ParseStrokePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outer" => Ok(StrokePosition::Outer),
            "inner" => Ok(StrokePosition::Inner),
            "center" | "centre" => Ok(StrokePosition::Center),
            _ => Err(ParseStrokePositionError(s.to_string())),
        }
    }
}

/// A disc of radius `radius`, capped at the half perimeter of `alpha`, which
/// bounds its diagonal.
fn ellipse(radius: usize, alpha: &Image<u8, 1>) -> Kernel {
    let size = 2 * radius.min(alpha.width() + alpha.height()) + 1;
    Kernel::new(KernelShape::Ellipse {
        width: size,
        height: size,
    })
}

fn dilated(alpha: &Image<u8, 1>, kernel: &Kernel) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::from_size_val(alpha.size(), 0u8)?;
    dilate(alpha, &mut dst, kernel, PaddingMode::Constant, [0])?;
    Ok(dst)
}

fn eroded(alpha: &Image<u8, 1>, kernel: &Kernel) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::from_size_val(alpha.size(), 0u8)?;
    erode(alpha, &mut dst, kernel, PaddingMode::Constant, [u8::MAX])?;
    Ok(dst)
}

fn saturating_sub(a: &Image<u8, 1>, b: &Image<u8, 1>) -> Result<Image<u8, 1>, ImageError> {
    let mut dst = Image::from_size_val(a.size(), 0u8)?;
    parallel::par_iter_rows_val_two(a, b, &mut dst, |&x, &y, out| {
        *out = x.saturating_sub(y);
    });
    Ok(dst)
}

/// Compute the stroke band of an alpha mask.
///
/// With an elliptical structuring element of size `2 * width + 1`:
///
/// * `Outer`: `dilate(alpha)`. The band covers the shape too; it is drawn behind it.
/// * `Inner`: `alpha - erode(alpha)`.
/// * `Center`: `dilate(alpha) - erode(alpha)` with half the width on each side.
///
/// Subtractions saturate at zero. The band is not clipped to the canvas, pad the
/// mask first if the stroke must not touch the border.
pub fn stroke_band(
    alpha: &Image<u8, 1>,
    width: usize,
    position: StrokePosition,
) -> Result<Image<u8, 1>, ImageError> {
    match position {
        StrokePosition::Outer => dilated(alpha, &ellipse(width, alpha)),
        StrokePosition::Inner => saturating_sub(alpha, &eroded(alpha, &ellipse(width, alpha))?),
        StrokePosition::Center => {
            let kernel = ellipse(width / 2, alpha);
            saturating_sub(&dilated(alpha, &kernel)?, &eroded(alpha, &kernel)?)
        }
    }
}

/// Outline the opaque region of `src` with a solid `color` stroke.
///
/// The image is first padded by `width + 5` transparent pixels on every side, so
/// the returned image is larger than the input by that margin. A zero `width`
/// returns the input unchanged.
///
/// # Example
///
/// ```
/// use trimline_image::Image;
/// use trimline_imgproc::stroke::{apply_stroke, StrokePosition};
///
/// let img = Image::<u8, 4>::from_size_val([4, 4].into(), 255).unwrap();
/// let stroked = apply_stroke(&img, 2, [255, 0, 0], StrokePosition::Outer).unwrap();
/// assert_eq!(stroked.width(), 4 + 2 * (2 + 5));
/// ```
pub fn apply_stroke(
    src: &Image<u8, 4>,
    width: usize,
    color: [u8; 3],
    position: StrokePosition,
) -> Result<Image<u8, 4>, ImageError> {
    if width == 0 {
        return Ok(src.clone());
    }

    let padded = pad_image(
        src,
        Padding2D::uniform(width + STROKE_MARGIN),
        PaddingMode::Constant,
        [0; 4],
    )?;

    let band = stroke_band(&padded.channel(ALPHA_CHANNEL)?, width, position)?;
    let layer = solid_layer(&band, color)?;

    log::debug!(
        "{position} stroke of {width}px on {}x{} canvas",
        padded.width(),
        padded.height()
    );

    match position {
        StrokePosition::Outer => alpha_composite(&layer, &padded),
        StrokePosition::Inner | StrokePosition::Center => alpha_composite(&padded, &layer),
    }
}
