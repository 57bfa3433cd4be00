use trimline_core::Rgb8;
use trimline_image::{Image, ImageError};
use trimline_imgproc::alpha::{binarize_alpha, shift_alpha_edge};
use trimline_imgproc::stroke::{apply_stroke, StrokePosition};

/// Default alpha cutoff applied to a fresh cutout.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 10;

/// Parameters of [`post_process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoutParams {
    /// Alpha values above this become opaque, the rest transparent. `0` keeps the soft edge.
    pub alpha_threshold: u8,
    /// Pixels to move the edge by: positive shrinks the mask, negative grows it.
    pub edge_shift: i32,
    /// Stroke width in pixels, `0` disables the stroke.
    pub stroke_width: usize,
    /// Stroke color.
    pub stroke_color: Rgb8,
    /// Stroke placement.
    pub stroke_position: StrokePosition,
}

impl Default for CutoutParams {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            edge_shift: 0,
            stroke_width: 0,
            stroke_color: Rgb8::new(255, 255, 255),
            stroke_position: StrokePosition::Outer,
        }
    }
}

/// Clean up the alpha channel of a cutout and outline it.
///
/// The steps run in order and each one is skipped when disabled:
///
/// 1. binarize alpha at `alpha_threshold`;
/// 2. erode (positive) or dilate (negative) alpha by `edge_shift` with a square window;
/// 3. stroke the result, which grows the canvas by `stroke_width + 5` on each side.
///
/// # Example
///
/// ```
/// use trimline_cutout::CutoutParams;
/// use trimline_cutout::postprocess::post_process;
/// use trimline_image::Image;
///
/// let img = Image::<u8, 4>::new([2, 1].into(), vec![1, 2, 3, 11, 1, 2, 3, 10]).unwrap();
/// let out = post_process(&img, &CutoutParams::default()).unwrap();
/// assert_eq!(out.as_slice(), &[1, 2, 3, 255, 1, 2, 3, 0]);
/// ```
pub fn post_process(cutout: &Image<u8, 4>, params: &CutoutParams) -> Result<Image<u8, 4>, ImageError> {
    let mut img = if params.alpha_threshold > 0 {
        binarize_alpha(cutout, params.alpha_threshold)?
    } else {
        cutout.clone()
    };

    if params.edge_shift != 0 {
        img = shift_alpha_edge(&img, params.edge_shift)?;
    }

    if params.stroke_width > 0 {
        img = apply_stroke(
            &img,
            params.stroke_width,
            params.stroke_color.to_array(),
            params.stroke_position,
        )?;
    }

    Ok(img)
}
