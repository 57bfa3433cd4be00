use trimline_image::{ImageError, ImageSize};

/// An error type for the cutout module.
#[derive(thiserror::Error, Debug)]
pub enum CutoutError {
    /// The segmenter could not produce a cutout.
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    /// The segmenter returned an image of another size.
    #[error("Segmenter returned a {actual} image for a {expected} input")]
    SizeMismatch {
        /// Size of the input image.
        expected: ImageSize,
        /// Size of the returned cutout.
        actual: ImageSize,
    },

    /// The shared segmenter was poisoned by a panic in another thread.
    #[error("The shared segmenter lock is poisoned")]
    LockPoisoned,

    /// Error raised while post-processing the cutout.
    #[error(transparent)]
    Image(#[from] ImageError),
}
