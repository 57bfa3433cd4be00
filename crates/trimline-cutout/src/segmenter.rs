use std::sync::{Arc, Mutex};

use trimline_image::Image;

use crate::error::CutoutError;

/// A foreground/background segmentation model.
///
/// Given an RGBA image, a segmenter returns an RGBA image of the same size whose
/// background pixels have their alpha lowered towards zero. Nothing else about
/// the result is assumed.
pub trait Segmenter {
    /// Cut the foreground out of `image`.
    fn segment(&mut self, image: &Image<u8, 4>) -> Result<Image<u8, 4>, CutoutError>;
}

impl<S: Segmenter + ?Sized> Segmenter for Box<S> {
    fn segment(&mut self, image: &Image<u8, 4>) -> Result<Image<u8, 4>, CutoutError> {
        (**self).segment(image)
    }
}

/// One segmenter instance shared between several users.
///
/// The model is loaded once by the caller and moved in. Every clone refers to
/// the same instance and calls are serialized by a mutex. The model is dropped
/// with the last handle.
///
/// # Example
///
/// ```
/// use trimline_cutout::{BackgroundKeySegmenter, Segmenter, SharedSegmenter};
/// use trimline_image::Image;
///
/// let shared = SharedSegmenter::new(BackgroundKeySegmenter::default());
/// let mut worker = shared.clone();
///
/// let img = Image::<u8, 4>::from_size_val([4, 4].into(), 255).unwrap();
/// let cutout = worker.segment(&img).unwrap();
/// assert_eq!(cutout.size(), img.size());
/// ```
pub struct SharedSegmenter<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedSegmenter<S> {
    /// Share `segmenter`.
    pub fn new(segmenter: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(segmenter)),
        }
    }

    /// Number of live handles.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<S> Clone for SharedSegmenter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Segmenter> Segmenter for SharedSegmenter<S> {
    fn segment(&mut self, image: &Image<u8, 4>) -> Result<Image<u8, 4>, CutoutError> {
        let mut segmenter = self.inner.lock().map_err(|_| CutoutError::LockPoisoned)?;
        segmenter.segment(image)
    }
}
