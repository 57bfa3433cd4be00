use std::collections::VecDeque;

use trimline_image::Image;
use trimline_imgproc::alpha::ALPHA_CHANNEL;

use crate::error::CutoutError;
use crate::segmenter::Segmenter;

/// Default per-channel color tolerance of [`BackgroundKeySegmenter`].
pub const DEFAULT_KEY_TOLERANCE: u8 = 32;

/// A segmenter for product shots on a plain backdrop.
///
/// The backdrop color is estimated as the per-channel median of the border
/// pixels. Starting from the border, every 4-connected pixel that is transparent
/// or within `tolerance` of the backdrop on each channel is keyed out. Regions
/// of backdrop color enclosed by the subject are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundKeySegmenter {
    /// Largest per-channel difference to the backdrop color that is keyed out.
    pub tolerance: u8,
}

impl Default for BackgroundKeySegmenter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_KEY_TOLERANCE,
        }
    }
}

impl BackgroundKeySegmenter {
    /// A segmenter with the given color tolerance.
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }
}

fn border_indices(width: usize, height: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(2 * (width + height));
    for x in 0..width {
        indices.push(x);
        if height > 1 {
            indices.push((height - 1) * width + x);
        }
    }
    for y in 1..height.saturating_sub(1) {
        indices.push(y * width);
        if width > 1 {
            indices.push(y * width + width - 1);
        }
    }
    indices
}

fn median(mut values: Vec<u8>) -> u8 {
    values.sort_unstable();
    values[values.len() / 2]
}

/// Estimate the backdrop color from the border pixels.
fn backdrop_color(pixels: &[u8], border: &[usize]) -> [u8; 3] {
    let channel = |c: usize| median(border.iter().map(|&i| pixels[i * 4 + c]).collect());
    [channel(0), channel(1), channel(2)]
}

impl Segmenter for BackgroundKeySegmenter {
    fn segment(&mut self, image: &Image<u8, 4>) -> Result<Image<u8, 4>, CutoutError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(CutoutError::Segmentation("empty image".to_string()));
        }

        let pixels = image.as_slice();
        let border = border_indices(width, height);
        let backdrop = backdrop_color(pixels, &border);
        let tolerance = self.tolerance;

        let is_backdrop = |i: usize| {
            let px = &pixels[i * 4..i * 4 + 4];
            px[ALPHA_CHANNEL] == 0
                || px[..3]
                    .iter()
                    .zip(backdrop)
                    .all(|(&v, b)| v.abs_diff(b) <= tolerance)
        };

        let mut keyed = vec![false; width * height];
        let mut queue = VecDeque::new();
        for &i in &border {
            if !keyed[i] && is_backdrop(i) {
                keyed[i] = true;
                queue.push_back(i);
            }
        }

        while let Some(i) = queue.pop_front() {
            let (x, y) = (i % width, i / width);
            let neighbours = [
                (x > 0).then(|| i - 1),
                (x + 1 < width).then(|| i + 1),
                (y > 0).then(|| i - width),
                (y + 1 < height).then(|| i + width),
            ];
            for j in neighbours.into_iter().flatten() {
                if !keyed[j] && is_backdrop(j) {
                    keyed[j] = true;
                    queue.push_back(j);
                }
            }
        }

        let mut cutout = image.clone();
        let mut removed = 0;
        for (px, &k) in cutout.as_slice_mut().chunks_exact_mut(4).zip(&keyed) {
            if k {
                px[ALPHA_CHANNEL] = 0;
                removed += 1;
            }
        }

        log::debug!(
            "keyed out {removed} of {} pixels around backdrop {backdrop:?}",
            width * height
        );

        Ok(cutout)
    }
}
