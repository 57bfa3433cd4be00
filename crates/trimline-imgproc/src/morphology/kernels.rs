/// Shapes of morphological [`Kernel`]s.
///
/// All kernels are anchored at their geometric center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A rectangular box structuring element.
    ///
    /// All pixels within the box are included in the morphological operation.
    Box {
        /// The side length of the square kernel (size x size).
        size: usize,
    },

    /// An ellipse (or circle) inscribed in a `width` x `height` box.
    ///
    /// Rasterized row by row: row `i` covers the columns `c - dx ..= c + dx` with
    /// `r = height / 2`, `c = width / 2` and `dx = round(c * sqrt((r² - (i - r)²) / r²))`.
    Ellipse {
        /// The width of the ellipse.
        width: usize,
        /// The height of the ellipse.
        height: usize,
    },
}

/// A morphological structuring element.
///
/// The kernel stores a binary mask where 1 indicates pixels included in the
/// operation and 0 indicates excluded pixels.
///
/// # Example
///
/// ```rust
/// use trimline_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Box { size: 3 });
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.pad(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a morphological kernel from a shape.
    pub fn new(shape: KernelShape) -> Self {
        match shape {
            KernelShape::Box { size } => box_kernel(size),
            KernelShape::Ellipse { width, height } => ellipse_kernel(width, height),
        }
    }

    /// Get a reference to the kernel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the padding for the kernel (offset from center) as `(rows, cols)`.
    pub fn pad(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Whether the kernel selects no pixel at all.
    pub fn is_empty(&self) -> bool {
        !self.data.contains(&1)
    }

    /// The first and last selected column of every kernel row.
    ///
    /// Both shapes are convex along rows, so a row is fully described by its span.
    /// Rows without any selected pixel yield `None`.
    pub fn row_spans(&self) -> Vec<Option<(usize, usize)>> {
        if self.width == 0 {
            return vec![None; self.height];
        }

        self.data
            .chunks_exact(self.width)
            .map(|row| {
                let first = row.iter().position(|&v| v == 1)?;
                let last = row.iter().rposition(|&v| v == 1)?;
                Some((first, last))
            })
            .collect()
    }
}

/// Create a box structuring element of `size` x `size`.
pub fn box_kernel(size: usize) -> Kernel {
    Kernel {
        data: vec![1u8; size * size],
        width: size,
        height: size,
    }
}

/// Create an ellipse structuring element.
///
/// A 1x1 ellipse degenerates to a single pixel box.
pub fn ellipse_kernel(width: usize, height: usize) -> Kernel {
    if width <= 1 && height <= 1 {
        return box_kernel(width.min(height));
    }

    let mut data = vec![0u8; width * height];
    let r = (height / 2) as f64;
    let c = (width / 2) as f64;
    let inv_r2 = if r > 0.0 { 1.0 / (r * r) } else { 0.0 };

    for i in 0..height {
        let dy = i as f64 - r;
        if dy.abs() > r {
            continue;
        }

        let dx = (c * ((r * r - dy * dy) * inv_r2).sqrt()).round();
        let j1 = (c - dx).max(0.0) as usize;
        let j2 = ((c + dx + 1.0) as usize).min(width);

        data[i * width + j1..i * width + j2].fill(1);
    }

    Kernel {
        data,
        width,
        height,
    }
}
