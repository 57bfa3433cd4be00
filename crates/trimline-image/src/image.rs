use crate::error::ImageError;

/// Width and height of an image in pixels, displayed as `WxH`.
///
/// # Examples
///
/// ```
/// use trimline_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by this size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored interleaved in row-major order, i.e. the value of channel `c`
/// at column `x` and row `y` lives at `(y * width + x) * CHANNELS + c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use trimline_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0u8; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        // check if the data length matches the image size
        if data.len() != size.width * size.height * CHANNELS {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * CHANNELS,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use trimline_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 4>::from_size_val(
    ///   ImageSize {
    ///     width: 10,
    ///     height: 20,
    ///   }, 0u8).unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 10 * 20 * 4);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The interleaved pixel data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The interleaved pixel data, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a reference to the value at `[row, col, channel]`.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, c] = index;
        if y >= self.height() || x >= self.width() || c >= CHANNELS {
            return None;
        }
        self.data.get((y * self.width() + x) * CHANNELS + c)
    }

    /// Get the value of a pixel channel.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        self.check_index(x, y, ch)?;
        Ok(self.data[(y * self.width() + x) * CHANNELS + ch])
    }

    /// Set the value of a pixel channel.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    /// * `val` - The new value.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        self.check_index(x, y, ch)?;
        let idx = (y * self.width() + x) * CHANNELS + ch;
        self.data[idx] = val;
        Ok(())
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use trimline_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 2>::new([2, 1].into(), vec![1, 2, 3, 4]).unwrap();
    /// let second = image.channel(1).unwrap();
    /// assert_eq!(second.as_slice(), &[2, 4]);
    /// ```
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let channel_data = self
            .data
            .chunks_exact(CHANNELS)
            .map(|pixel| pixel[channel])
            .collect();

        Image::new(self.size, channel_data)
    }

    /// Overwrite one channel of the image with the values of a single channel image.
    ///
    /// # Errors
    ///
    /// Fails if the channel index is out of bounds or the sizes differ.
    pub fn set_channel(&mut self, channel: usize, src: &Image<T, 1>) -> Result<(), ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        if src.size() != self.size() {
            return Err(ImageError::InvalidImageSize(
                src.width(),
                src.height(),
                self.width(),
                self.height(),
            ));
        }

        self.data
            .chunks_exact_mut(CHANNELS)
            .zip(src.as_slice())
            .for_each(|(pixel, &val)| pixel[channel] = val);

        Ok(())
    }

    fn check_index(&self, x: usize, y: usize, ch: usize) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(())
    }
}
