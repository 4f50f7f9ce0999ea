use crate::error::ImageError;

/// Width of the zero ring added around the logical pixels for 3x3 kernels.
pub const DEFAULT_PADDING: usize = 1;

/// Image size in pixels
///
/// A struct to represent the logical size of an image in pixels, excluding
/// any padding.
///
/// # Examples
///
/// ```
/// use padconv_image::ImageSize;
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

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
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

/// A single channel 8-bit image stored with a zero border.
///
/// The backing grid is `padded_height` rows of `padded_width` samples,
/// row-major, where every logical dimension is grown by `padding` samples on
/// each side. Logical pixels live at padded indices
/// `[padding, padding + dim)`; everything outside is the padding ring and
/// stays zero for every buffer produced through this API.
///
/// Dropping the buffer releases the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBuffer {
    size: ImageSize,
    padding: usize,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Allocate a zero filled image.
    ///
    /// # Arguments
    ///
    /// * `size` - The logical size of the image in pixels.
    /// * `padding` - The width of the zero ring around the logical pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageSize`] if a dimension is zero and
    /// [`ImageError::AllocationFailed`] if the grid cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use padconv_image::{ImageBuffer, ImageSize};
    ///
    /// let image = ImageBuffer::new(ImageSize { width: 4, height: 3 }, 1).unwrap();
    ///
    /// assert_eq!(image.padded_width(), 6);
    /// assert_eq!(image.padded_height(), 5);
    /// assert!(image.as_slice().iter().all(|&v| v == 0));
    /// ```
    pub fn new(size: ImageSize, padding: usize) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::InvalidImageSize(size.width, size.height));
        }

        let num_samples = padded_len(size, padding)
            .ok_or(ImageError::AllocationFailed(size.width, size.height))?;

        let mut data = Vec::new();
        data.try_reserve_exact(num_samples)
            .map_err(|_| ImageError::AllocationFailed(size.width, size.height))?;
        data.resize(num_samples, 0u8);

        Ok(Self {
            size,
            padding,
            data,
        })
    }

    /// Create an image from row-major logical pixel data.
    ///
    /// The padding ring is left at zero.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidDataLength`] if `data` does not hold
    /// exactly `width * height` samples and [`ImageError::AllocationFailed`] if
    /// that count overflows.
    pub fn from_logical(size: ImageSize, padding: usize, data: &[u8]) -> Result<Self, ImageError> {
        let num_pixels = size
            .width
            .checked_mul(size.height)
            .ok_or(ImageError::AllocationFailed(size.width, size.height))?;
        if data.len() != num_pixels {
            return Err(ImageError::InvalidDataLength(data.len(), num_pixels));
        }

        let mut image = Self::new(size, padding)?;
        image
            .logical_rows_mut()
            .zip(data.chunks_exact(size.width))
            .for_each(|(dst_row, src_row)| dst_row.copy_from_slice(src_row));

        Ok(image)
    }

    /// Get the logical size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the logical width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the logical height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the width of the zero ring.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Get the width of the backing grid, padding included.
    pub fn padded_width(&self) -> usize {
        self.size.width + 2 * self.padding
    }

    /// Get the height of the backing grid, padding included.
    pub fn padded_height(&self) -> usize {
        self.size.height + 2 * self.padding
    }

    /// Get the sample at a padded coordinate.
    ///
    /// PRECONDITION: `row < padded_height()` and `col < padded_width()`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the padded grid.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.padded_width() + col]
    }

    /// Set the sample at a padded coordinate.
    ///
    /// PRECONDITION: `row < padded_height()` and `col < padded_width()`.
    /// Writing into the padding ring breaks the zero border invariant.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the padded grid.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        let stride = self.padded_width();
        self.data[row * stride + col] = value;
    }

    /// Get a logical pixel, 0-based and excluding padding.
    pub fn get_logical(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        Some(self.get(row + self.padding, col + self.padding))
    }

    /// Set a logical pixel, 0-based and excluding padding.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] if the coordinate is
    /// outside the logical image.
    pub fn set_logical(&mut self, row: usize, col: usize, value: u8) -> Result<(), ImageError> {
        if row >= self.size.height || col >= self.size.width {
            return Err(ImageError::PixelIndexOutOfBounds(
                row,
                col,
                self.size.width,
                self.size.height,
            ));
        }
        self.set(row + self.padding, col + self.padding, value);
        Ok(())
    }

    /// Get the whole padded grid.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get one row of the padded grid, ring samples included.
    pub fn padded_row(&self, row: usize) -> &[u8] {
        let stride = self.padded_width();
        &self.data[row * stride..(row + 1) * stride]
    }

    /// Iterate over the logical rows, each without its ring samples.
    pub fn logical_rows(&self) -> impl Iterator<Item = &[u8]> {
        let (pad, width) = (self.padding, self.size.width);
        self.data
            .chunks_exact(self.padded_width())
            .skip(pad)
            .take(self.size.height)
            .map(move |row| &row[pad..pad + width])
    }

    /// Iterate mutably over the logical rows, each without its ring samples.
    pub fn logical_rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let (pad, width, height) = (self.padding, self.size.width, self.size.height);
        let stride = self.padded_width();
        self.data
            .chunks_exact_mut(stride)
            .skip(pad)
            .take(height)
            .map(move |row| &mut row[pad..pad + width])
    }

    /// Check that every sample of the padding ring is zero.
    pub fn is_border_zero(&self) -> bool {
        let (pad, width, height) = (self.padding, self.size.width, self.size.height);
        self.data
            .chunks_exact(self.padded_width())
            .enumerate()
            .all(|(row, samples)| {
                if row < pad || row >= pad + height {
                    samples.iter().all(|&v| v == 0)
                } else {
                    samples[..pad].iter().all(|&v| v == 0)
                        && samples[pad + width..].iter().all(|&v| v == 0)
                }
            })
    }
}

fn padded_len(size: ImageSize, padding: usize) -> Option<usize> {
    let ring = padding.checked_mul(2)?;
    let width = size.width.checked_add(ring)?;
    let height = size.height.checked_add(ring)?;
    width.checked_mul(height)
}
