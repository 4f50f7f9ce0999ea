/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the logical size has a zero dimension.
    #[error("Invalid image size: width ({0}) and height ({1}) must be positive")]
    InvalidImageSize(usize, usize),

    /// Error when the backing grid could not be allocated.
    #[error("Could not allocate image (size {0}x{1})")]
    AllocationFailed(usize, usize),

    /// Error when the pixel data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a logical pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}
