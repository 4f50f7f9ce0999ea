#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// padded image representation.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Synthetic image generators.
pub mod synthetic;

pub use crate::error::ImageError;
pub use crate::image::{ImageBuffer, ImageSize, DEFAULT_PADDING};
