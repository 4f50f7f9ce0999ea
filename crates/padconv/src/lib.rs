#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use padconv_image as image;

#[doc(inline)]
pub use padconv_imgproc as imgproc;

#[doc(inline)]
pub use padconv_io as io;
