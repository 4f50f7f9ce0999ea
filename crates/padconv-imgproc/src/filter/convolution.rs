use padconv_image::{ImageBuffer, ImageError};

use super::kernels::{Kernel, KernelError};
use crate::parallel::{par_iter_row_stripes, ExecutionStrategy, ParallelError};

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel radius is zero or wider than the image padding.
    #[error("Kernel half size {half_size} is not supported by an image padding of {padding}")]
    UnsupportedKernelRadius {
        /// Half size of the kernel.
        half_size: usize,
        /// Padding of the source image.
        padding: usize,
    },

    /// The image is smaller than the kernel.
    #[error("Image of size {width}x{height} is smaller than the kernel side {min}")]
    ImageTooSmall {
        /// Logical width of the source image.
        width: usize,
        /// Logical height of the source image.
        height: usize,
        /// Minimum side required by the kernel.
        min: usize,
    },

    /// Error from the image buffer.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the kernel construction.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Error from the parallel dispatch.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// Convolve an image with a kernel.
///
/// Allocates a destination with the same size and padding as `src` and fills
/// every logical pixel with the weighted sum of its neighbourhood, clamped to
/// `[0, 255]` and truncated toward zero. The padding ring of the result is
/// left at zero and `src` is not modified.
///
/// The logical rows are striped across the workers of `strategy`; the result
/// is identical for every strategy.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The kernel to apply.
/// * `strategy` - How the rows are dispatched.
///
/// # Errors
///
/// * [`FilterError::UnsupportedKernelRadius`] if the kernel half size is zero
///   or larger than the source padding.
/// * [`FilterError::ImageTooSmall`] if a logical dimension is smaller than the
///   kernel side.
///
/// # Examples
///
/// ```
/// use padconv_image::synthetic::constant_image;
/// use padconv_imgproc::filter::{filter, Kernel};
/// use padconv_imgproc::parallel::ExecutionStrategy;
///
/// let src = constant_image([3, 3].into(), 1, 255).unwrap();
/// let dst = filter(&src, &Kernel::sharpen(), ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.get(2, 2), 255);
/// ```
pub fn filter(
    src: &ImageBuffer,
    kernel: &Kernel,
    strategy: ExecutionStrategy,
) -> Result<ImageBuffer, FilterError> {
    let half_size = kernel.half_size();
    let padding = src.padding();
    if half_size == 0 || half_size > padding {
        return Err(FilterError::UnsupportedKernelRadius { half_size, padding });
    }

    let min = kernel.side();
    if src.width() < min || src.height() < min {
        return Err(FilterError::ImageTooSmall {
            width: src.width(),
            height: src.height(),
            min,
        });
    }

    let num_workers = strategy.num_workers()?;
    let mut dst = ImageBuffer::new(src.size(), padding)?;

    log::debug!(
        "filtering {} with a {}x{} kernel on {} workers",
        src.size(),
        min,
        min,
        num_workers
    );

    let src_data = src.as_slice();
    let stride = src.padded_width();

    par_iter_row_stripes(dst.logical_rows_mut(), strategy, |row, dst_row| {
        let r = row + padding;
        dst_row.iter_mut().enumerate().for_each(|(col, dst_px)| {
            let acc = convolve_pixel(src_data, stride, r, col + padding, kernel);
            *dst_px = clamp_to_u8(acc);
        });
    })?;

    Ok(dst)
}

/// Convolve an image with raw kernel weights.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `weights` - Row-major weights, `(2 * half_kernel + 1)^2` values.
/// * `half_kernel` - The kernel radius.
/// * `divisor` - The divisor applied to every weighted term.
/// * `strategy` - How the rows are dispatched.
///
/// # Errors
///
/// Returns [`KernelError::InvalidKernelLength`] if the weights do not match
/// `half_kernel`, [`KernelError::ZeroDivisor`] for a zero divisor and any
/// error of [`filter`].
pub fn filter_with_divisor(
    src: &ImageBuffer,
    weights: &[f64],
    half_kernel: usize,
    divisor: i32,
    strategy: ExecutionStrategy,
) -> Result<ImageBuffer, FilterError> {
    let side = 2 * half_kernel + 1;
    if weights.len() != side * side {
        return Err(KernelError::InvalidKernelLength(weights.len()).into());
    }
    let kernel = Kernel::new(weights.to_vec(), divisor)?;
    filter(src, &kernel, strategy)
}

/// Weighted sum of the neighbourhood centred on the padded coordinate.
///
/// Terms are computed in `f64` and accumulated into an `f32`.
///
/// PRECONDITION: the neighbourhood lies inside the padded grid.
#[inline]
fn convolve_pixel(src: &[u8], stride: usize, row: usize, col: usize, kernel: &Kernel) -> f32 {
    let half = kernel.half_size();
    let divisor = kernel.divisor() as f64;

    let mut acc = 0f32;
    for (kr, weights) in kernel.rows().enumerate() {
        let start = (row + kr - half) * stride + col - half;
        let src_row = &src[start..start + weights.len()];
        for (&px, &w) in src_row.iter().zip(weights) {
            acc = (acc as f64 + px as f64 * w / divisor) as f32;
        }
    }
    acc
}

/// Clamp an accumulator to the sample range, truncating toward zero.
///
/// Both bounds are checked against the unclamped value.
#[inline]
fn clamp_to_u8(acc: f32) -> u8 {
    if acc > 255.0 {
        255
    } else if acc < 0.0 {
        0
    } else {
        acc as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padconv_image::{synthetic, ImageSize};

    #[test]
    fn test_clamp_to_u8() {
        assert_eq!(clamp_to_u8(-0.5), 0);
        assert_eq!(clamp_to_u8(-300.0), 0);
        assert_eq!(clamp_to_u8(0.0), 0);
        assert_eq!(clamp_to_u8(12.99), 12);
        assert_eq!(clamp_to_u8(254.9), 254);
        assert_eq!(clamp_to_u8(255.0), 255);
        assert_eq!(clamp_to_u8(300.0), 255);
    }

    #[test]
    fn test_convolve_pixel() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = ImageBuffer::from_logical([3, 3].into(), 1, &[
            1, 2, 3,
            4, 5, 6,
            7, 8, 9,
        ])?;
        let stride = src.padded_width();

        let sum_kernel = Kernel::new(vec![1.0; 9], 1)?;
        assert_eq!(convolve_pixel(src.as_slice(), stride, 2, 2, &sum_kernel), 45.0);

        // top-left pixel only sees four samples, the rest is padding
        assert_eq!(convolve_pixel(src.as_slice(), stride, 1, 1, &sum_kernel), 12.0);

        let box_kernel = Kernel::new(vec![1.0; 9], 9)?;
        let mean = convolve_pixel(src.as_slice(), stride, 2, 2, &box_kernel);
        assert!((mean - 5.0).abs() < 1e-5);

        Ok(())
    }

    #[test]
    fn test_filter_sharpen_saturated() -> Result<(), FilterError> {
        let src = synthetic::constant_image([3, 3].into(), 1, 255)?;
        let dst = filter(&src, &Kernel::sharpen(), ExecutionStrategy::Serial)?;
        assert_eq!(dst.get(2, 2), 255);
        assert!(dst.is_border_zero());
        Ok(())
    }

    #[test]
    fn test_filter_edge_detection_flat() -> Result<(), FilterError> {
        let src = synthetic::constant_image([3, 3].into(), 1, 255)?;
        let dst = filter(&src, &Kernel::edge_detection(), ExecutionStrategy::Serial)?;
        assert_eq!(dst.get(2, 2), 0);
        Ok(())
    }

    #[test]
    fn test_filter_above_range_clamps() -> Result<(), FilterError> {
        // 9 * 100 = 900 at the centre, must saturate instead of wrapping
        let src = synthetic::constant_image([3, 3].into(), 1, 100)?;
        let kernel = Kernel::new(vec![1.0; 9], 1)?;
        let dst = filter(&src, &kernel, ExecutionStrategy::Serial)?;
        assert_eq!(dst.get(2, 2), 255);
        Ok(())
    }

    #[test]
    fn test_filter_bright_pixel_edge_detection() -> Result<(), FilterError> {
        let mut src = ImageBuffer::new([3, 3].into(), 1)?;
        src.set(2, 2, 255);
        let dst = filter(&src, &Kernel::edge_detection(), ExecutionStrategy::Serial)?;

        // centre: 8 * 255 saturates, neighbours: -255 clamps to zero
        assert_eq!(dst.get(2, 2), 255);
        for (r, c) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)] {
            assert_eq!(dst.get(r, c), 0);
        }
        Ok(())
    }

    #[test]
    fn test_filter_divisor_truncates() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = ImageBuffer::from_logical([3, 3].into(), 1, &[
            10, 10, 10,
            10, 11, 10,
            10, 10, 10,
        ])?;
        let kernel = Kernel::new(vec![1.0; 9], 9)?;
        let dst = filter(&src, &kernel, ExecutionStrategy::Serial)?;

        // 91 / 9 = 10.11 truncates to 10
        assert_eq!(dst.get(2, 2), 10);
        // corner sees 10 + 10 + 10 + 11 = 41, 41 / 9 = 4.56 truncates to 4
        assert_eq!(dst.get(1, 1), 4);
        Ok(())
    }

    #[test]
    fn test_filter_identity() -> Result<(), FilterError> {
        let src = synthetic::random_image_seeded([17, 11].into(), 1, 24)?;
        let dst = filter(&src, &Kernel::identity(), ExecutionStrategy::Fixed(3))?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_filter_source_untouched() -> Result<(), FilterError> {
        let src = synthetic::random_image_seeded([8, 8].into(), 1, 5)?;
        let copy = src.clone();
        let first = filter(&src, &Kernel::sharpen(), ExecutionStrategy::default())?;
        let second = filter(&src, &Kernel::sharpen(), ExecutionStrategy::default())?;
        assert_eq!(src, copy);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_filter_wider_padding() -> Result<(), FilterError> {
        let src = synthetic::random_image_seeded([9, 7].into(), 2, 3)?;

        let dst = filter(&src, &Kernel::identity(), ExecutionStrategy::Fixed(2))?;
        assert_eq!(dst.padding(), 2);
        assert_eq!(dst, src);

        let mut weights = vec![0.0; 25];
        weights[12] = 1.0;
        let dst = filter(&src, &Kernel::new(weights, 1)?, ExecutionStrategy::Fixed(2))?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_filter_unsupported_radius() -> Result<(), FilterError> {
        let src = ImageBuffer::new([8, 8].into(), 1)?;

        let kernel = Kernel::new(vec![1.0; 25], 1)?;
        assert_eq!(
            filter(&src, &kernel, ExecutionStrategy::Serial),
            Err(FilterError::UnsupportedKernelRadius {
                half_size: 2,
                padding: 1
            })
        );

        let kernel = Kernel::new(vec![1.0], 1)?;
        assert_eq!(
            filter(&src, &kernel, ExecutionStrategy::Serial),
            Err(FilterError::UnsupportedKernelRadius {
                half_size: 0,
                padding: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_filter_image_too_small() -> Result<(), FilterError> {
        let src = ImageBuffer::new(ImageSize { width: 2, height: 5 }, 1)?;
        assert_eq!(
            filter(&src, &Kernel::sharpen(), ExecutionStrategy::Serial),
            Err(FilterError::ImageTooSmall {
                width: 2,
                height: 5,
                min: 3
            })
        );
        Ok(())
    }

    #[test]
    fn test_filter_with_divisor() -> Result<(), FilterError> {
        let src = synthetic::constant_image([4, 4].into(), 1, 255)?;
        let dst = filter_with_divisor(
            &src,
            Kernel::sharpen().weights(),
            1,
            1,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(dst, filter(&src, &Kernel::sharpen(), ExecutionStrategy::Serial)?);

        assert_eq!(
            filter_with_divisor(&src, &[0.0; 9], 1, 0, ExecutionStrategy::Serial),
            Err(FilterError::Kernel(KernelError::ZeroDivisor))
        );
        assert_eq!(
            filter_with_divisor(&src, &[0.0; 9], 2, 1, ExecutionStrategy::Serial),
            Err(FilterError::Kernel(KernelError::InvalidKernelLength(9)))
        );
        Ok(())
    }

    #[test]
    fn test_filter_zero_threads() -> Result<(), FilterError> {
        let src = ImageBuffer::new([4, 4].into(), 1)?;
        assert_eq!(
            filter(&src, &Kernel::identity(), ExecutionStrategy::Fixed(0)),
            Err(FilterError::Parallel(ParallelError::InvalidThreadCount(0)))
        );
        Ok(())
    }

    #[test]
    fn test_filter_global_pool_matches_serial() -> Result<(), FilterError> {
        let src = synthetic::random_image_seeded([17, 9].into(), 1, 7)?;
        let serial = filter(&src, &Kernel::sharpen(), ExecutionStrategy::Serial)?;
        let global = filter(&src, &Kernel::sharpen(), ExecutionStrategy::GlobalPool)?;
        assert_eq!(serial, global);
        Ok(())
    }
}
