use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{ImageBuffer, ImageError, ImageSize};

/// Exclusive upper bound of the generated samples.
const MAX_RANDOM_SAMPLE: u8 = 255;

/// Create an image filled with uniform random samples in `[0, 255)`.
///
/// Only the logical pixels are filled; the padding ring stays zero.
///
/// # Arguments
///
/// * `size` - The logical size of the image.
/// * `padding` - The width of the zero ring.
/// * `rng` - The random number generator.
pub fn random_image<R: Rng>(
    size: ImageSize,
    padding: usize,
    rng: &mut R,
) -> Result<ImageBuffer, ImageError> {
    let mut image = ImageBuffer::new(size, padding)?;
    for row in image.logical_rows_mut() {
        row.iter_mut()
            .for_each(|px| *px = rng.random_range(0..MAX_RANDOM_SAMPLE));
    }
    Ok(image)
}

/// Create a random image from a fixed seed.
///
/// The same seed always yields the same image.
///
/// # Examples
///
/// ```
/// use padconv_image::synthetic::random_image_seeded;
///
/// let a = random_image_seeded([8, 8].into(), 1, 24).unwrap();
/// let b = random_image_seeded([8, 8].into(), 1, 24).unwrap();
///
/// assert_eq!(a, b);
/// assert!(a.is_border_zero());
/// ```
pub fn random_image_seeded(
    size: ImageSize,
    padding: usize,
    seed: u64,
) -> Result<ImageBuffer, ImageError> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_image(size, padding, &mut rng)
}

/// Create an image whose logical pixels all hold `value`.
pub fn constant_image(
    size: ImageSize,
    padding: usize,
    value: u8,
) -> Result<ImageBuffer, ImageError> {
    let mut image = ImageBuffer::new(size, padding)?;
    image.logical_rows_mut().for_each(|row| row.fill(value));
    Ok(image)
}
