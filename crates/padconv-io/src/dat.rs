use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use padconv_image::ImageBuffer;

use crate::error::IoError;

/// Writes the padded grid of an image as a tab separated matrix.
///
/// Every padded row, ring included, becomes one line. Each sample is written
/// as an unsigned decimal followed by a tab.
///
/// # Arguments
///
/// * `image` - The image to dump.
/// * `writer` - The sink to write to.
///
/// # Example
///
/// ```
/// use padconv_image::ImageBuffer;
/// use padconv_io::dat::write_dat;
///
/// let mut image = ImageBuffer::new([1, 1].into(), 1).unwrap();
/// image.set_logical(0, 0, 7).unwrap();
///
/// let mut out = Vec::new();
/// write_dat(&image, &mut out).unwrap();
///
/// assert_eq!(out, b"0\t0\t0\t\n0\t7\t0\t\n0\t0\t0\t\n");
/// ```
pub fn write_dat<W: Write>(image: &ImageBuffer, writer: &mut W) -> Result<(), IoError> {
    for row in 0..image.padded_height() {
        for v in image.padded_row(row) {
            write!(writer, "{v}\t")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the dump of an image to a file.
///
/// The file is created or truncated.
///
/// # Arguments
///
/// * `file_path` - The path of the dump file.
/// * `image` - The image to dump.
pub fn write_dat_file(file_path: impl AsRef<Path>, image: &ImageBuffer) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let mut writer = BufWriter::new(File::create(file_path)?);
    write_dat(image, &mut writer)?;
    writer.flush()?;

    log::debug!("wrote {} to {}", image.size(), file_path.display());

    Ok(())
}
