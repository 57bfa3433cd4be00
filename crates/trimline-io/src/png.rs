use std::{fs, io::Write, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use trimline_image::{Image, ImageSize};

use crate::error::IoError;

/// Read a PNG image with four channels (rgba8).
///
/// Only 8-bit RGBA files are accepted, use [`crate::read_image_any`] for anything else.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
pub fn read_image_png_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let has_png_extension = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !has_png_extension {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    decode_image_png_rgba8(&fs::read(file_path)?)
}

/// Decodes a PNG image with four channels (rgba8) from raw bytes.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_image_png_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    let mut reader = Decoder::new(bytes)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != ColorType::Rgba || info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "expected an 8-bit RGBA image, got {:?} {:?}",
            info.color_type, info.bit_depth
        )));
    }

    buf.truncate(info.buffer_size());
    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok(Image::new(size, buf)?)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to encode.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file = fs::File::create(file_path)?;
    write_png_impl(std::io::BufWriter::new(file), image)
}

/// Encodes the given _(rgba8)_ image as PNG bytes.
pub fn encode_image_png_rgba8(image: &Image<u8, 4>) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::new();
    write_png_impl(&mut bytes, image)?;
    Ok(bytes)
}

fn write_png_impl<W: Write>(sink: W, image: &Image<u8, 4>) -> Result<(), IoError> {
    let mut encoder = Encoder::new(sink, image.width() as u32, image.height() as u32);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Result<Image<u8, 4>, IoError> {
        let data = (0..4 * 3)
            .flat_map(|i| [i as u8 * 20, 255 - i as u8, 7, if i % 2 == 0 { 0 } else { 255 }])
            .collect();
        Ok(Image::new([4, 3].into(), data)?)
    }

    #[test]
    fn read_write_png_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("checker.png");

        let image = checker()?;
        write_image_png_rgba8(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_png_rgba8(&file_path)?;
        assert_eq!(image_back, image);
        Ok(())
    }

    #[test]
    fn encode_decode_in_memory() -> Result<(), IoError> {
        let image = checker()?;
        let bytes = encode_image_png_rgba8(&image)?;
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(decode_image_png_rgba8(&bytes)?, image);
        Ok(())
    }

    #[test]
    fn reject_missing_and_misnamed_files() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let missing = tmp_dir.path().join("missing.png");
        assert!(matches!(
            read_image_png_rgba8(&missing),
            Err(IoError::FileDoesNotExist(_))
        ));

        let misnamed = tmp_dir.path().join("image.jpg");
        fs::write(&misnamed, encode_image_png_rgba8(&checker()?)?)?;
        assert!(matches!(
            read_image_png_rgba8(&misnamed),
            Err(IoError::InvalidFileExtension(_))
        ));
        Ok(())
    }
}
