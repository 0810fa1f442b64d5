//! Synthetic band data and in-memory TIFF encoders.
//!
//! The encoders produce the same single-image, uncompressed TIFF layout a
//! band reader sees for a small COG, so tests can exercise the real decode
//! path without network access or fixture files.

use std::io::Cursor;
use tiff::encoder::{colortype, TiffEncoder};

/// A `width * height` band where every sample is `value`.
pub fn uniform_band(width: usize, height: usize, value: u16) -> Vec<u16> {
    vec![value; width * height]
}

/// Row-major band where each sample is `col * 100 + row`.
///
/// Lets a test check that `data[row * width + col]` lands in the right cell.
///
/// ```
/// use test_utils::gradient_band;
///
/// let band = gradient_band(3, 2);
/// assert_eq!(band, vec![0, 100, 200, 1, 101, 201]);
/// ```
pub fn gradient_band(width: usize, height: usize) -> Vec<u16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 100 + row) as u16);
        }
    }
    data
}

/// Encode a 16-bit grayscale TIFF, the sample format of Sentinel-2 L2A bands.
pub fn encode_gray16_tiff(width: u32, height: u32, data: &[u16]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    TiffEncoder::new(&mut buf)
        .and_then(|mut tiff| tiff.write_image::<colortype::Gray16>(width, height, data))
        .expect("encode gray16 tiff");
    buf.into_inner()
}

pub fn encode_gray8_tiff(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    TiffEncoder::new(&mut buf)
        .and_then(|mut tiff| tiff.write_image::<colortype::Gray8>(width, height, data))
        .expect("encode gray8 tiff");
    buf.into_inner()
}

/// Encode a 32-bit float grayscale TIFF (reflectance-scaled products).
pub fn encode_f32_tiff(width: u32, height: u32, data: &[f32]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    TiffEncoder::new(&mut buf)
        .and_then(|mut tiff| tiff.write_image::<colortype::Gray32Float>(width, height, data))
        .expect("encode f32 tiff");
    buf.into_inner()
}

/// Encode an 8-bit RGB TIFF. Band readers must reject this layout.
pub fn encode_rgb8_tiff(width: u32, height: u32, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    TiffEncoder::new(&mut buf)
        .and_then(|mut tiff| tiff.write_image::<colortype::RGB8>(width, height, data))
        .expect("encode rgb8 tiff");
    buf.into_inner()
}

/// Uniform 16-bit band, already encoded.
pub fn uniform_gray16_tiff(width: u32, height: u32, value: u16) -> Vec<u8> {
    encode_gray16_tiff(
        width,
        height,
        &uniform_band(width as usize, height as usize, value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_band() {
        let band = uniform_band(4, 3, 7);
        assert_eq!(band.len(), 12);
        assert!(band.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_encoded_tiff_has_header() {
        let bytes = uniform_gray16_tiff(2, 2, 100);
        // Little-endian TIFF magic.
        assert_eq!(&bytes[..4], &[0x49, 0x49, 0x2A, 0x00]);
    }
}
