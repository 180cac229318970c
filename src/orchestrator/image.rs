//! Image payload preparation.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;

use crate::error::{TrackerError, TrackerResult};

/// Decode `bytes` (PNG or JPEG), re-encode as PNG and base64 it.
pub fn encode_image(bytes: &[u8]) -> TrackerResult<String> {
    if bytes.is_empty() {
        return Err(TrackerError::InvalidImage("empty image".to_string()));
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| TrackerError::InvalidImage(e.to_string()))?;

    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| TrackerError::InvalidImage(e.to_string()))?;

    Ok(STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn jpeg_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg).unwrap();
        out
    }

    #[test]
    fn test_jpeg_is_reencoded_as_png() {
        let encoded = encode_image(&jpeg_bytes()).unwrap();
        let raw = STANDARD.decode(encoded).unwrap();
        assert_eq!(image::guess_format(&raw).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_garbage_is_invalid_image() {
        assert!(matches!(encode_image(b"definitely not an image"), Err(TrackerError::InvalidImage(_))));
        assert!(matches!(encode_image(&[]), Err(TrackerError::InvalidImage(_))));
    }
}
