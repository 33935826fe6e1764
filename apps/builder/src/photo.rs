//! Profile photo processing: centre square crop, resize, PNG data URL.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{imageops::FilterType, GenericImageView, ImageFormat};
use thiserror::Error;

/// Edge length of the stored square photo, in pixels.
pub const PHOTO_SIZE: u32 = 512;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("empty upload")]
    Empty,

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("could not encode image: {0}")]
    Encode(String),

    #[error("not a base64 image data URL")]
    NotDataUrl,
}

/// Crops the largest centred square out of `bytes`, scales it to
/// `size`×`size` and returns it as a `data:image/png;base64,` URL.
pub fn crop_square_center(bytes: &[u8], size: u32) -> Result<String, PhotoError> {
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    let img = image::load_from_memory(bytes).map_err(|e| PhotoError::Decode(e.to_string()))?;

    let (w, h) = img.dimensions();
    let side = w.min(h);
    if side == 0 {
        return Err(PhotoError::Decode("zero-sized image".to_string()));
    }
    let square = img
        .crop_imm((w - side) / 2, (h - side) / 2, side, side)
        .resize_exact(size, size, FilterType::Triangle);

    let mut buffer = Cursor::new(Vec::new());
    square
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;

    Ok(format!("data:image/png;base64,{}", BASE64.encode(buffer.into_inner())))
}

/// Raw bytes of a base64 `data:` URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, PhotoError> {
    let rest = data_url.strip_prefix("data:").ok_or(PhotoError::NotDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(PhotoError::NotDataUrl)?;
    if !meta.ends_with(";base64") {
        return Err(PhotoError::NotDataUrl);
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| PhotoError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_crop_produces_square_png_data_url() {
        let url = crop_square_center(&png_bytes(300, 120), 64).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = image::load_from_memory(&decode_data_url(&url).unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }

    #[test]
    fn test_crop_keeps_centre_of_wide_image() {
        // The centre square of a red|blue image straddles both halves.
        let url = crop_square_center(&png_bytes(400, 100), 32).unwrap();
        let decoded = image::load_from_memory(&decode_data_url(&url).unwrap())
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.get_pixel(0, 16).0[0], 255);
        assert_eq!(decoded.get_pixel(31, 16).0[2], 255);
    }

    #[test]
    fn test_rejects_garbage_and_empty() {
        assert!(matches!(crop_square_center(b"", 64), Err(PhotoError::Empty)));
        assert!(matches!(
            crop_square_center(b"definitely not an image", 64),
            Err(PhotoError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_data_url_requires_base64() {
        assert!(matches!(decode_data_url("https://x/y.png"), Err(PhotoError::NotDataUrl)));
        assert!(matches!(decode_data_url("data:image/png,raw"), Err(PhotoError::NotDataUrl)));
        assert_eq!(decode_data_url("data:image/png;base64,AAEC").unwrap(), vec![0, 1, 2]);
    }
}
