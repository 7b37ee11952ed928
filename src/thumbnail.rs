//! Cover image normalization: decode, cap the longer edge, re-encode as JPEG,
//! and return a `data:` URI small enough for localStorage.
//!
//! Normalization is best-effort. If anything fails the original bytes are
//! returned as a data URI without resizing.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageError};
use thiserror::Error;

use crate::config::ThumbnailConfig;
use crate::console;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("empty image data")]
    Empty,
    #[error("could not decode image: {0}")]
    Decode(#[source] ImageError),
    #[error("could not encode jpeg: {0}")]
    Encode(#[source] ImageError),
}

/// `min(1, max_dim / max(w, h))` applied to both edges, never below 1px.
pub fn scaled_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height).max(1) as f64;
    let s = (max_dimension as f64 / longest).min(1.0);
    let w = ((width as f64 * s).round() as u32).max(1);
    let h = ((height as f64 * s).round() as u32).max(1);
    (w, h)
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

pub fn try_normalize(bytes: &[u8], config: &ThumbnailConfig) -> Result<String, ThumbnailError> {
    if bytes.is_empty() {
        return Err(ThumbnailError::Empty);
    }
    let img = image::load_from_memory(bytes).map_err(ThumbnailError::Decode)?;
    let (w, h) = scaled_size(img.width(), img.height(), config.max_dimension);
    let img = if (w, h) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(w, h, FilterType::Triangle)
    };

    // JPEG has no alpha; flatten to RGB.
    let rgb = img.to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, config.jpeg_quality())
        .encode(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
        .map_err(ThumbnailError::Encode)?;
    Ok(data_uri("image/jpeg", out.get_ref()))
}

pub fn normalize(bytes: &[u8], config: &ThumbnailConfig) -> String {
    match try_normalize(bytes, config) {
        Ok(uri) => uri,
        Err(e) => {
            console::warn(&format!("表紙画像の縮小に失敗（元画像をそのまま使います）: {e}"));
            data_uri(sniff_mime(bytes), bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn decode_uri(uri: &str) -> DynamicImage {
        let b64 = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn scaled_size_caps_longer_edge() {
        assert_eq!(scaled_size(1800, 900, 900), (900, 450));
        assert_eq!(scaled_size(900, 1800, 900), (450, 900));
        assert_eq!(scaled_size(4000, 3000, 900), (900, 675));
    }

    #[test]
    fn scaled_size_never_upscales() {
        assert_eq!(scaled_size(300, 200, 900), (300, 200));
        assert_eq!(scaled_size(900, 900, 900), (900, 900));
    }

    #[test]
    fn scaled_size_keeps_at_least_one_pixel() {
        assert_eq!(scaled_size(10_000, 1, 900), (900, 1));
        assert_eq!(scaled_size(0, 0, 900), (1, 1));
    }

    #[test]
    fn large_png_is_resized_to_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(1200, 600, Rgb([200, 120, 40])));
        let uri = normalize(&png_bytes(img), &ThumbnailConfig::default());
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        let out = decode_uri(&uri);
        assert_eq!((out.width(), out.height()), (900, 450));
    }

    #[test]
    fn small_image_keeps_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 60, Rgb([0, 0, 0])));
        let out = decode_uri(&normalize(&png_bytes(img), &ThumbnailConfig::default()));
        assert_eq!((out.width(), out.height()), (40, 60));
    }

    #[test]
    fn transparent_png_is_flattened() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 128])));
        let uri = try_normalize(&png_bytes(img), &ThumbnailConfig::default()).unwrap();
        assert_eq!(decode_uri(&uri).width(), 20);
    }

    #[test]
    fn undecodable_bytes_fall_back_to_original() {
        let bytes = b"definitely not an image";
        let uri = normalize(bytes, &ThumbnailConfig::default());
        assert_eq!(
            uri,
            format!("data:application/octet-stream;base64,{}", STANDARD.encode(bytes))
        );
    }

    #[test]
    fn truncated_png_keeps_png_mime_in_fallback() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([1, 2, 3])));
        let bytes = png_bytes(img);
        let truncated = &bytes[..bytes.len() / 2];
        let uri = normalize(truncated, &ThumbnailConfig::default());
        assert!(uri.starts_with("data:image/png;base64,"), "{uri}");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            try_normalize(&[], &ThumbnailConfig::default()),
            Err(ThumbnailError::Empty)
        ));
    }
}
