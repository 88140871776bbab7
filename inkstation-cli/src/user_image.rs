//! User block content
//!
//! Pictures are decoded with `image`, scaled to fit the user block and
//! ordered-dithered to one bit per pixel. A picture that cannot be loaded
//! falls back to the configured text, so a bad file never blanks the block.

use std::path::Path;

use image::imageops::FilterType;
use image::GrayImage;
use log::{debug, warn};

use inkstation_core::domain::UserContent;
use inkstation_core::{Bitmap, Rect};

use crate::config::PathsConfig;

/// 4x4 Bayer threshold matrix
const BAYER: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Pick the user block content for `block`
pub fn user_content(paths: &PathsConfig, block: Rect) -> UserContent {
    if let Some(path) = &paths.user_image {
        match load_image(path, block.width, block.height) {
            Ok(bitmap) => return UserContent::Image(bitmap),
            Err(e) => warn!("Cannot load user image {}: {}", path.display(), e),
        }
    }
    match &paths.user_text {
        Some(text) if !text.trim().is_empty() => UserContent::Text(text.clone()),
        _ => UserContent::Empty,
    }
}

/// Decode an image and fit it into `width` x `height`, keeping its aspect
pub fn load_image(path: &Path, width: u32, height: u32) -> image::ImageResult<Bitmap> {
    let decoded = image::open(path)?;
    let fitted = decoded.resize(width.max(1), height.max(1), FilterType::Triangle);
    debug!(
        "User image {}x{} fitted to {}x{}",
        decoded.width(),
        decoded.height(),
        fitted.width(),
        fitted.height()
    );
    Ok(dither(&fitted.to_luma8()))
}

/// Ordered dither of a grayscale image
pub fn dither(gray: &GrayImage) -> Bitmap {
    let mut out = Bitmap::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let threshold = BAYER[(y % 4) as usize][(x % 4) as usize] as u16 * 16 + 8;
        out.set(x, y, (pixel.0[0] as u16) < threshold);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::scratch_dir;
    use image::Luma;

    #[test]
    fn test_dither_extremes() {
        let black = GrayImage::from_pixel(8, 8, Luma([0]));
        let white = GrayImage::from_pixel(8, 8, Luma([255]));
        assert_eq!(dither(&black).black_pixels(), 64);
        assert_eq!(dither(&white).black_pixels(), 0);
    }

    #[test]
    fn test_dither_mid_gray_is_half() {
        let gray = GrayImage::from_pixel(8, 8, Luma([128]));
        assert_eq!(dither(&gray).black_pixels(), 32);
    }

    #[test]
    fn test_image_fitted_to_block() {
        let dir = scratch_dir("user-image");
        let path = dir.join("me.png");
        GrayImage::from_fn(200, 100, |x, _| Luma([if x < 100 { 0 } else { 255 }]))
            .save(&path)
            .unwrap();

        let bitmap = load_image(&path, 50, 50).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (50, 25));
        assert!(bitmap.get(5, 10));
        assert!(!bitmap.get(45, 10));
    }

    #[test]
    fn test_fallback_to_text() {
        let dir = scratch_dir("user-fallback");
        let paths = PathsConfig {
            user_image: Some(dir.join("missing.png")),
            user_text: Some("Hello".to_string()),
            ..PathsConfig::default()
        };
        assert_eq!(
            user_content(&paths, Rect::new(0, 0, 40, 40)),
            UserContent::Text("Hello".to_string())
        );
    }

    #[test]
    fn test_nothing_configured_is_empty() {
        let paths = PathsConfig {
            user_image: None,
            user_text: Some("   ".to_string()),
            ..PathsConfig::default()
        };
        assert_eq!(user_content(&paths, Rect::new(0, 0, 40, 40)), UserContent::Empty);
    }
}
