use eyescan_types::{EyescanError, Result};
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Decodes `bytes` and produces a `(1, size, size, 3)` array with channels
/// scaled from `[0, 255]` to `[0, 1]`.
pub fn preprocess_image(bytes: &[u8], size: u32) -> Result<Array4<f32>> {
    if bytes.is_empty() {
        return Err(EyescanError::Decode("image buffer is empty".to_string()));
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| EyescanError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (src_w, src_h) = rgb.dimensions();
    let resized = imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    tracing::debug!(src_w, src_h, size, "preprocessed image");

    let side = size as usize;
    Ok(Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        let p = resized.get_pixel(x as u32, y as u32);
        p[c] as f32 / 255.0
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn output_has_batch_axis_and_unit_range() {
        let img = RgbImage::from_fn(40, 20, |x, _| Rgb([(x * 6) as u8, 255, 0]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);

        let pixels = preprocess_image(&bytes, 32).unwrap();
        assert_eq!(pixels.shape(), &[1, 32, 32, 3]);
        assert!(pixels.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!((pixels[[0, 10, 10, 1]] - 1.0).abs() < 1e-6);
        assert_eq!(pixels[[0, 10, 10, 2]], 0.0);
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 10]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);

        let pixels = preprocess_image(&bytes, 8).unwrap();
        assert_eq!(pixels.shape(), &[1, 8, 8, 3]);
        assert!((pixels[[0, 3, 3, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn grayscale_is_expanded_to_three_channels() {
        let img = image::GrayImage::from_pixel(8, 8, image::Luma([51]));
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);

        let pixels = preprocess_image(&bytes, 4).unwrap();
        for c in 0..3 {
            assert!((pixels[[0, 1, 1, c]] - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn malformed_bytes_are_a_decode_error() {
        assert!(matches!(
            preprocess_image(b"not an image", 32),
            Err(EyescanError::Decode(_))
        ));
        assert!(matches!(preprocess_image(&[], 32), Err(EyescanError::Decode(_))));
    }
}
