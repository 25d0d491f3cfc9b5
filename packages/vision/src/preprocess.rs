//! Image decoding and model input tensors.
//!
//! The classifier is a Keras export and expects channels-last input with the
//! ImageNet "caffe" normalization Keras applies by default. The detector is a
//! YOLO-style export and expects a letterboxed, channels-first `[0, 1]` input.

use image::{imageops, DynamicImage};
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::error::Result;

/// Classifier input edge length.
pub const CLASSIFIER_INPUT: u32 = 224;

/// Per-channel mean subtracted in BGR order.
pub const CAFFE_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Decode an uploaded file.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Build the `[1, size, size, 3]` classifier input.
pub fn classifier_input(image: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = image.resize_exact(size, size, imageops::FilterType::Nearest);
    let rgb = resized.to_rgb8();

    Array4::from_shape_fn((1, size as usize, size as usize, 3), |(_, y, x, c)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        // channel 0 is blue
        let value = pixel[2 - c] as f32;
        value - CAFFE_MEAN_BGR[c]
    })
}

/// How a source image was fitted into the square detector input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    /// Map a point from detector input space back to the source image.
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pad_x as f32) / self.scale,
            (y - self.pad_y as f32) / self.scale,
        )
    }
}

/// Scale `image` to fit a `size`×`size` square, centred on black padding.
pub fn letterbox(image: &DynamicImage, size: u32) -> (DynamicImage, Letterbox) {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (size as f32 / w).min(size as f32 / h);
    let new_w = ((w * scale).round() as u32).clamp(1, size);
    let new_h = ((h * scale).round() as u32).clamp(1, size);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    let pad_x = (size - new_w) / 2;
    let pad_y = (size - new_h) / 2;

    let mut canvas = image::RgbImage::new(size, size);
    imageops::replace(&mut canvas, &scaled, pad_x as i64, pad_y as i64);

    (
        DynamicImage::ImageRgb8(canvas),
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

/// Build the `[1, 3, size, size]` detector input and the letterbox used.
pub fn detector_input(image: &DynamicImage, size: u32) -> (Array4<f32>, Letterbox) {
    let (boxed, letterbox) = letterbox(image, size);
    let rgb = boxed.to_rgb8();

    let tensor = Array4::from_shape_fn((1, 3, size as usize, size as usize), |(_, c, y, x)| {
        rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    });

    (tensor, letterbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_classifier_input_shape() {
        let tensor = classifier_input(&solid(640, 480, [0, 0, 0]), CLASSIFIER_INPUT);
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_classifier_input_caffe_normalization() {
        let tensor = classifier_input(&solid(50, 50, [255, 0, 0]), CLASSIFIER_INPUT);

        // BGR order with the mean removed
        assert!((tensor[[0, 10, 10, 0]] - (0.0 - 103.939)).abs() < 1e-4);
        assert!((tensor[[0, 10, 10, 1]] - (0.0 - 116.779)).abs() < 1e-4);
        assert!((tensor[[0, 10, 10, 2]] - (255.0 - 123.68)).abs() < 1e-4);
    }

    #[test]
    fn test_letterbox_wide_image() {
        let (boxed, letterbox) = letterbox(&solid(200, 100, [255, 0, 0]), 640);
        assert_eq!((boxed.width(), boxed.height()), (640, 640));
        assert_eq!(letterbox.scale, 3.2);
        assert_eq!(letterbox.pad_x, 0);
        assert_eq!(letterbox.pad_y, 160);

        let rgb = boxed.to_rgb8();
        assert_eq!(rgb.get_pixel(320, 320), &Rgb([255, 0, 0]));
        assert_eq!(rgb.get_pixel(320, 10), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_letterbox_maps_back_to_source() {
        let (_, letterbox) = letterbox(&solid(200, 100, [0, 0, 0]), 640);
        let (x, y) = letterbox.to_source(320.0, 320.0);
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_detector_input_normalization() {
        let (tensor, _) = detector_input(&solid(100, 100, [128, 128, 128]), 64);
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);
        let expected = 128.0 / 255.0;
        assert!((tensor[[0, 0, 0, 0]] - expected).abs() < 1e-4);
        assert!((tensor[[0, 2, 63, 63]] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_decode_rejects_non_image() {
        assert!(decode(b"definitely not a png").is_err());
    }
}
