//! Bounding-box overlay for localized images.

use image::{DynamicImage, Rgb, RgbImage};

use crate::localizer::{BoundingBox, Detection};

const PALETTE: [[u8; 3]; 6] = [
    [255, 56, 56],
    [255, 157, 151],
    [255, 112, 31],
    [72, 249, 10],
    [0, 194, 255],
    [146, 204, 23],
];

/// Outline thickness in pixels.
pub const LINE_WIDTH: u32 = 3;

/// Colour used for a class id.
pub fn class_color(class_id: usize) -> Rgb<u8> {
    Rgb(PALETTE[class_id % PALETTE.len()])
}

/// Copy of `image` with one rectangle outline per detection.
pub fn annotate(image: &DynamicImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for detection in detections {
        draw_rect(&mut canvas, &detection.bbox, class_color(detection.class_id));
    }
    canvas
}

fn draw_rect(canvas: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let x1 = (bbox.x1.max(0.0) as u32).min(width - 1);
    let y1 = (bbox.y1.max(0.0) as u32).min(height - 1);
    let x2 = (bbox.x2.max(0.0) as u32).min(width - 1);
    let y2 = (bbox.y2.max(0.0) as u32).min(height - 1);

    for t in 0..LINE_WIDTH {
        for x in x1..=x2 {
            put(canvas, x, y1.saturating_add(t), color);
            put(canvas, x, y2.saturating_sub(t), color);
        }
        for y in y1..=y2 {
            put(canvas, x1.saturating_add(t), y, color);
            put(canvas, x2.saturating_sub(t), y, color);
        }
    }
}

fn put(canvas: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(class_id: usize, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection {
            class_id,
            label: "person".to_string(),
            confidence: 0.9,
            bbox: BoundingBox { x1, y1, x2, y2 },
        }
    }

    #[test]
    fn test_outline_only() {
        let image = DynamicImage::new_rgb8(100, 100);
        let out = annotate(&image, &[detection(0, 10.0, 10.0, 50.0, 50.0)]);

        let color = class_color(0);
        assert_eq!(out.get_pixel(10, 10), &color);
        assert_eq!(out.get_pixel(30, 10), &color);
        assert_eq!(out.get_pixel(50, 30), &color);
        assert_eq!(out.get_pixel(30, 30), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(70, 70), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_box_past_edges_is_clipped() {
        let image = DynamicImage::new_rgb8(20, 20);
        let out = annotate(&image, &[detection(1, -5.0, -5.0, 500.0, 500.0)]);
        assert_eq!(out.get_pixel(19, 19), &class_color(1));
        assert_eq!(out.get_pixel(0, 10), &class_color(1));
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(class_color(0), class_color(PALETTE.len()));
    }
}
