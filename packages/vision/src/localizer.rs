//! # Object localizer
//!
//! Runs a YOLO-style detector and turns its raw output into a short list of
//! [`Detection`]s in source image coordinates.
//!
//! The detector output is `[1, 4 + C, N]`: for each of the `N` candidates the
//! first four rows hold centre-x, centre-y, width and height in letterboxed
//! input pixels, the remaining `C` rows hold class scores. Post-processing:
//!
//! 1. keep candidates whose best class score reaches the confidence threshold;
//! 2. class-aware non-maximum suppression at the IoU threshold;
//! 3. undo the letterbox and clamp to the image bounds.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::tract_ndarray::ArrayViewD;
use tract_onnx::prelude::*;

use crate::error::{Result, VisionError};
use crate::preprocess::{detector_input, Letterbox};

/// Axis-aligned box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let inter = BoundingBox {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
        .area();
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }

    fn clamp(self, width: f32, height: f32) -> Self {
        Self {
            x1: self.x1.clamp(0.0, width),
            y1: self.y1.clamp(0.0, height),
            x2: self.x2.clamp(0.0, width),
            y2: self.y2.clamp(0.0, height),
        }
    }
}

/// One localized object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_id: usize,
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Finds objects in an image.
pub trait ObjectLocalizer: Send + Sync {
    fn localize(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

/// Detector settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizerConfig {
    /// Square input edge length.
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    /// Class names by id. Ids without a name are shown as `class <id>`.
    pub class_names: Vec<String>,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            class_names: vec!["person".to_string()],
        }
    }
}

impl LocalizerConfig {
    fn class_name(&self, class_id: usize) -> String {
        self.class_names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class {class_id}"))
    }
}

/// YOLO-style ONNX detector run with tract.
pub struct TractLocalizer {
    model: TypedRunnableModel<TypedModel>,
    config: LocalizerConfig,
}

impl TractLocalizer {
    pub fn load(model_path: impl AsRef<Path>, config: LocalizerConfig) -> Result<Self> {
        let size = config.input_size as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path.as_ref())
            .map_err(VisionError::model)?
            .with_input_fact(0, f32::fact([1, 3, size, size]).into())
            .map_err(VisionError::model)?
            .into_optimized()
            .map_err(VisionError::model)?
            .into_runnable()
            .map_err(VisionError::model)?;

        tracing::info!(
            path = %model_path.as_ref().display(),
            input = config.input_size,
            "Localizer loaded"
        );
        Ok(Self { model, config })
    }
}

impl ObjectLocalizer for TractLocalizer {
    fn localize(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (input, letterbox) = detector_input(image, self.config.input_size);
        let input: Tensor = input.into();
        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(VisionError::model)?;
        let output = outputs[0]
            .to_array_view::<f32>()
            .map_err(VisionError::model)?;

        let candidates = decode_output(output, self.config.confidence_threshold)?;
        let kept = non_max_suppression(candidates, self.config.iou_threshold);

        let (width, height) = (image.width() as f32, image.height() as f32);
        let detections: Vec<Detection> = kept
            .into_iter()
            .map(|candidate| Detection {
                class_id: candidate.class_id,
                label: self.config.class_name(candidate.class_id),
                confidence: candidate.confidence,
                bbox: unletterbox(candidate.bbox, &letterbox).clamp(width, height),
            })
            .filter(|d| d.bbox.area() > 0.0)
            .collect();

        tracing::debug!(count = detections.len(), "Localized objects");
        Ok(detections)
    }
}

/// A detection still in letterboxed input coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Read `[1, 4 + C, N]` detector output, keeping confident candidates.
pub fn decode_output(output: ArrayViewD<'_, f32>, threshold: f32) -> Result<Vec<Candidate>> {
    let shape = output.shape().to_vec();
    let (rows, count) = match shape.as_slice() {
        &[1, rows, count] if rows > 4 => (rows, count),
        _ => {
            return Err(VisionError::OutputShape {
                shape,
                expected: "[1, 4 + classes, candidates]".to_string(),
            })
        }
    };

    let mut candidates = Vec::new();
    for i in 0..count {
        let (class_id, confidence) = (4..rows)
            .map(|row| (row - 4, output[[0, row, i].as_slice()]))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .unwrap_or((0, 0.0));

        if confidence < threshold {
            continue;
        }

        candidates.push(Candidate {
            class_id,
            confidence,
            bbox: BoundingBox::from_center(
                output[[0, 0, i].as_slice()],
                output[[0, 1, i].as_slice()],
                output[[0, 2, i].as_slice()],
                output[[0, 3, i].as_slice()],
            ),
        });
    }

    Ok(candidates)
}

/// Greedy, per-class non-maximum suppression. Output is sorted by confidence.
pub fn non_max_suppression(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

fn unletterbox(bbox: BoundingBox, letterbox: &Letterbox) -> BoundingBox {
    let (x1, y1) = letterbox.to_source(bbox.x1, bbox.y1);
    let (x2, y2) = letterbox.to_source(bbox.x2, bbox.y2);
    BoundingBox { x1, y1, x2, y2 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tract_onnx::prelude::tract_ndarray::{Array3, IxDyn};

    fn candidate(class_id: usize, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Candidate {
        Candidate {
            class_id,
            confidence,
            bbox: BoundingBox { x1, y1, x2, y2 },
        }
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 };
        let b = BoundingBox { x1: 5.0, y1: 0.0, x2: 15.0, y2: 10.0 };
        let c = BoundingBox { x1: 20.0, y1: 20.0, x2: 30.0, y2: 30.0 };
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-6);
        assert_eq!(a.iou(&c), 0.0);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_decode_output_filters_by_threshold() {
        // two classes, three candidates
        let mut raw = Array3::<f32>::zeros((1, 6, 3));
        for (i, (cx, cy, w, h, s0, s1)) in [
            (50.0, 50.0, 20.0, 20.0, 0.9, 0.1),
            (100.0, 100.0, 10.0, 10.0, 0.1, 0.2),
            (200.0, 150.0, 40.0, 20.0, 0.3, 0.7),
        ]
        .into_iter()
        .enumerate()
        {
            raw[[0, 0, i]] = cx;
            raw[[0, 1, i]] = cy;
            raw[[0, 2, i]] = w;
            raw[[0, 3, i]] = h;
            raw[[0, 4, i]] = s0;
            raw[[0, 5, i]] = s1;
        }
        let raw = raw.into_dimensionality::<IxDyn>().unwrap();

        let candidates = decode_output(raw.view(), 0.25).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], candidate(0, 0.9, 40.0, 40.0, 60.0, 60.0));
        assert_eq!(candidates[1].class_id, 1);
        assert_eq!(candidates[1].bbox, BoundingBox { x1: 180.0, y1: 140.0, x2: 220.0, y2: 160.0 });
    }

    #[test]
    fn test_decode_output_rejects_bad_shape() {
        let raw = Array3::<f32>::zeros((1, 4, 3)).into_dimensionality::<IxDyn>().unwrap();
        assert!(matches!(
            decode_output(raw.view(), 0.5),
            Err(VisionError::OutputShape { .. })
        ));
    }

    #[test]
    fn test_nms_suppresses_same_class_overlap() {
        let kept = non_max_suppression(
            vec![
                candidate(0, 0.6, 0.0, 0.0, 10.0, 10.0),
                candidate(0, 0.9, 1.0, 1.0, 11.0, 11.0),
                candidate(1, 0.8, 1.0, 1.0, 11.0, 11.0),
                candidate(0, 0.5, 50.0, 50.0, 60.0, 60.0),
            ],
            0.45,
        );
        let confidences: Vec<f32> = kept.iter().map(|c| c.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.8, 0.5]);
    }

    #[test]
    fn test_unletterbox_and_clamp() {
        let letterbox = Letterbox { scale: 2.0, pad_x: 0, pad_y: 100 };
        let bbox = unletterbox(
            BoundingBox { x1: -10.0, y1: 100.0, x2: 200.0, y2: 300.0 },
            &letterbox,
        )
        .clamp(90.0, 90.0);
        assert_eq!(bbox, BoundingBox { x1: 0.0, y1: 0.0, x2: 90.0, y2: 90.0 });
    }

    #[test]
    fn test_class_names() {
        let config = LocalizerConfig::default();
        assert_eq!(config.class_name(0), "person");
        assert_eq!(config.class_name(3), "class 3");
    }
}
