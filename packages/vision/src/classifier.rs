use std::path::Path;

use image::DynamicImage;
use tract_onnx::prelude::*;

use crate::error::{Result, VisionError};
use crate::labels::AnomalyLabel;
use crate::prediction::Prediction;
use crate::preprocess::{classifier_input, CLASSIFIER_INPUT};

/// Scores an image against the anomaly labels.
pub trait AnomalyClassifier: Send + Sync {
    fn classify(&self, image: &DynamicImage) -> Result<Prediction>;
}

/// ONNX export of the trained classifier, run with tract.
pub struct TractClassifier {
    model: TypedRunnableModel<TypedModel>,
}

impl TractClassifier {
    /// Load and optimise the model. Done once at startup.
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self> {
        let size = CLASSIFIER_INPUT as usize;
        let model = tract_onnx::onnx()
            .model_for_path(model_path.as_ref())
            .map_err(VisionError::model)?
            .with_input_fact(0, f32::fact([1, size, size, 3]).into())
            .map_err(VisionError::model)?
            .into_optimized()
            .map_err(VisionError::model)?
            .into_runnable()
            .map_err(VisionError::model)?;

        tracing::info!(path = %model_path.as_ref().display(), "Classifier loaded");
        Ok(Self { model })
    }
}

impl AnomalyClassifier for TractClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<Prediction> {
        let input: Tensor = classifier_input(image, CLASSIFIER_INPUT).into();
        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(VisionError::model)?;
        let output = outputs[0]
            .to_array_view::<f32>()
            .map_err(VisionError::model)?;

        match output.shape() {
            &[1, n] | &[n] if n == AnomalyLabel::COUNT => {
                Ok(Prediction::new(output.iter().copied().collect()))
            }
            shape => Err(VisionError::OutputShape {
                shape: shape.to_vec(),
                expected: format!("[1, {}]", AnomalyLabel::COUNT),
            }),
        }
    }
}

/// Returns the same scores for every image.
///
/// Used when no model file is configured, and in tests.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    prediction: Prediction,
}

impl FixedClassifier {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            prediction: Prediction::new(scores),
        }
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        let n = AnomalyLabel::COUNT as f32;
        Self::new(vec![1.0 / n; AnomalyLabel::COUNT])
    }
}

impl AnomalyClassifier for FixedClassifier {
    fn classify(&self, image: &DynamicImage) -> Result<Prediction> {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Classifying with fixed scores"
        );
        Ok(self.prediction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_classifier() {
        let classifier = FixedClassifier::new(vec![0.0, 0.0, 0.0, 0.9, 0.1, 0.0, 0.0]);
        let image = DynamicImage::new_rgb8(10, 10);
        let prediction = classifier.classify(&image).unwrap();
        assert_eq!(prediction.top().map(|(l, _)| l), Some(AnomalyLabel::Running));
    }

    #[test]
    fn test_fixed_classifier_default_is_uniform() {
        let prediction = FixedClassifier::default()
            .classify(&DynamicImage::new_rgb8(1, 1))
            .unwrap();
        assert_eq!(prediction.scores().len(), AnomalyLabel::COUNT);
        let sum: f32 = prediction.scores().iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_model_file() {
        assert!(matches!(
            TractClassifier::load("/nonexistent/model.onnx"),
            Err(VisionError::Model { .. })
        ));
    }
}
