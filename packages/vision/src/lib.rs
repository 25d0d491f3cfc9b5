//! # Vision crate — anomaly classification and localization
//!
//! Everything the web server needs to turn an uploaded crowd photo into
//! per-label anomaly scores and, optionally, a set of bounding boxes.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`labels`] | The seven fixed anomaly classes, in model output order |
//! | [`prediction`] | Score vector with its `[a, b, ...]` record format |
//! | [`preprocess`] | Image decoding, classifier tensor, letterboxed detector tensor |
//! | [`classifier`] | [`AnomalyClassifier`] trait, tract ONNX and fixed implementations |
//! | [`localizer`] | [`ObjectLocalizer`] trait, YOLO-style ONNX post-processing |
//! | [`annotate`] | Draws detection rectangles onto an image |
//!
//! Models are opaque ONNX artifacts; nothing here trains or defines a network.

pub mod annotate;
pub mod classifier;
pub mod labels;
pub mod localizer;
pub mod prediction;
pub mod preprocess;

mod error;

pub use classifier::{AnomalyClassifier, FixedClassifier, TractClassifier};
pub use error::{Result, VisionError};
pub use labels::AnomalyLabel;
pub use localizer::{BoundingBox, Detection, LocalizerConfig, ObjectLocalizer, TractLocalizer};
pub use prediction::Prediction;

pub use image::DynamicImage;
