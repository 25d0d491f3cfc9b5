use thiserror::Error;

/// Result type alias using [`VisionError`].
pub type Result<T> = std::result::Result<T, VisionError>;

/// Errors raised while decoding images or running inference.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The uploaded bytes are not an image we can decode.
    #[error("Unsupported image: {0}")]
    Decode(#[from] image::ImageError),

    /// Model file could not be loaded or executed.
    #[error("Model error: {message}")]
    Model {
        /// Error message from the inference runtime.
        message: String,
    },

    /// The model produced an output we do not know how to read.
    #[error("Unexpected model output shape {shape:?}, expected {expected}")]
    OutputShape {
        /// Shape actually produced.
        shape: Vec<usize>,
        /// Human readable description of the expected shape.
        expected: String,
    },

    /// A serialized prediction could not be parsed.
    #[error("Invalid prediction: {0}")]
    Prediction(String),
}

impl VisionError {
    pub(crate) fn model(err: impl std::fmt::Display) -> Self {
        Self::Model {
            message: err.to_string(),
        }
    }
}
