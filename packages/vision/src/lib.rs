//! Image-based eye condition classification
//!
//! Images are decoded and scaled into a `1×H×W×3` tensor ([`preprocess`]) and
//! scored by a small convolutional network ([`model`]).

pub mod classifier;
pub mod model;
pub mod preprocess;

pub use classifier::{DEFAULT_INPUT_SIZE, ImageClassifier, ImageModelOptions};
pub use model::{EyeCnn, MIN_INPUT_SIZE, flattened_len};
pub use preprocess::preprocess_image;

/// Convert a Candle error into an inference error with context.
pub(crate) fn candle_to_inference(
    context: impl std::fmt::Display,
    err: candle_core::Error,
) -> eyescan_types::EyescanError {
    eyescan_types::EyescanError::Inference(format!("{context}: {err}"))
}
