//! ONNX-backed probability model with artefact verification.
//!
//! Executes a classifier exported from the training pipeline (for example
//! via sklearn-onnx with the probability output kept as a raw tensor): the
//! feature vector goes in as a `[1, n]` float tensor and a `[1, k]`
//! probability tensor aligned with the configured label list comes out.

mod classifier;
mod config;
mod errors;

pub use classifier::OnnxProbabilityModel;
pub use config::OnnxModelConfig;
pub use errors::OnnxModelError;
