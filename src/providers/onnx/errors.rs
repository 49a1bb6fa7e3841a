use thiserror::Error;

use crate::providers::artefact::ArtefactError;

/// Errors produced by the ONNX probability model.
#[derive(Debug, Error)]
pub enum OnnxModelError {
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    #[error("classifier requires at least one class label")]
    MissingLabels,
    #[error("failed to construct ONNX session builder: {0}")]
    CreateSessionBuilder(#[source] ort::Error),
    #[error("failed to create ONNX session: {0}")]
    CreateSession(#[source] ort::Error),
    #[error("feature vector has {actual} entries but the model expects {expected}")]
    FeatureLength { expected: usize, actual: usize },
    #[error("failed to convert feature vector into tensor: {0}")]
    EncodeTensor(#[source] ort::Error),
    #[error("session mutex was poisoned by a previous panic")]
    SessionPoisoned,
    #[error("failed to run inference: {0}")]
    Inference(#[source] ort::Error),
    #[error("ONNX output \"{name}\" missing from session results")]
    OutputMissing { name: String },
    #[error("ONNX output \"{name}\" has {actual} probabilities but expected {expected}")]
    UnexpectedProbabilityCount {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("ONNX output \"{name}\" contains a non-finite probability")]
    NonFiniteProbability { name: String },
}
