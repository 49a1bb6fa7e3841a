//! Configuration types for the ONNX probability model.

use crate::providers::artefact::Artefact;

/// Configuration for an ONNX classifier graph.
#[derive(Debug, Clone)]
pub struct OnnxModelConfig {
    /// Model artefact (ONNX graph) to load.
    pub model: Artefact,
    /// Class labels aligned with the graph's probability output.
    pub labels: Vec<String>,
    /// Name of the feature-vector input as defined in the graph.
    pub input_name: String,
    /// Name of the probability output to query after inference.
    pub output_name: String,
    /// Feature-vector length the graph was exported with, when known.
    /// Enables the startup dimension cross-check against the vectorizer.
    pub n_features: Option<usize>,
}

impl OnnxModelConfig {
    /// Configuration with the conventional sklearn-onnx tensor names.
    #[must_use]
    pub fn new(model: Artefact, labels: Vec<String>) -> Self {
        Self {
            model,
            labels,
            input_name: "float_input".into(),
            output_name: "probabilities".into(),
            n_features: None,
        }
    }
}
