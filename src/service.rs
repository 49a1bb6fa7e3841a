//! Inference service orchestration and startup state.
//!
//! The service is built exactly once at process start: configuration is
//! loaded, both artefacts are read (and verified when digests are recorded),
//! and the artefact dimensions are cross-checked. From then on it is
//! immutable, shared read-only behind an `Arc`, and safe for concurrent
//! requests; `classify` only reads frozen state.

use thiserror::Error;

use crate::api::{ClassifyFn, Distribution, DistributionError, Label};
use crate::config::ServiceConfig;
use crate::gate::{ConfidenceGate, GateError};
use crate::normalizer::Normalizer;
use crate::providers::artefact::Artefact;
use crate::providers::bayes::{ModelError, MultinomialNb};
use crate::providers::tfidf::{TfidfVectorizer, VectorizerError};
use crate::providers::{ProbabilityModel, TextProcessor};

/// Errors raised during the one-shot `Uninitialized -> Ready` transition.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load vectorizer artefact: {0}")]
    Vectorizer(#[from] VectorizerError),
    #[error("failed to load classifier artefact: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(
        "vectorizer produces {vectorizer} features but the classifier expects {classifier}"
    )]
    FeatureMismatch {
        vectorizer: usize,
        classifier: usize,
    },
}

/// Errors raised by a single classification request.
///
/// With the default providers none of these can occur: normalisation and
/// feature extraction are infallible and the startup cross-check rules out
/// dimension mismatches. Substituted backends surface their failures here.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to normalise document: {0}")]
    Normalize(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to extract features: {0}")]
    Vectorize(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to predict class probabilities: {0}")]
    Predict(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("classifier returned a malformed distribution: {0}")]
    Distribution(#[from] DistributionError),
}

/// The service instantiated with the serialised-JSON artefact providers.
pub type DefaultService = InferenceService<Normalizer, TfidfVectorizer, MultinomialNb>;

/// Immutable inference pipeline: normaliser, feature extractor, probability
/// model, and confidence gate.
///
/// Generic over the three provider seams so any compliant backend can be
/// substituted; [`DefaultService`] is the stock instantiation.
#[derive(Debug, Clone)]
pub struct InferenceService<N, V, M> {
    normalizer: N,
    vectorizer: V,
    model: M,
    gate: ConfidenceGate,
}

impl DefaultService {
    /// Load artefacts and build the stock service from configuration.
    ///
    /// This is the only place the `Uninitialized -> Ready` transition
    /// happens; any error here is fatal to startup and names the
    /// prerequisite that failed.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] when an artefact cannot be read, verified,
    /// or parsed, when the threshold is invalid, or when the artefact
    /// dimensions disagree.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, StartupError> {
        let mut vectorizer_artefact = Artefact::new(&config.vectorizer_file);
        vectorizer_artefact.sha256 = config.vectorizer_sha256.clone();
        let vectorizer = TfidfVectorizer::from_artefact(&vectorizer_artefact)?;

        let mut classifier_artefact = Artefact::new(&config.classifier_file);
        classifier_artefact.sha256 = config.classifier_sha256.clone();
        let model = MultinomialNb::from_artefact(&classifier_artefact)?;

        let service = Self::new(
            Normalizer::default(),
            vectorizer,
            model,
            ConfidenceGate::new(config.other_threshold)?,
        )?;
        tracing::info!(
            classes = service.model.labels().len(),
            vocabulary = service.vectorizer.vocabulary_size(),
            threshold = service.gate.threshold(),
            "inference service ready"
        );
        Ok(service)
    }
}

impl<N, V, M> InferenceService<N, V, M>
where
    N: TextProcessor<Output = String>,
    V: TextProcessor<Output = Box<[f32]>>,
    M: ProbabilityModel,
{
    /// Assemble a service from already-built providers, cross-checking the
    /// feature dimensions where the model exposes them.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::FeatureMismatch`] when the model reports a
    /// feature count and the vectorizer's output length disagrees with it.
    pub fn new(
        normalizer: N,
        vectorizer: V,
        model: M,
        gate: ConfidenceGate,
    ) -> Result<Self, StartupError> {
        let service = Self {
            normalizer,
            vectorizer,
            model,
            gate,
        };
        if let Some(expected) = service.model.n_features() {
            let produced = service.probe_feature_length();
            if produced != expected {
                return Err(StartupError::FeatureMismatch {
                    vectorizer: produced,
                    classifier: expected,
                });
            }
        }
        Ok(service)
    }

    /// The gate in effect for this service.
    #[must_use]
    pub fn gate(&self) -> ConfidenceGate {
        self.gate
    }

    /// Class labels in the model's fixed ordering.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }

    // The vectorizer contract fixes the output length for every input, so
    // probing with the empty document reveals the dimension without
    // touching an artefact-specific API.
    fn probe_feature_length(&self) -> usize {
        match self.vectorizer.process("") {
            Ok(features) => features.len(),
            Err(_) => 0,
        }
    }
}

impl<N, V, M> ClassifyFn for InferenceService<N, V, M>
where
    N: TextProcessor<Output = String>,
    V: TextProcessor<Output = Box<[f32]>>,
    M: ProbabilityModel,
{
    type Error = ClassifyError;

    fn classify(&self, document: &str) -> Result<Label, Self::Error> {
        let normalized = self
            .normalizer
            .process(document)
            .map_err(|error| ClassifyError::Normalize(Box::new(error)))?;
        let features = self
            .vectorizer
            .process(&normalized)
            .map_err(|error| ClassifyError::Vectorize(Box::new(error)))?;
        let probabilities = self
            .model
            .predict_probabilities(&features)
            .map_err(|error| ClassifyError::Predict(Box::new(error)))?;
        let distribution = Distribution::new(self.model.labels().to_vec(), probabilities)?;
        let label = self.gate.decide(&distribution);
        tracing::debug!(label = %label, "document classified");
        Ok(label)
    }
}
