//! Provider interfaces for text normalisation, feature extraction, and
//! probabilistic classification.
//!
//! Defines the `TextProcessor` trait shared by the text-consuming seams and
//! the `ProbabilityModel` trait for the frozen classifier.

pub mod artefact;
pub mod bayes;
pub mod tfidf;

#[cfg(feature = "provider-api")]
pub mod api;
#[cfg(feature = "onnx")]
pub mod onnx;

/// Processes text to produce a structured, thread-safe output.
///
/// The normaliser and the feature extractor both implement this trait via
/// type aliases. Centralising the interface keeps the pipeline generic over
/// any compliant backend without per-stage boilerplate.
pub trait TextProcessor {
    /// Structured result returned by the processor.
    ///
    /// Outputs must be `Send + Sync + 'static` so they can be safely shared
    /// across threads and stored in trait objects without borrowing.
    type Output: Send + Sync + 'static;
    /// Error type returned when processing fails.
    ///
    /// Errors must implement `std::error::Error` and be `Send + Sync + 'static`
    /// to propagate cleanly across threads and outlive the processor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Process the supplied text.
    ///
    /// # Errors
    ///
    /// Returns an error if processing fails.
    fn process(&self, input: &str) -> Result<Self::Output, Self::Error>;
}

/// Maps a feature vector to a probability distribution over a fixed, closed
/// set of class labels.
///
/// Implementations are frozen at load time: `predict_probabilities` must not
/// mutate shared state, and [`labels`](Self::labels) must return the same
/// ordering for the lifetime of the process.
pub trait ProbabilityModel {
    /// Error type returned when prediction fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Class labels in the model's fixed ordering.
    fn labels(&self) -> &[String];

    /// Expected feature-vector length, when the backend exposes it.
    /// Backends that only learn the dimension at execution time return
    /// [`None`].
    fn n_features(&self) -> Option<usize>;

    /// Per-class probabilities positionally aligned with
    /// [`labels`](Self::labels).
    ///
    /// # Errors
    ///
    /// Returns an error if the feature vector does not fit the model or the
    /// backend fails.
    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f32>, Self::Error>;
}

/// Produces a normalised document from raw text.
pub type DocumentNormalizer<E> =
    dyn TextProcessor<Output = String, Error = E> + Send + Sync + 'static;

/// Produces fixed-length feature vectors.
pub type FeatureExtractor<E> =
    dyn TextProcessor<Output = Box<[f32]>, Error = E> + Send + Sync + 'static;
