//! Core library entry point.
//! Re-exports public types and traits.

pub mod api;
pub mod config;
pub mod gate;
pub mod http;
pub mod normalizer;
pub mod providers;
pub mod service;

pub use api::{ClassifyFn, Distribution, DistributionError, Label, OTHER_LABEL};
pub use config::{ConfigError, ServiceConfig};
pub use gate::{ConfidenceGate, GateError};
pub use normalizer::Normalizer;
#[cfg(feature = "provider-api")]
pub use providers::api::{ApiVectorizer, ApiVectorizerError};
pub use providers::bayes::{ModelError, MultinomialNb};
pub use providers::tfidf::{TfidfVectorizer, VectorizerError};
pub use providers::{ProbabilityModel, TextProcessor};
pub use service::{ClassifyError, DefaultService, InferenceService, StartupError};

pub mod tests;
