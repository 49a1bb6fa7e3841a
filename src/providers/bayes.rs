//! Multinomial naive Bayes classification against frozen parameters.
//!
//! The model is fitted offline; the artefact carries the ordered class
//! labels, the class log-priors, and the per-class feature
//! log-probabilities. Prediction accumulates the joint log-likelihood in
//! `f64` and normalises with a log-sum-exp so the returned distribution sums
//! to one regardless of how peaked the likelihoods are.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use super::artefact::{Artefact, ArtefactError};
use crate::providers::ProbabilityModel;

/// Errors produced while loading or executing the naive Bayes model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    #[error("failed to parse classifier artefact at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("classifier requires at least one class")]
    EmptyClasses,
    #[error("classifier has {classes} classes but {priors} log-priors")]
    PriorCountMismatch { classes: usize, priors: usize },
    #[error("classifier has {classes} classes but {rows} feature log-probability rows")]
    RowCountMismatch { classes: usize, rows: usize },
    #[error("feature log-probability row {row} has {actual} columns but expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("feature vector has {actual} entries but the model expects {expected}")]
    FeatureLength { expected: usize, actual: usize },
}

#[derive(Debug, Deserialize)]
struct BayesArtefact {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

/// Frozen multinomial naive Bayes model.
///
/// The class ordering is fixed at load time and aligns positionally with the
/// probabilities returned by
/// [`predict_probabilities`](ProbabilityModel::predict_probabilities).
#[derive(Debug, Clone)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    /// Load a model from a serialised artefact.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the artefact cannot be read or verified,
    /// does not parse, or is internally inconsistent.
    pub fn from_artefact(artefact: &Artefact) -> Result<Self, ModelError> {
        let bytes = artefact.read_verified()?;
        let raw: BayesArtefact =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
                path: artefact.path.clone(),
                source,
            })?;
        Self::from_parts(raw.classes, raw.class_log_prior, raw.feature_log_prob)
    }

    /// Build a model from already-deserialised parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] when the parameter shapes disagree.
    pub fn from_parts(
        classes: Vec<String>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        if classes.is_empty() {
            return Err(ModelError::EmptyClasses);
        }
        if class_log_prior.len() != classes.len() {
            return Err(ModelError::PriorCountMismatch {
                classes: classes.len(),
                priors: class_log_prior.len(),
            });
        }
        if feature_log_prob.len() != classes.len() {
            return Err(ModelError::RowCountMismatch {
                classes: classes.len(),
                rows: feature_log_prob.len(),
            });
        }
        let n_features = feature_log_prob[0].len();
        for (row, log_probs) in feature_log_prob.iter().enumerate() {
            if log_probs.len() != n_features {
                return Err(ModelError::RaggedMatrix {
                    row,
                    expected: n_features,
                    actual: log_probs.len(),
                });
            }
        }
        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            n_features,
        })
    }
}

impl ProbabilityModel for MultinomialNb {
    type Error = ModelError;

    fn labels(&self) -> &[String] {
        &self.classes
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "log-likelihood accumulation and softmax"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "probabilities accumulate in f64 then convert to f32"
    )]
    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f32>, Self::Error> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureLength {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        let joint: Vec<f64> = self
            .feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(log_probs, prior)| {
                let likelihood: f64 = features
                    .iter()
                    .zip(log_probs)
                    .map(|(&value, &log_prob)| f64::from(value) * log_prob)
                    .sum();
                prior + likelihood
            })
            .collect();
        // Log-sum-exp keeps the normalisation finite for strongly peaked
        // likelihoods.
        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let shifted: Vec<f64> = joint.iter().map(|value| (value - max).exp()).collect();
        let total: f64 = shifted.iter().sum();
        Ok(shifted
            .into_iter()
            .map(|value| (value / total) as f32)
            .collect())
    }
}
