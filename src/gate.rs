//! Confidence gate converting a probability distribution into a final label.
//!
//! A classifier confident about one class produces a peaked distribution
//! (large spread between the maximum and the mean); a classifier uncertain
//! across many classes produces a flat one. The gate accepts the top label
//! only when the spread clears the configured threshold, otherwise it
//! returns the reserved `other` label. This is a cheap proxy for
//! out-of-distribution detection that needs no dedicated `other` training
//! class.
//!
//! The spread is an uncalibrated heuristic: the mean of a uniform
//! distribution over `k` classes is `1/k`, so the threshold's effective
//! meaning shifts if the class count changes. Retune the threshold when the
//! label set does.

use thiserror::Error;

use crate::api::{Distribution, Label};

/// Errors raised when constructing a gate.
#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    /// The threshold was zero, negative, or not finite.
    #[error("other_threshold must be a strictly positive finite number, got {0}")]
    NonPositiveThreshold(f32),
}

/// Decision rule selecting between the classifier's top label and `other`.
///
/// # Examples
///
/// ```
/// use topcat::{ConfidenceGate, Distribution, Label};
///
/// let gate = ConfidenceGate::new(0.1).expect("positive threshold");
/// let peaked = Distribution::new(
///     vec!["sport".into(), "politics".into()],
///     vec![0.95, 0.05],
/// )
/// .expect("aligned distribution");
/// assert_eq!(gate.decide(&peaked), Label::Known("sport".into()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl ConfidenceGate {
    /// Build a gate from the configured threshold.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NonPositiveThreshold`] unless the threshold is
    /// finite and strictly positive.
    pub fn new(threshold: f32) -> Result<Self, GateError> {
        if threshold.is_finite() && threshold > 0.0 {
            Ok(Self { threshold })
        } else {
            Err(GateError::NonPositiveThreshold(threshold))
        }
    }

    /// The configured spread threshold.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Accept the top label when `p_max - p_mean` exceeds the threshold,
    /// otherwise return [`Label::Other`].
    ///
    /// Ties among classes sharing the maximum probability resolve to the
    /// earliest label in the model's fixed ordering, so the decision is
    /// deterministic for identical inputs.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "spread comparison")]
    pub fn decide(&self, distribution: &Distribution) -> Label {
        let (index, p_max) = distribution.max_entry();
        let spread = p_max - distribution.mean();
        if spread > self.threshold {
            Label::Known(distribution.labels()[index].clone())
        } else {
            Label::Other
        }
    }
}
