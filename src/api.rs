use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved label returned when no known class is a confident match.
pub const OTHER_LABEL: &str = "other";

/// Final classification outcome: a known class name or the reserved
/// out-of-distribution sentinel.
///
/// Serialises to a bare string so the wire shape is `{"label": "sport"}`
/// rather than a tagged enum. A class literally named `other` collapses into
/// the sentinel by construction; the sentinel owns that name.
///
/// # Examples
///
/// ```
/// use topcat::Label;
///
/// let label = Label::from("sport".to_string());
/// assert_eq!(label.as_str(), "sport");
/// assert_eq!(Label::from("other".to_string()), Label::Other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    /// One of the classifier's known class identifiers.
    Known(String),
    /// The reserved out-of-distribution sentinel.
    Other,
}

impl Label {
    /// View the label as the string sent over the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(name) => name.as_str(),
            Self::Other => OTHER_LABEL,
        }
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        if value == OTHER_LABEL {
            Self::Other
        } else {
            Self::Known(value)
        }
    }
}

impl From<Label> for String {
    fn from(value: Label) -> Self {
        match value {
            Label::Known(name) => name,
            Label::Other => OTHER_LABEL.to_owned(),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a probability distribution is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    /// The distribution carried no entries.
    #[error("distribution requires at least one class")]
    Empty,
    /// Labels and probabilities were not positionally aligned.
    #[error("distribution has {labels} labels but {probabilities} probabilities")]
    LengthMismatch { labels: usize, probabilities: usize },
}

/// Per-class probabilities positionally aligned with a fixed label ordering.
///
/// The ordering is fixed when the model artefact is loaded and never changes
/// for the lifetime of the process; probabilities are non-negative and sum to
/// one within floating-point tolerance.
///
/// # Examples
///
/// ```
/// use topcat::Distribution;
///
/// let dist = Distribution::new(
///     vec!["sport".into(), "politics".into()],
///     vec![0.9, 0.1],
/// )
/// .expect("aligned distribution");
/// assert_eq!(dist.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    labels: Vec<String>,
    probabilities: Vec<f32>,
}

impl Distribution {
    /// Build a distribution, rejecting misaligned or empty inputs.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::Empty`] when no classes are supplied and
    /// [`DistributionError::LengthMismatch`] when the two vectors differ in
    /// length.
    pub fn new(labels: Vec<String>, probabilities: Vec<f32>) -> Result<Self, DistributionError> {
        if labels.len() != probabilities.len() {
            return Err(DistributionError::LengthMismatch {
                labels: labels.len(),
                probabilities: probabilities.len(),
            });
        }
        if labels.is_empty() {
            return Err(DistributionError::Empty);
        }
        Ok(Self {
            labels,
            probabilities,
        })
    }

    /// Number of known classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the distribution is empty. Always `false` for constructed
    /// values; present to satisfy the conventional pairing with [`len`].
    ///
    /// [`len`]: Self::len
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Class labels in the model's fixed ordering.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Per-class probabilities aligned with [`labels`](Self::labels).
    #[must_use]
    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    /// Index and value of the maximal probability. Ties resolve to the
    /// earliest index so downstream decisions stay deterministic.
    #[must_use]
    pub fn max_entry(&self) -> (usize, f32) {
        let mut best = (0, f32::NEG_INFINITY);
        for (index, &probability) in self.probabilities.iter().enumerate() {
            if probability > best.1 {
                best = (index, probability);
            }
        }
        best
    }

    /// Arithmetic mean of the probabilities.
    #[must_use]
    pub fn mean(&self) -> f32 {
        #[expect(clippy::cast_precision_loss, reason = "class count fits in f32")]
        #[expect(clippy::float_arithmetic, reason = "mean of probabilities")]
        {
            self.probabilities.iter().copied().sum::<f32>() / self.probabilities.len() as f32
        }
    }
}

/// Trait for classifying a document into a final [`Label`].
///
/// Implemented by the inference service; the HTTP boundary is generic over
/// this trait so handlers can be exercised with a stub in tests.
pub trait ClassifyFn {
    /// Error type returned when classification fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Classify the raw text of a single document.
    ///
    /// # Errors
    ///
    /// Returns an error if any pipeline stage fails.
    fn classify(&self, document: &str) -> Result<Label, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sport", Label::Known("sport".into()))]
    #[case("other", Label::Other)]
    #[case("", Label::Known(String::new()))]
    fn labels_from_strings(#[case] raw: &str, #[case] expected: Label) {
        assert_eq!(Label::from(raw.to_string()), expected);
    }

    #[rstest]
    fn label_serialises_to_bare_string() {
        #[expect(clippy::expect_used, reason = "test should fail loudly")]
        let json = serde_json::to_string(&Label::Other).expect("serialise Label");
        assert_eq!(json, r#""other""#);
    }

    #[rstest]
    fn rejects_misaligned_distribution() {
        let result = Distribution::new(vec!["a".into()], vec![0.5, 0.5]);
        assert_eq!(
            result,
            Err(DistributionError::LengthMismatch {
                labels: 1,
                probabilities: 2,
            })
        );
    }

    #[rstest]
    fn rejects_empty_distribution() {
        assert_eq!(
            Distribution::new(vec![], vec![]),
            Err(DistributionError::Empty)
        );
    }

    #[rstest]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn max_entry_prefers_earliest_on_tie() {
        let dist = Distribution::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.4, 0.4, 0.2],
        )
        .expect("aligned distribution");
        assert_eq!(dist.max_entry().0, 0);
    }
}
