//! TF-IDF feature extraction against a frozen vocabulary.
//!
//! The vectorizer is fitted offline; at inference time it is a pure transform
//! from normalised text to a fixed-length vector. The artefact carries the
//! vocabulary (term to column index) and one inverse-document-frequency
//! weight per column, and the transform applies term counting, IDF weighting,
//! and L2 normalisation to match the training pipeline's conventions.

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use super::artefact::{Artefact, ArtefactError};
use crate::providers::TextProcessor;

/// Errors produced while loading a vectorizer artefact.
#[derive(Debug, Error)]
pub enum VectorizerError {
    #[error(transparent)]
    Artefact(#[from] ArtefactError),
    #[error("failed to parse vectorizer artefact at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("vectorizer has {vocabulary} vocabulary terms but {idf} idf weights")]
    IdfLengthMismatch { vocabulary: usize, idf: usize },
    #[error("vocabulary term {term:?} maps to column {index} outside 0..{columns}")]
    IndexOutOfRange {
        term: String,
        index: usize,
        columns: usize,
    },
    #[error("vocabulary terms {first:?} and {second:?} share column {index}")]
    DuplicateIndex {
        first: String,
        second: String,
        index: usize,
    },
}

#[derive(Debug, Deserialize)]
struct TfidfArtefact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

/// Frozen TF-IDF vectorizer.
///
/// # Examples
///
/// ```no_run
/// use topcat::providers::artefact::Artefact;
/// use topcat::{TextProcessor, TfidfVectorizer};
///
/// # fn main() -> Result<(), topcat::VectorizerError> {
/// let vectorizer = TfidfVectorizer::from_artefact(&Artefact::new("output/vectorizer.json"))?;
/// let features = vectorizer.process("goal scored match")?;
/// assert_eq!(features.len(), vectorizer.vocabulary_size());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Load a vectorizer from a serialised artefact.
    ///
    /// # Errors
    ///
    /// Returns [`VectorizerError`] when the artefact cannot be read or
    /// verified, does not parse, or is internally inconsistent (mismatched
    /// IDF length, out-of-range or duplicated column indices).
    pub fn from_artefact(artefact: &Artefact) -> Result<Self, VectorizerError> {
        let bytes = artefact.read_verified()?;
        let raw: TfidfArtefact =
            serde_json::from_slice(&bytes).map_err(|source| VectorizerError::Parse {
                path: artefact.path.clone(),
                source,
            })?;
        Self::from_parts(raw.vocabulary, raw.idf)
    }

    /// Build a vectorizer from already-deserialised parts.
    ///
    /// # Errors
    ///
    /// Returns [`VectorizerError`] when the parts are internally
    /// inconsistent.
    pub fn from_parts(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f32>,
    ) -> Result<Self, VectorizerError> {
        if vocabulary.len() != idf.len() {
            return Err(VectorizerError::IdfLengthMismatch {
                vocabulary: vocabulary.len(),
                idf: idf.len(),
            });
        }
        let columns = idf.len();
        let mut seen: Vec<Option<&String>> = vec![None; columns];
        for (term, &index) in &vocabulary {
            if index >= columns {
                return Err(VectorizerError::IndexOutOfRange {
                    term: term.clone(),
                    index,
                    columns,
                });
            }
            if let Some(first) = seen[index] {
                return Err(VectorizerError::DuplicateIndex {
                    first: first.clone(),
                    second: term.clone(),
                    index,
                });
            }
            seen[index] = Some(term);
        }
        drop(seen);
        Ok(Self { vocabulary, idf })
    }

    /// Number of columns in the feature space.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Transform normalised text into a fixed-length feature vector.
    ///
    /// Inputs containing only out-of-vocabulary terms, including the empty
    /// string, yield the all-zero vector; this is a valid, non-error result.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "tf-idf weighting and norm")]
    pub fn transform(&self, normalized_text: &str) -> Box<[f32]> {
        let mut features = vec![0.0f32; self.idf.len()];
        for token in normalized_text.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }
        for (value, &idf) in features.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = features
            .iter()
            .map(|value| f64::from(*value) * f64::from(*value))
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "weights accumulate in f64 then convert to f32"
            )]
            for value in &mut features {
                *value = (f64::from(*value) / norm) as f32;
            }
        }
        features.into_boxed_slice()
    }
}

impl TextProcessor for TfidfVectorizer {
    type Output = Box<[f32]>;
    type Error = Infallible;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        Ok(self.transform(input))
    }
}
