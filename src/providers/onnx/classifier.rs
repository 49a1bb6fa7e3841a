use std::sync::Mutex;

use ort::{session::Session, value::TensorRef};

use super::{config::OnnxModelConfig, errors::OnnxModelError};
use crate::providers::ProbabilityModel;

/// Probability model executing an ONNX classifier graph.
///
/// The session sits behind a mutex because the runtime is not proven safe
/// for concurrent reads of a single session; requests serialise on it while
/// the rest of the pipeline runs in parallel.
#[derive(Debug)]
pub struct OnnxProbabilityModel {
    session: Mutex<Session>,
    labels: Vec<String>,
    input_name: String,
    output_name: String,
    n_features: Option<usize>,
}

impl OnnxProbabilityModel {
    /// Builds a probability model from a disk artefact.
    ///
    /// # Errors
    ///
    /// Returns [`OnnxModelError`] when the label list is empty, the artefact
    /// cannot be verified, or the ONNX session cannot be created.
    ///
    /// # Examples
    /// ```no_run
    /// use topcat::providers::artefact::Artefact;
    /// use topcat::providers::onnx::{OnnxModelConfig, OnnxProbabilityModel};
    /// use topcat::ProbabilityModel;
    ///
    /// # fn main() -> Result<(), topcat::providers::onnx::OnnxModelError> {
    /// let config = OnnxModelConfig::new(
    ///     Artefact::new("output/classifier.onnx"),
    ///     vec!["politics".into(), "sport".into()],
    /// );
    /// let model = OnnxProbabilityModel::new(config)?;
    /// let probabilities = model.predict_probabilities(&[0.0, 0.7, 0.3])?;
    /// assert_eq!(probabilities.len(), model.labels().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: OnnxModelConfig) -> Result<Self, OnnxModelError> {
        if config.labels.is_empty() {
            return Err(OnnxModelError::MissingLabels);
        }
        config.model.read_verified()?;

        let session = Session::builder()
            .map_err(OnnxModelError::CreateSessionBuilder)?
            .commit_from_file(&config.model.path)
            .map_err(OnnxModelError::CreateSession)?;

        Ok(Self {
            session: Mutex::new(session),
            labels: config.labels,
            input_name: config.input_name,
            output_name: config.output_name,
            n_features: config.n_features,
        })
    }
}

impl ProbabilityModel for OnnxProbabilityModel {
    type Error = OnnxModelError;

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn predict_probabilities(&self, features: &[f32]) -> Result<Vec<f32>, Self::Error> {
        if let Some(expected) = self.n_features {
            if features.len() != expected {
                return Err(OnnxModelError::FeatureLength {
                    expected,
                    actual: features.len(),
                });
            }
        }

        let input_tensor = TensorRef::from_array_view(([1usize, features.len()], features))
            .map_err(OnnxModelError::EncodeTensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| OnnxModelError::SessionPoisoned)?;

        let outputs = session
            .run(ort::inputs! {
                self.input_name.as_str() => input_tensor,
            })
            .map_err(OnnxModelError::Inference)?;

        let probabilities_value =
            outputs
                .get(&self.output_name)
                .ok_or_else(|| OnnxModelError::OutputMissing {
                    name: self.output_name.clone(),
                })?;
        let (_, probabilities) = probabilities_value
            .try_extract_tensor::<f32>()
            .map_err(OnnxModelError::Inference)?;

        if probabilities.len() != self.labels.len() {
            return Err(OnnxModelError::UnexpectedProbabilityCount {
                name: self.output_name.clone(),
                expected: self.labels.len(),
                actual: probabilities.len(),
            });
        }
        if !probabilities.iter().all(|value| value.is_finite()) {
            return Err(OnnxModelError::NonFiniteProbability {
                name: self.output_name.clone(),
            });
        }
        Ok(probabilities.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::artefact::Artefact;

    #[test]
    fn rejects_empty_label_list() {
        let config = OnnxModelConfig::new(Artefact::new("/nonexistent/classifier.onnx"), vec![]);
        assert!(matches!(
            OnnxProbabilityModel::new(config),
            Err(OnnxModelError::MissingLabels)
        ));
    }

    #[test]
    fn missing_artefact_fails_before_session_setup() {
        let config = OnnxModelConfig::new(
            Artefact::new("/nonexistent/classifier.onnx"),
            vec!["sport".into()],
        );
        assert!(matches!(
            OnnxProbabilityModel::new(config),
            Err(OnnxModelError::Artefact(_))
        ));
    }
}
