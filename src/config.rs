//! Service configuration types and layered loading.
//!
//! Configuration is read once at process start from a JSON file, with
//! environment variables prefixed `TOPCAT_` layered on top. A missing file
//! is reported as its own error so startup diagnostics can name the exact
//! prerequisite that failed.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix layered over the configuration file.
pub const ENV_PREFIX: &str = "TOPCAT_";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file {path} not found")]
    Missing { path: PathBuf },
    /// The configuration sources could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
    /// The threshold violated the strictly-positive invariant.
    #[error("other_threshold must be a strictly positive finite number, got {0}")]
    InvalidThreshold(f32),
}

/// Immutable service configuration.
///
/// Three fields are required: the two artefact paths and the confidence
/// threshold. The optional SHA-256 digests enable artefact integrity
/// verification when a deployment records them.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use tempfile::NamedTempFile;
/// use topcat::ServiceConfig;
///
/// let mut file = NamedTempFile::with_suffix(".json").expect("create temp file");
/// write!(
///     file,
///     r#"{{"classifier_file": "nb.json", "vectorizer_file": "tfidf.json", "other_threshold": 0.1}}"#
/// )
/// .expect("write config");
/// let config = ServiceConfig::load(file.path()).expect("load config");
/// assert_eq!(config.other_threshold, 0.1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Path of the serialised classifier artefact.
    pub classifier_file: PathBuf,
    /// Path of the serialised vectorizer artefact.
    pub vectorizer_file: PathBuf,
    /// Spread threshold below which a prediction is reported as `other`.
    pub other_threshold: f32,
    /// Expected SHA-256 of the classifier artefact, verified when present.
    #[serde(default)]
    pub classifier_sha256: Option<String>,
    /// Expected SHA-256 of the vectorizer artefact, verified when present.
    #[serde(default)]
    pub vectorizer_sha256: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from `path`, layering `TOPCAT_`-prefixed
    /// environment variables over the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the file does not exist,
    /// [`ConfigError::Extract`] when a source cannot be parsed or a required
    /// field is absent, and [`ConfigError::InvalidThreshold`] when the
    /// threshold is not strictly positive.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        let config: Self = Figment::new()
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        config.validate()
    }

    /// Ensure the configuration values are within acceptable bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] unless `other_threshold` is
    /// finite and strictly positive.
    #[must_use = "Validation should not be ignored"]
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.other_threshold.is_finite() && self.other_threshold > 0.0 {
            Ok(self)
        } else {
            Err(ConfigError::InvalidThreshold(self.other_threshold))
        }
    }
}
