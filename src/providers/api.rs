//! API-based feature extraction.
//!
//! Sends the normalised document to an HTTP endpoint and expects a JSON
//! response containing a `features` array of `f32` values, for deployments
//! where the vectorization model lives behind a network service. An optional
//! API key can be supplied and will be sent as a bearer token.
//!
//! Unlike a text scorer, this seam must accept the empty document: an input
//! that normalises to nothing is a valid pipeline state and is forwarded
//! like any other.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::providers::TextProcessor;

/// Error returned by [`ApiVectorizer`].
#[derive(Debug, Error)]
pub enum ApiVectorizerError {
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not contain a valid feature vector.
    #[error("invalid response")]
    InvalidResponse,
}

impl PartialEq for ApiVectorizerError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::InvalidResponse, Self::InvalidResponse) | (Self::Request(_), Self::Request(_))
        )
    }
}

impl Eq for ApiVectorizerError {}

#[derive(Deserialize)]
struct ApiResponse {
    features: Vec<f32>,
}

/// Feature extractor backed by an HTTP API.
#[derive(Debug, Clone)]
pub struct ApiVectorizer {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl ApiVectorizer {
    /// Create a new provider for the given endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed with the default
    /// configuration.
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        #[expect(
            clippy::expect_used,
            reason = "client builder should not fail with defaults"
        )]
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("client builder failed with default configuration");
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

impl TextProcessor for ApiVectorizer {
    type Output = Box<[f32]>;
    type Error = ApiVectorizerError;

    fn process(&self, input: &str) -> Result<Self::Output, Self::Error> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "document": input }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send()?.error_for_status()?;
        let api: ApiResponse = response
            .json()
            .map_err(|_| ApiVectorizerError::InvalidResponse)?;

        if api.features.is_empty() {
            return Err(ApiVectorizerError::InvalidResponse);
        }
        if !api.features.iter().all(|value| value.is_finite()) {
            return Err(ApiVectorizerError::InvalidResponse);
        }
        Ok(api.features.into_boxed_slice())
    }
}
