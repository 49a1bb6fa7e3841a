//! HTTP boundary for the inference service.
//!
//! Thin plumbing only: one classification route plus a health probe. The
//! handler reads the raw body itself so the two boundary rejections stay
//! distinct (an absent payload is "input not provided", an undecodable one
//! is "malformed input") and neither reaches the core pipeline. The core
//! never rejects a document; low confidence comes back as the `other` label
//! with status 200.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::ClassifyFn;

/// Boundary error reported when the request carried no payload.
pub const ERROR_NO_INPUT: &str = "input not provided";
/// Boundary error reported when the payload could not be decoded.
pub const ERROR_MALFORMED: &str = "malformed input";

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    document_text: String,
}

/// Build the service router.
///
/// Generic over [`ClassifyFn`] so handler behaviour can be exercised with a
/// stub service in tests.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: ClassifyFn + Send + Sync + 'static,
{
    Router::new()
        .route("/classify_document", post(classify_document::<S>))
        .route("/healthz", get(healthz))
        .with_state(service)
}

async fn classify_document<S>(State(service): State<Arc<S>>, body: Bytes) -> impl IntoResponse
where
    S: ClassifyFn + Send + Sync + 'static,
{
    if body.is_empty() {
        tracing::debug!("rejected request without payload");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": ERROR_NO_INPUT })),
        );
    }
    let Ok(request) = serde_json::from_slice::<ClassifyRequest>(&body) else {
        tracing::debug!("rejected undecodable payload");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": ERROR_MALFORMED })),
        );
    };
    match service.classify(&request.document_text) {
        Ok(label) => (
            StatusCode::OK,
            Json(serde_json::json!({ "label": label })),
        ),
        Err(error) => {
            tracing::error!(error = %error, "classification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": error.to_string() })),
            )
        }
    }
}

async fn healthz() -> impl IntoResponse {
    // The process only binds after reaching Ready, so liveness implies a
    // loaded model.
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
