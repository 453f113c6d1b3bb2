//! HTTP entry point for Pinpoint webhook deliveries.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::orchestrator::HireOrchestrator;
use crate::response::{HandlerResponse, REQUEST_ID_HEADER};

pub const WEBHOOK_PATH: &str = "/webhooks/pinpoint";

pub fn router(orchestrator: Arc<HireOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(WEBHOOK_PATH, post(hire_webhook))
        .with_state(orchestrator)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn hire_webhook(
    State(orchestrator): State<Arc<HireOrchestrator>>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResponse {
    let request_id = request_id(&headers);
    orchestrator.handle(&body, &request_id).await
}

/// Reuse the caller's `X-Request-Id` when it sent one, else mint a UUID.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.body)).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}
