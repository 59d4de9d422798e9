use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde_json::json;

use super::service::{VerificationRequest, VerificationService};

/// Router builder exposing document verification and the active policy table.
pub fn verification_router(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route("/api/v1/verifications", post(verify_handler))
        .route("/api/v1/policies", get(policies_handler))
        .with_state(service)
}

pub(crate) async fn verify_handler(
    State(service): State<Arc<VerificationService>>,
    axum::Json(request): axum::Json<VerificationRequest>,
) -> Response {
    let today = Local::now().date_naive();
    match service.handle(request, today) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn policies_handler(
    State(service): State<Arc<VerificationService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.policies().clone())).into_response()
}
