//! HTTP surface for the audit pipeline.
//!
//! - `POST /api/audit` (and `/`): `{ "url": "..." }` in, `AuditResult` out
//! - `OPTIONS`: empty 204 with CORS headers
//! - any other method: 405
//!
//! Failures of the audit itself are returned as 200 with a failure result.
//! Only a missing `url` (400) and a missing credential (500) change the status.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use brand_audit_core::{AuditError, AuditRequest, Auditor, FailureKind, FailureResult};

pub struct AppState {
    pub auditor: Arc<dyn Auditor>,
}

type AppStateArc = Arc<AppState>;

#[derive(Debug, Default, Deserialize)]
struct AuditBody {
    #[serde(default)]
    url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    let audit = post(run_audit).options(preflight);
    Router::new()
        .route("/api/audit", audit.clone())
        .route("/", audit)
        .route("/healthz", get(healthz))
        .with_state(Arc::new(state))
        .layer(middleware::map_response(with_cors))
        .layer(TraceLayer::new_for_http())
}

async fn run_audit(State(state): State<AppStateArc>, body: Bytes) -> Response {
    let url = serde_json::from_slice::<AuditBody>(&body)
        .ok()
        .and_then(|b| b.url);
    let request = match url.as_deref().map(AuditRequest::new) {
        Some(Ok(request)) => request,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "URL is required" })),
            )
                .into_response()
        }
    };

    if !state.auditor.has_credential() {
        let err = AuditError::MissingCredential;
        tracing::error!(error = %err, url = %request, "rejecting audit");
        let result = FailureResult::new(FailureKind::Configuration, err.to_string()).to_result();
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(result)).into_response();
    }

    let outcome = state.auditor.audit(&request).await;
    (StatusCode::OK, Json(outcome.into_result())).into_response()
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn healthz() -> &'static str {
    "ok"
}

async fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, Authorization, X-Requested-With"),
    );
    response
}
