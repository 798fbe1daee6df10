//! HTTP surface for front-desk checkout clients
//!
//! - `GET /health`
//! - `POST /api/v1/checkout/summary`: `CheckoutRequest` in, `ChargeSummary` out

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use error_common::{codes, DermCareError, ErrorContext, ErrorReporter};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::{ChargeSummary, CheckoutRequest};
use crate::service::BillingService;

/// Header clients may set to correlate error reports with their own logs
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(service: Arc<BillingService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/checkout/summary", post(checkout_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn checkout_summary(
    State(service): State<Arc<BillingService>>,
    headers: HeaderMap,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ChargeSummary>, ApiError> {
    let mut context = ErrorContext::new();
    if let Some(request_id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        context = context.with_request_id(request_id);
    }

    let reporter = service.error_reporter();
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(
            DermCareError::validation(codes::validation::INVALID_FORMAT, rejection.body_text()),
            context.clone(),
        )
        .with_reporter(reporter.clone())
    })?;
    if let Some(encounter_id) = &request.encounter_id {
        context = context.with_encounter_id(encounter_id.as_str());
    }

    service
        .checkout_summary(&request)
        .await
        .map(Json)
        .map_err(|err| ApiError::new(err.into(), context).with_reporter(reporter))
}

/// Platform error plus the request context it is reported with
#[derive(Debug)]
pub struct ApiError {
    error: DermCareError,
    context: ErrorContext,
    reporter: ErrorReporter,
}

impl ApiError {
    pub fn new(error: DermCareError, context: ErrorContext) -> Self {
        Self {
            error,
            context,
            reporter: ErrorReporter::new(),
        }
    }

    /// Report through the service's configured redaction
    #[must_use]
    pub fn with_reporter(mut self, reporter: ErrorReporter) -> Self {
        self.reporter = reporter;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = self.reporter.report(&self.error, &self.context);
        let status = StatusCode::from_u16(self.error.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(report)).into_response()
    }
}
