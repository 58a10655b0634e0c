//! HTTP request handlers for the location service.
//!
//! Validates inbound reports at the edge and hands them to the transition
//! engine. Collaborator failures are logged here and reported to the client
//! as a generic server error.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use geofence_domain::{LocationReport, TransitionResult, ValidationError};
use geofence_engine::{EngineError, MetricsSnapshot, TransitionEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name reported by health and readiness probes
pub const SERVICE_NAME: &str = "geofence-alert-service";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Engine evaluating every location report
    pub engine: Arc<TransitionEngine>,
}

/// Location check request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCheckRequest {
    /// Reporting device
    pub device_id: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

/// Location check response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCheckResponse {
    /// Evaluated device
    pub device_id: String,
    /// Whether the device is inside some geofence
    pub inside_geofence: bool,
    /// Name of the containing geofence
    pub geofence_name: Option<String>,
    /// Whether containment changed
    pub state_changed: bool,
}

impl From<TransitionResult> for LocationCheckResponse {
    fn from(result: TransitionResult) -> Self {
        Self {
            device_id: result.device_id,
            inside_geofence: result.inside,
            geofence_name: result.geofence_name,
            state_changed: result.state_changed,
        }
    }
}

/// Health / readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// "healthy" or "ready"
    pub status: String,
    /// Service name
    pub service: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Report failed boundary validation
    Validation(ValidationError),
    /// Engine failed to evaluate the report
    Evaluation(EngineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Evaluation(e) => {
                tracing::error!("Error checking location: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Evaluation(e)
    }
}

/// POST /api/v1/location-check - Evaluate one location report
async fn check_location(
    State(state): State<AppState>,
    Json(request): Json<LocationCheckRequest>,
) -> Result<Json<LocationCheckResponse>, AppError> {
    let report = LocationReport::new(request.device_id, request.lat, request.lon)?;
    let result = state.engine.evaluate(&report).await?;
    tracing::debug!("Location check completed for device {}", report.device_id());
    Ok(Json(result.into()))
}

/// GET /health - Liveness probe
async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /ready - Readiness probe
async fn readiness_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /metrics - Engine counters
async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.engine.metrics().snapshot())
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/v1/location-check", post(check_location))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use geofence_engine::sinks::LoggingEventSink;
    use geofence_store::MemoryStore;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState {
            engine: Arc::new(TransitionEngine::new(
                store.clone(),
                store,
                Arc::new(LoggingEventSink::new()),
            )),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_location_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/location-check")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"device_id": "d", "lat": 1.0, "lon": 2.0}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_response_from_result() {
        let response = LocationCheckResponse::from(TransitionResult {
            device_id: "d".to_string(),
            inside: true,
            geofence_name: Some("Park".to_string()),
            state_changed: false,
        });
        assert!(response.inside_geofence);
        assert_eq!(response.geofence_name.as_deref(), Some("Park"));
    }
}
