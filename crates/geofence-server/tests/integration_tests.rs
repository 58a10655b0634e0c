//! Integration tests for the HTTP endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use geofence_domain::{GeoPoint, GeofenceId, GeofenceRegion};
use geofence_engine::sinks::ChannelEventSink;
use geofence_engine::{MetricsSnapshot, TransitionEngine};
use geofence_server::handlers::{create_router, AppState, ErrorResponse, LocationCheckResponse, StatusResponse};
use geofence_store::MemoryStore;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Helper to create test application state over an in-memory store
fn create_test_app() -> (Router, Arc<MemoryStore>, tokio::sync::mpsc::Receiver<geofence_domain::BoundaryEvent>) {
    let region = GeofenceRegion::new(
        GeofenceId::new(1),
        "Central Park",
        GeoPoint::new(40.7831, -73.9712).unwrap(),
        2.0,
    )
    .unwrap();
    let store = Arc::new(MemoryStore::with_regions(vec![region]));
    let (sink, events) = ChannelEventSink::channel(8);
    let engine = Arc::new(TransitionEngine::new(store.clone(), store.clone(), Arc::new(sink)));

    (create_router(AppState { engine }), store, events)
}

fn location_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/location-check")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_enter_then_exit_over_http() {
    let (app, _store, mut events) = create_test_app();

    let response = app
        .clone()
        .oneshot(location_request(r#"{"device_id": "D", "lat": 40.7831, "lon": -73.9712}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first: LocationCheckResponse = read_json(response).await;
    assert_eq!(
        first,
        LocationCheckResponse {
            device_id: "D".to_string(),
            inside_geofence: true,
            geofence_name: Some("Central Park".to_string()),
            state_changed: true,
        }
    );
    assert!(events.try_recv().is_err());

    let response = app
        .clone()
        .oneshot(location_request(r#"{"device_id": "D", "lat": 41.0, "lon": -74.0}"#))
        .await
        .unwrap();
    let second: LocationCheckResponse = read_json(response).await;
    assert!(!second.inside_geofence);
    assert_eq!(second.geofence_name, None);
    assert!(second.state_changed);
    assert_eq!(
        events.try_recv().unwrap().geofence_name.as_deref(),
        Some("Central Park")
    );

    let response = app
        .clone()
        .oneshot(location_request(r#"{"device_id": "D", "lat": 41.0, "lon": -74.0}"#))
        .await
        .unwrap();
    let third: LocationCheckResponse = read_json(response).await;
    assert!(!third.state_changed);
    assert!(events.try_recv().is_err());

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let metrics: MetricsSnapshot = read_json(response).await;
    assert_eq!(metrics.evaluations, 3);
    assert_eq!(metrics.transitions, 2);
    assert_eq!(metrics.exits_published, 1);
}

#[tokio::test]
async fn test_invalid_coordinates_rejected() {
    let (app, store, _events) = create_test_app();

    let response = app
        .oneshot(location_request(r#"{"device_id": "D", "lat": 123.0, "lon": 0.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.error.contains("latitude"));
    assert!(store.state("D").is_none());
}

#[tokio::test]
async fn test_empty_device_id_rejected() {
    let (app, _store, _events) = create_test_app();

    let response = app
        .oneshot(location_request(r#"{"device_id": "", "lat": 1.0, "lon": 1.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_collaborator_failure_is_500() {
    let (app, store, _events) = create_test_app();
    store.fail_catalog(true);

    let response = app
        .oneshot(location_request(r#"{"device_id": "D", "lat": 1.0, "lon": 1.0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "internal server error");
}

#[tokio::test]
async fn test_probes() {
    let (app, _store, _events) = create_test_app();

    for (uri, status) in [("/health", "healthy"), ("/ready", "ready")] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: StatusResponse = read_json(response).await;
        assert_eq!(body.status, status);
        assert_eq!(body.service, "geofence-alert-service");
    }
}
