//! HTTP webhook delivery

use super::EventPayload;
use async_trait::async_trait;
use geofence_domain::{BoundaryEvent, EventSink, SinkUnavailable};
use std::time::Duration;

/// Default timeout for a webhook request (5 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Sink that POSTs each event as JSON to a fixed URL
///
/// Any transport error or non-2xx status is a failed delivery. There is no
/// retry here; the caller decides.
#[derive(Debug, Clone)]
pub struct WebhookEventSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookEventSink {
    /// Create a sink posting to `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventSink for WebhookEventSink {
    async fn publish(&self, event: &BoundaryEvent) -> Result<(), SinkUnavailable> {
        let response = self
            .client
            .post(&self.url)
            .json(&EventPayload::from(event))
            .send()
            .await
            .map_err(|e| SinkUnavailable(format!("webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkUnavailable(format!(
                "webhook returned HTTP {}",
                status.as_u16()
            )));
        }

        tracing::debug!("Delivered event {} to {}", event.event_id, self.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use geofence_domain::GeoPoint;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Received = Arc<Mutex<Vec<EventPayload>>>;

    async fn record(State(received): State<Received>, Json(payload): Json<EventPayload>) -> StatusCode {
        received.lock().unwrap().push(payload);
        StatusCode::ACCEPTED
    }

    async fn reject() -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn event() -> BoundaryEvent {
        BoundaryEvent::exit("d", GeoPoint::new(41.0, -74.0).unwrap(), Some("Park".into()), 99)
    }

    #[tokio::test]
    async fn test_delivers_json_payload() {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/events", post(record))
            .with_state(received.clone());
        let base = serve(app).await;

        let sink = WebhookEventSink::new(format!("{}/events", base), Duration::from_secs(5)).unwrap();
        let sent = event();
        sink.publish(&sent).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], EventPayload::from(&sent));
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let base = serve(Router::new().route("/events", post(reject))).await;
        let sink = WebhookEventSink::new(format!("{}/events", base), Duration::from_secs(5)).unwrap();

        let err = sink.publish(&event()).await.unwrap_err();
        assert!(err.0.contains("503"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = WebhookEventSink::new(format!("http://{}/events", addr), Duration::from_secs(2)).unwrap();
        assert!(sink.publish(&event()).await.is_err());
    }
}
