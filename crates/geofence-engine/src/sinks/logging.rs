use super::EventPayload;
use async_trait::async_trait;
use geofence_domain::{BoundaryEvent, EventSink, SinkUnavailable};

/// Sink that logs each event as JSON at `info` level
#[derive(Debug, Clone, Default)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    /// Create a logging sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn publish(&self, event: &BoundaryEvent) -> Result<(), SinkUnavailable> {
        let json = serde_json::to_string(&EventPayload::from(event))
            .map_err(|e| SinkUnavailable(format!("failed to encode event: {}", e)))?;
        tracing::info!("Publishing geo-event: {}", json);
        Ok(())
    }
}
