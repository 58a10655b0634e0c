use async_trait::async_trait;
use geofence_domain::{BoundaryEvent, EventSink, SinkUnavailable};
use tokio::sync::mpsc;

/// Sink that forwards events into a bounded channel
///
/// Publishing waits for capacity; a dropped receiver is reported as
/// [`SinkUnavailable`].
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<BoundaryEvent>,
}

impl ChannelEventSink {
    /// Wrap an existing sender
    pub fn new(tx: mpsc::Sender<BoundaryEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiver for its events
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BoundaryEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn publish(&self, event: &BoundaryEvent) -> Result<(), SinkUnavailable> {
        self.tx
            .send(event.clone())
            .await
            .map_err(|_| SinkUnavailable("event receiver closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofence_domain::GeoPoint;

    fn event() -> BoundaryEvent {
        BoundaryEvent::exit("d", GeoPoint::new(1.0, 1.0).unwrap(), None, 7)
    }

    #[tokio::test]
    async fn test_forwards_events() {
        let (sink, mut rx) = ChannelEventSink::channel(1);
        let sent = event();
        sink.publish(&sent).await.unwrap();
        assert_eq!(rx.recv().await, Some(sent));
    }

    #[tokio::test]
    async fn test_closed_receiver_is_unavailable() {
        let (sink, rx) = ChannelEventSink::channel(1);
        drop(rx);
        assert!(sink.publish(&event()).await.is_err());
    }
}
