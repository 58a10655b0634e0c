//! Event sink implementations
//!
//! The sink is chosen when the engine is constructed:
//!
//! - [`LoggingEventSink`]: writes each event to the log (development)
//! - [`WebhookEventSink`]: POSTs each event as JSON to an HTTP endpoint
//! - [`ChannelEventSink`]: forwards events to an in-process consumer
//!
//! None of them retry. A failed delivery surfaces as
//! [`SinkUnavailable`](geofence_domain::SinkUnavailable) and fails the evaluation.

mod channel;
mod logging;
mod payload;
mod webhook;

pub use channel::ChannelEventSink;
pub use logging::LoggingEventSink;
pub use payload::EventPayload;
pub use webhook::{WebhookEventSink, DEFAULT_TIMEOUT_SECS};
