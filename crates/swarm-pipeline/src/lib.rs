pub mod connection_store;
pub mod delivery;
pub mod error;
pub mod fan_out;
pub mod memory;
pub mod metrics;
pub mod outcome;
pub mod queue_client;
pub mod transport;
pub mod trigger;

pub use connection_store::{ConnectionPage, ConnectionStore};
pub use delivery::Delivery;
pub use error::{PipelineError, Result};
pub use fan_out::FanOut;
pub use memory::{ChannelTransport, ConnectionInfo, InMemoryQueueBus, InMemoryRegistry, QueueMessage};
pub use metrics::Metrics;
pub use outcome::{DeliveryOutcome, FanOutOutcome, TriggerOutcome};
pub use queue_client::{BatchSendReport, QueueClient, QueueEntry};
pub use transport::{DeliveryTransport, TransportError};
pub use trigger::Trigger;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one pipeline stage invocation.
/// All log entries within the stage will correlate on the broadcast root.
pub fn create_stage_span(stage: &str, trace_root: &str) -> tracing::Span {
    info_span!(
        "broadcast_stage",
        stage = %stage,
        trace_root = %trace_root,
    )
}
