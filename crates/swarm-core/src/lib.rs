mod broadcast_request;
mod bucket;
mod chunk;
mod connection_id;
mod delivery_batch;
mod envelope;
mod error;
mod partition;
mod partition_task;
mod stale_notice;
mod trace_context;

pub use broadcast_request::BroadcastRequest;
pub use bucket::{DEFAULT_LOAD_THRESHOLDS, bucket_for_load};
pub use chunk::chunk_by;
pub use connection_id::ConnectionId;
pub use delivery_batch::{DeliveryBatch, DeliveryEntry, MAX_BATCH_ENTRIES};
pub use envelope::{Envelope, SCHEMA_VERSION};
pub use error::{CoreError, Result};
pub use partition::PartitionId;
pub use partition_task::PartitionTask;
pub use stale_notice::StaleConnectionNotice;
pub use trace_context::TraceContext;

#[cfg(test)]
mod tests;
