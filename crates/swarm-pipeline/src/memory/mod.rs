//! In-process implementations of the pipeline's external collaborators,
//! used by the server host and the test suite.

mod queue;
mod registry;
mod transport;

pub use queue::{InMemoryQueueBus, QueueMessage};
pub use registry::{ConnectionInfo, InMemoryRegistry};
pub use transport::ChannelTransport;
