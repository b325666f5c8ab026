mod pipeline;

use crate::AppState;

use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use swarm_config::Config;
use swarm_pipeline::{InMemoryQueueBus, InMemoryRegistry, Trigger};

/// Wire a full in-process pipeline with workers running, without HTTP.
pub(crate) async fn wired_pipeline(config: &Config) -> (InMemoryQueueBus, InMemoryRegistry, Trigger) {
    let bus = InMemoryQueueBus::new();
    let registry = InMemoryRegistry::new(config.registry.page_size);

    crate::workers::start(&bus, &registry, config).await;

    let trigger = Trigger::new(Arc::new(bus.clone()), &config.broadcast, &config.queue);

    (bus, registry, trigger)
}

pub(crate) async fn test_state(config: &Config) -> AppState {
    let (_bus, registry, trigger) = wired_pipeline(config).await;

    AppState {
        trigger: Arc::new(trigger),
        registry,
        partition_count: config.broadcast.partition_count,
        next_partition: Arc::new(AtomicU32::new(0)),
    }
}
