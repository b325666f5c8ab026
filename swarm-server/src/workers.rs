use std::sync::Arc;

use log::{debug, info, warn};
use swarm_config::Config;
use swarm_core::{DeliveryBatch, Envelope, PartitionTask, StaleConnectionNotice, TraceContext};
use swarm_pipeline::{
    ChannelTransport, Delivery, FanOut, InMemoryQueueBus, InMemoryRegistry, QueueMessage,
    create_stage_span,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::Instrument;

/// Declare every pipeline queue and spawn one consumer task per queue.
///
/// Consumers run for the life of the process; they drain their queue in
/// arrival order and drop malformed messages rather than stall on them.
pub async fn start(bus: &InMemoryQueueBus, registry: &InMemoryRegistry, config: &Config) {
    let fanout_rx = bus.declare(&config.queue.fanout_queue).await;
    let fan_out = FanOut::new(
        Arc::new(registry.clone()),
        Arc::new(bus.clone()),
        config.queue.clone(),
    );
    tokio::spawn(run_fan_out(fanout_rx, fan_out));

    for bucket in 0..config.queue.delivery_queue_count {
        let queue_name = config.queue.delivery_queue(bucket);
        let rx = bus.declare(&queue_name).await;
        let delivery = Delivery::new(
            Arc::new(ChannelTransport::new(registry.clone())),
            Arc::new(bus.clone()),
            &config.queue,
        );
        tokio::spawn(run_delivery(rx, delivery, queue_name));
    }

    let cleanup_rx = bus.declare(&config.queue.cleanup_queue).await;
    tokio::spawn(run_cleanup(cleanup_rx, registry.clone()));

    info!(
        "Pipeline workers started: 1 fan-out, {} delivery, 1 cleanup",
        config.queue.delivery_queue_count
    );
}

async fn run_fan_out(mut rx: UnboundedReceiver<QueueMessage>, fan_out: FanOut) {
    while let Some(message) = rx.recv().await {
        match Envelope::<PartitionTask>::from_json(&message.body) {
            Ok(envelope) => {
                let span = create_stage_span("fan_out", &trace_root(&message));
                let outcome = fan_out.handle(envelope).instrument(span).await;
                debug!("Fan-out done: {outcome:?}");
            }
            Err(e) => warn!("Dropping malformed fan-out message: {e}"),
        }
    }
}

async fn run_delivery(
    mut rx: UnboundedReceiver<QueueMessage>,
    delivery: Delivery,
    queue_name: String,
) {
    while let Some(message) = rx.recv().await {
        match Envelope::<DeliveryBatch>::from_json(&message.body) {
            Ok(envelope) => {
                let span = create_stage_span("delivery", &trace_root(&message));
                let outcome = delivery.handle(envelope).instrument(span).await;
                debug!("Delivery on {queue_name} done: {outcome:?}");
            }
            Err(e) => warn!("Dropping malformed delivery message on {queue_name}: {e}"),
        }
    }
}

async fn run_cleanup(mut rx: UnboundedReceiver<QueueMessage>, registry: InMemoryRegistry) {
    while let Some(message) = rx.recv().await {
        match Envelope::<StaleConnectionNotice>::from_json(&message.body) {
            Ok(envelope) => {
                let span = create_stage_span("cleanup", &trace_root(&message));
                let notice = envelope.payload;
                async {
                    let mut removed = 0;
                    for connection_id in &notice.connection_ids {
                        if registry.unregister(connection_id).await {
                            removed += 1;
                        }
                    }
                    info!(
                        "Cleanup removed {removed} of {} stale connections",
                        notice.connection_ids.len()
                    );
                }
                .instrument(span)
                .await;
            }
            Err(e) => warn!("Dropping malformed cleanup notice: {e}"),
        }
    }
}

/// Broadcast root of a queue message, for span correlation. A message with
/// an unreadable header still gets processed, it just cannot be correlated.
fn trace_root(message: &QueueMessage) -> String {
    TraceContext::parse(&message.trace_header)
        .map(|trace| trace.root().to_string())
        .unwrap_or_else(|_| String::from("unknown"))
}
