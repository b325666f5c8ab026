use crate::tests::wired_pipeline;

use std::time::Duration;

use swarm_config::Config;
use swarm_core::{BroadcastRequest, PartitionId};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn given_connections_across_partitions_when_broadcast_then_every_one_receives_payload() {
    let config = Config::default();
    let (_bus, registry, trigger) = wired_pipeline(&config).await;

    let mut receivers = Vec::new();
    for partition in 0..3 {
        let (sender, receiver) = mpsc::channel(8);
        registry
            .register(PartitionId::new(partition), sender)
            .await
            .unwrap();
        receivers.push(receiver);
    }

    let outcome = trigger.broadcast(BroadcastRequest::new("festival")).await;
    assert_eq!(outcome.partitions, config.broadcast.partition_count);
    assert_eq!(outcome.batches_failed, 0);

    for receiver in &mut receivers {
        let payload = timeout(RECV_TIMEOUT, receiver.recv())
            .await
            .expect("broadcast payload should arrive")
            .expect("channel should stay open");
        let text = String::from_utf8(payload.to_vec()).unwrap();
        assert!(text.starts_with("festival#"));
    }
}

#[tokio::test]
async fn given_dropped_receiver_when_broadcast_then_stale_connection_is_deregistered() {
    let config = Config::default();
    let (_bus, registry, trigger) = wired_pipeline(&config).await;

    let (live_sender, mut live_receiver) = mpsc::channel(8);
    registry
        .register(PartitionId::new(0), live_sender)
        .await
        .unwrap();

    let (dead_sender, dead_receiver) = mpsc::channel(8);
    registry
        .register(PartitionId::new(0), dead_sender)
        .await
        .unwrap();
    drop(dead_receiver);

    assert_eq!(registry.total_count().await, 2);

    trigger.broadcast(BroadcastRequest::new("sweep")).await;

    // live connection still gets its payload
    let payload = timeout(RECV_TIMEOUT, live_receiver.recv())
        .await
        .expect("broadcast payload should arrive")
        .expect("channel should stay open");
    assert!(String::from_utf8(payload.to_vec()).unwrap().starts_with("sweep#"));

    // the dead one flows through delivery -> cleanup -> deregistration
    for _ in 0..200 {
        if registry.total_count().await == 1 {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(registry.total_count().await, 1);
}

#[tokio::test]
async fn given_two_broadcasts_when_delivered_then_payloads_arrive_in_order() {
    let config = Config::default();
    let (_bus, registry, trigger) = wired_pipeline(&config).await;

    let (sender, mut receiver) = mpsc::channel(8);
    registry
        .register(PartitionId::new(1), sender)
        .await
        .unwrap();

    trigger.broadcast(BroadcastRequest::new("first")).await;
    let first = timeout(RECV_TIMEOUT, receiver.recv()).await.unwrap().unwrap();
    assert!(String::from_utf8(first.to_vec()).unwrap().starts_with("first#"));

    trigger.broadcast(BroadcastRequest::new("second")).await;
    let second = timeout(RECV_TIMEOUT, receiver.recv()).await.unwrap().unwrap();
    assert!(String::from_utf8(second.to_vec()).unwrap().starts_with("second#"));
}
