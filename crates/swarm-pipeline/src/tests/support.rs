//! Scripted collaborator doubles for component tests.

use crate::{
    BatchSendReport, ConnectionPage, ConnectionStore, DeliveryTransport, PipelineError,
    QueueClient, QueueEntry, Result, TransportError,
};

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use swarm_core::{ConnectionId, PartitionId};

pub(crate) fn conn(id: &str) -> ConnectionId {
    ConnectionId::parse(id).unwrap()
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedSend {
    pub queue: String,
    pub entries: Vec<QueueEntry>,
    pub trace_header: String,
}

/// Queue double that records every send and can fail named queues.
#[derive(Default)]
pub(crate) struct RecordingQueue {
    sends: Mutex<Vec<RecordedSend>>,
    failing_queues: Mutex<HashSet<String>>,
}

impl RecordingQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_queue(&self, queue: &str) {
        self.failing_queues.lock().unwrap().insert(queue.to_string());
    }

    pub(crate) fn sends_to(&self, queue: &str) -> Vec<RecordedSend> {
        self.sends
            .lock()
            .unwrap()
            .iter()
            .filter(|send| send.queue == queue)
            .cloned()
            .collect()
    }

    pub(crate) fn all_sends(&self) -> Vec<RecordedSend> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn send_batch(
        &self,
        queue: &str,
        entries: Vec<QueueEntry>,
        trace_header: &str,
    ) -> Result<BatchSendReport> {
        if self.failing_queues.lock().unwrap().contains(queue) {
            return Err(PipelineError::queue_send(
                queue.to_string(),
                "injected failure".to_string(),
            ));
        }

        let count = entries.len();
        self.sends.lock().unwrap().push(RecordedSend {
            queue: queue.to_string(),
            entries,
            trace_header: trace_header.to_string(),
        });

        Ok(BatchSendReport::all_sent(count))
    }
}

/// Registry double serving scripted pages per partition.
#[derive(Default)]
pub(crate) struct ScriptedStore {
    pages: HashMap<u32, Vec<Vec<ConnectionId>>>,
    failing: HashSet<u32>,
    queries: AtomicUsize,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_pages(mut self, partition: u32, pages: Vec<Vec<&str>>) -> Self {
        self.pages.insert(
            partition,
            pages
                .into_iter()
                .map(|page| page.into_iter().map(conn).collect())
                .collect(),
        );
        self
    }

    pub(crate) fn with_failure(mut self, partition: u32) -> Self {
        self.failing.insert(partition);
        self
    }

    pub(crate) fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionStore for ScriptedStore {
    async fn query_partition(
        &self,
        partition: PartitionId,
        continuation: Option<&str>,
    ) -> Result<ConnectionPage> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&partition.value()) {
            return Err(PipelineError::registry_query(
                partition,
                "injected registry failure",
            ));
        }

        let pages = self
            .pages
            .get(&partition.value())
            .cloned()
            .unwrap_or_default();
        let index: usize = continuation.map_or(0, |token| token.parse().unwrap());

        let items = pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(ConnectionPage { items, next_token })
    }
}

/// Transport double with scripted gone and failing connections.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    gone: HashSet<ConnectionId>,
    failing: HashSet<ConnectionId>,
    posts: Mutex<Vec<ConnectionId>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_gone(mut self, ids: &[&str]) -> Self {
        self.gone = ids.iter().map(|id| conn(id)).collect();
        self
    }

    pub(crate) fn with_failing(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|id| conn(id)).collect();
        self
    }

    pub(crate) fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryTransport for ScriptedTransport {
    async fn post(
        &self,
        connection_id: &ConnectionId,
        _payload: &[u8],
    ) -> std::result::Result<(), TransportError> {
        self.posts.lock().unwrap().push(connection_id.clone());

        if self.gone.contains(connection_id) {
            return Err(TransportError::Gone {
                connection_id: connection_id.clone(),
            });
        }
        if self.failing.contains(connection_id) {
            return Err(TransportError::Send {
                connection_id: connection_id.clone(),
                message: "injected transport failure".to_string(),
            });
        }

        Ok(())
    }
}
