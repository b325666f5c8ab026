use std::panic::Location;

use error_location::ErrorLocation;
use swarm_core::PartitionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Queue send to {queue} failed: {message} {location}")]
    QueueSend {
        queue: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Registry query failed for partition {partition}: {message} {location}")]
    RegistryQuery {
        partition: PartitionId,
        message: String,
        location: ErrorLocation,
    },

    #[error("Envelope encoding failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl PipelineError {
    #[track_caller]
    pub fn queue_send<S: Into<String>>(queue: S, message: S) -> Self {
        Self::QueueSend {
            queue: queue.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn registry_query<S: Into<String>>(partition: PartitionId, message: S) -> Self {
        Self::RegistryQuery {
            partition,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
