use crate::TraceContext;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Envelope schema version, bumped independently of the payload types.
pub const SCHEMA_VERSION: u32 = 1;

/// Typed queue message envelope.
///
/// Every message on every queue hop carries its payload plus the trace
/// header derived from the broadcast's root context, under a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub payload: T,
    pub trace_header: String,
}

impl<T> Envelope<T> {
    pub fn new(payload: T, trace: &TraceContext) -> Self {
        Self {
            version: SCHEMA_VERSION,
            payload,
            trace_header: trace.header(),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
