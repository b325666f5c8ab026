use crate::{CoreError, Result};

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;

/// Correlation context threaded through every queue hop of one broadcast.
///
/// The root id is minted once at the trigger and never changes identity;
/// each downstream hop derives a child with a fresh parent span id so all
/// spans join into one causal trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    root: String,
    parent: String,
    sampled: bool,
}

impl TraceContext {
    /// Mint a fresh root context for one broadcast.
    pub fn new_root() -> Self {
        let epoch = Utc::now().timestamp() as u32;
        let unique = rand::random::<u128>() & ((1u128 << 96) - 1);

        Self {
            root: format!("1-{epoch:08x}-{unique:024x}"),
            parent: Self::new_span_id(),
            sampled: true,
        }
    }

    /// Derive a child context: same root, fresh parent span id.
    pub fn child(&self) -> Self {
        Self {
            root: self.root.clone(),
            parent: Self::new_span_id(),
            sampled: self.sampled,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn sampled(&self) -> bool {
        self.sampled
    }

    /// Wire format carried in queue message envelopes.
    pub fn header(&self) -> String {
        format!(
            "Root={};Parent={};Sampled={}",
            self.root, self.parent, self.sampled as u8
        )
    }

    /// Parse the wire format back into a context.
    #[track_caller]
    pub fn parse(header: &str) -> Result<Self> {
        let mut root = None;
        let mut parent = None;
        let mut sampled = true;

        for field in header.split(';') {
            match field.split_once('=') {
                Some(("Root", value)) if !value.is_empty() => root = Some(value.to_string()),
                Some(("Parent", value)) if !value.is_empty() => parent = Some(value.to_string()),
                Some(("Sampled", value)) => sampled = value == "1",
                _ => {
                    return Err(CoreError::MalformedTraceHeader {
                        header: header.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        match (root, parent) {
            (Some(root), Some(parent)) => Ok(Self {
                root,
                parent,
                sampled,
            }),
            _ => Err(CoreError::MalformedTraceHeader {
                header: header.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn new_span_id() -> String {
        format!("{:016x}", rand::random::<u64>())
    }
}
