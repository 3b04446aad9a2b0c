use serde::{Deserialize, Serialize};

use crate::constants::WILDCARD_EVENT;

/// A notification endpoint configured on the remote account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredEndpoint {
    pub url: String,
    pub enabled_event_types: Vec<String>,
    /// Endpoint receives traffic of connected (subordinate) accounts.
    pub is_connect_scoped: bool,
}

impl RegisteredEndpoint {
    pub fn direct(url: impl Into<String>, enabled_event_types: Vec<String>) -> Self {
        Self {
            url: url.into(),
            enabled_event_types,
            is_connect_scoped: false,
        }
    }

    pub fn connect(url: impl Into<String>, enabled_event_types: Vec<String>) -> Self {
        Self {
            url: url.into(),
            enabled_event_types,
            is_connect_scoped: true,
        }
    }
}

/// A local address supplied by the operator, plus the headers to send along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardTarget {
    pub raw_spec: String,
    pub headers: Vec<String>,
}

impl ForwardTarget {
    pub fn new(raw_spec: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            raw_spec: raw_spec.into(),
            headers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_spec.trim().is_empty()
    }
}

/// Final mapping of one registered endpoint to a local delivery URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub delivery_url: String,
    pub forward_headers: Vec<String>,
    pub is_connect_scoped: bool,
    pub event_types: Vec<String>,
}

impl ResolvedRoute {
    pub fn accepts(&self, event_type: &str) -> bool {
        self.event_types
            .iter()
            .any(|t| t == WILDCARD_EVENT || t == event_type)
    }
}
