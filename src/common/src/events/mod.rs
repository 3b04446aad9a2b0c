mod known_events;

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::constants::WILDCARD_EVENT;

pub use known_events::KNOWN_EVENT_TYPES;

pub static KNOWN_EVENTS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KNOWN_EVENT_TYPES.iter().copied().collect());

/// Returns the requested event types missing from `known`, in request order.
///
/// The wildcard is always accepted. An unknown type is never an error: the
/// caller warns and keeps listening with the filter as given.
pub fn unknown_event_types(requested: &[String], known: &HashSet<&str>) -> Vec<String> {
    requested
        .iter()
        .filter(|event| event.as_str() != WILDCARD_EVENT && !known.contains(event.as_str()))
        .cloned()
        .collect()
}

/// True when an event of `event_type` passes the operator's filter.
pub fn filter_admits(filter: &[String], event_type: &str) -> bool {
    filter.is_empty()
        || filter
            .iter()
            .any(|event| event == WILDCARD_EVENT || event == event_type)
}
