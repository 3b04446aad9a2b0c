//! Turns operator forwarding targets and the account's registered endpoints
//! into the route table handed to the relay.
mod endpoint_routes;
mod forward_url;
mod headers;

pub use endpoint_routes::{resolve_endpoint_routes, routes_for};
pub use forward_url::{compose_forward_url, normalize_forward_url, ForwardUrlError};
pub use headers::parse_forward_headers;
