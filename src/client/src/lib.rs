pub mod config_manager;
pub mod endpoints;
pub mod relay;

pub use endpoints::{EndpointLister, WebhookEndpointsClient};
pub use relay::{LocalRelay, Relay, RelayConfig};
