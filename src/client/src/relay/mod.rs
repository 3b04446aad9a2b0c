//! The relay receives events and delivers them to the resolved local routes.
mod delivery;
mod local;

use anyhow::Result;
use hookfwd_common::routing::{parse_forward_headers, routes_for};
use hookfwd_common::types::ResolvedRoute;
use mockall::automock;

pub use delivery::{DeliveryClient, Destination};
pub use local::{LocalRelay, RelaySummary};

/// Everything a relay needs for one listen session.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub device_name: String,
    pub api_key: String,

    /// Normalized direct target, when the operator gave `--forward-to`.
    pub forward_url: Option<String>,
    pub forward_headers: Vec<String>,
    /// Normalized connect target, when the operator gave `--forward-connect-to`.
    pub forward_connect_url: Option<String>,
    pub forward_connect_headers: Vec<String>,
    pub endpoint_routes: Vec<ResolvedRoute>,

    pub events: Vec<String>,
    pub print_json: bool,
    pub use_latest_api_version: bool,
    pub skip_verify: bool,
    pub livemode: bool,
    pub api_base_url: String,
    pub no_wss: bool,
}

impl RelayConfig {
    /// Where an event of `event_type` has to be delivered.
    ///
    /// The endpoint route table wins when present. Otherwise connect events go
    /// to the connect target, falling back to the direct target.
    pub fn destinations(&self, event_type: &str, is_connect: bool) -> Vec<Destination> {
        if !self.endpoint_routes.is_empty() {
            return routes_for(&self.endpoint_routes, event_type, is_connect)
                .into_iter()
                .map(|route| Destination {
                    url: route.delivery_url.clone(),
                    headers: parse_forward_headers(&route.forward_headers),
                })
                .collect();
        }

        let connect = if is_connect {
            self.forward_connect_url
                .as_ref()
                .map(|url| (url, &self.forward_connect_headers))
        } else {
            None
        };

        connect
            .or_else(|| {
                self.forward_url
                    .as_ref()
                    .map(|url| (url, &self.forward_headers))
            })
            .map(|(url, headers)| Destination {
                url: url.clone(),
                headers: parse_forward_headers(headers),
            })
            .into_iter()
            .collect()
    }
}

#[automock]
#[async_trait::async_trait]
pub trait Relay {
    /// Runs the session until the event source is exhausted or fails.
    async fn start(&self, config: RelayConfig) -> Result<()>;
}
