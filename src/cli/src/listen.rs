use std::error::Error;
use std::fmt;

use anyhow::Result;
use hookfwd_client::config_manager::Config;
use hookfwd_client::{EndpointLister, Relay, RelayConfig};
use hookfwd_common::constants::DASHBOARD_WEBHOOKS_URL;
use hookfwd_common::events::{unknown_event_types, KNOWN_EVENTS};
use hookfwd_common::routing::{normalize_forward_url, resolve_endpoint_routes, ForwardUrlError};
use hookfwd_common::types::{ForwardTarget, ResolvedRoute};
use hookfwd_common::{info_message, success_message, warning_message};
use tracing::info;

use crate::commands::ListenArgs;

/// Operator input that keeps the relay from starting.
#[derive(Debug)]
pub enum ListenError {
    MissingForwardTo,
    RelativeForwardUrl { flag: &'static str },
    NoEndpointsConfigured,
    InvalidForwardUrl(ForwardUrlError),
}

impl fmt::Display for ListenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenError::MissingForwardTo => write!(
                f,
                "--use-configured-webhooks requires a location to forward to with --forward-to"
            ),
            ListenError::RelativeForwardUrl { flag } => write!(
                f,
                "{} cannot be a relative path when loading webhook endpoints from the API",
                flag
            ),
            ListenError::NoEndpointsConfigured => write!(
                f,
                "You have not defined any webhook endpoints on your account. \
                 Go to the Dashboard to add some: {}",
                DASHBOARD_WEBHOOKS_URL
            ),
            ListenError::InvalidForwardUrl(e) => write!(f, "{}", e),
        }
    }
}

impl Error for ListenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ListenError::InvalidForwardUrl(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ForwardUrlError> for ListenError {
    fn from(err: ForwardUrlError) -> Self {
        ListenError::InvalidForwardUrl(err)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn direct_target(args: &ListenArgs) -> Option<ForwardTarget> {
    non_empty(&args.forward_to).map(|url| ForwardTarget::new(url, args.headers.clone()))
}

/// The connect target falls back to the direct one, URL and headers separately.
fn connect_target(args: &ListenArgs) -> Option<ForwardTarget> {
    let direct = direct_target(args);
    let raw_spec = non_empty(&args.forward_connect_to)
        .map(str::to_string)
        .or_else(|| direct.as_ref().map(|d| d.raw_spec.clone()))?;

    let headers = if args.connect_headers.is_empty() {
        direct.map(|d| d.headers).unwrap_or_default()
    } else {
        args.connect_headers.clone()
    };

    Some(ForwardTarget::new(raw_spec, headers))
}

/// Fetches the account's endpoints and maps each onto the local targets.
pub async fn load_endpoint_routes(
    args: &ListenArgs,
    api_base: &str,
    api_key: &str,
    lister: &dyn EndpointLister,
) -> Result<Vec<ResolvedRoute>> {
    let direct = direct_target(args).ok_or(ListenError::MissingForwardTo)?;

    if direct.raw_spec.starts_with('/') {
        return Err(ListenError::RelativeForwardUrl {
            flag: "--forward-to",
        }
        .into());
    }
    if non_empty(&args.forward_connect_to).is_some_and(|url| url.starts_with('/')) {
        return Err(ListenError::RelativeForwardUrl {
            flag: "--forward-connect-to",
        }
        .into());
    }

    let endpoints = lister.list(api_base, api_key).await?;
    if endpoints.is_empty() {
        return Err(ListenError::NoEndpointsConfigured.into());
    }
    info!(count = endpoints.len(), "Loaded webhook endpoints");

    let connect = connect_target(args).unwrap_or_else(|| direct.clone());
    let routes =
        resolve_endpoint_routes(&endpoints, &direct, &connect).map_err(ListenError::from)?;

    Ok(routes)
}

pub fn build_relay_config(
    args: &ListenArgs,
    config: &Config,
    api_key: String,
    endpoint_routes: Vec<ResolvedRoute>,
) -> RelayConfig {
    let direct = direct_target(args);
    let connect = connect_target(args);

    RelayConfig {
        device_name: config.device_name.clone(),
        api_key,
        forward_url: direct.as_ref().map(|t| normalize_forward_url(&t.raw_spec)),
        forward_headers: direct.map(|t| t.headers).unwrap_or_default(),
        forward_connect_url: connect.as_ref().map(|t| normalize_forward_url(&t.raw_spec)),
        forward_connect_headers: connect.map(|t| t.headers).unwrap_or_default(),
        endpoint_routes,
        events: args.events.clone(),
        print_json: args.print_json,
        use_latest_api_version: args.latest,
        skip_verify: args.skip_verify,
        livemode: args.live,
        api_base_url: config.api_base_url.clone(),
        no_wss: args.no_wss,
    }
}

fn print_ready(relay_config: &RelayConfig) {
    success_message!(
        "Ready! Relaying {} events for {}",
        if relay_config.livemode { "live" } else { "test" },
        relay_config.device_name
    );

    if !relay_config.endpoint_routes.is_empty() {
        for route in &relay_config.endpoint_routes {
            info_message!(
                "Forwarding{} [{}] to {}",
                if route.is_connect_scoped { " Connect" } else { "" },
                route.event_types.join(", "),
                route.delivery_url
            );
        }
        return;
    }

    if let Some(url) = &relay_config.forward_url {
        info_message!("Forwarding events to {}", url);
    }
    if let Some(url) = &relay_config.forward_connect_url {
        info_message!("Forwarding Connect events to {}", url);
    }
    if relay_config.forward_url.is_none() && relay_config.forward_connect_url.is_none() {
        info_message!("No forwarding target given; events are only printed");
    }
}

/// Validates the listen flags, builds the route table and hands it to the relay.
pub async fn run_listen(
    args: &ListenArgs,
    config: &Config,
    lister: &dyn EndpointLister,
    relay: &dyn Relay,
) -> Result<()> {
    let api_key = config.api_key(args.live)?;

    for event in unknown_event_types(&args.events, &KNOWN_EVENTS) {
        warning_message!(
            "You're attempting to listen for \"{}\", which isn't a valid event",
            event
        );
    }

    let endpoint_routes = if args.use_configured_webhooks {
        load_endpoint_routes(args, &config.api_base_url, &api_key, lister).await?
    } else {
        vec![]
    };

    let relay_config = build_relay_config(args, config, api_key, endpoint_routes);
    print_ready(&relay_config);

    relay.start(relay_config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookfwd_client::endpoints::MockEndpointLister;
    use hookfwd_client::relay::MockRelay;
    use hookfwd_common::types::RegisteredEndpoint;

    fn config() -> Config {
        Config {
            device_name: "laptop".to_string(),
            test_mode_api_key: Some("sk_test_123".to_string()),
            live_mode_api_key: None,
            api_base_url: "http://127.0.0.1:12111".to_string(),
            log_level: "info".to_string(),
            config_sources: vec![],
        }
    }

    fn listen_args() -> ListenArgs {
        ListenArgs {
            events: vec!["*".to_string()],
            ..Default::default()
        }
    }

    fn listing() -> Vec<RegisteredEndpoint> {
        vec![
            RegisteredEndpoint::direct("https://example.com/a", vec!["*".to_string()]),
            RegisteredEndpoint::direct("not a url", vec!["*".to_string()]),
            RegisteredEndpoint::connect("https://example.com/b", vec!["*".to_string()]),
        ]
    }

    fn error_of(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[tokio::test]
    async fn test_configured_webhooks_build_route_table() {
        let mut lister = MockEndpointLister::new();
        lister
            .expect_list()
            .withf(|api_base, api_key| {
                api_base == "http://127.0.0.1:12111" && api_key == "sk_test_123"
            })
            .times(1)
            .returning(|_, _| Ok(listing()));

        let mut relay = MockRelay::new();
        relay
            .expect_start()
            .withf(|config: &RelayConfig| {
                let table: Vec<(&str, bool)> = config
                    .endpoint_routes
                    .iter()
                    .map(|r| (r.delivery_url.as_str(), r.is_connect_scoped))
                    .collect();
                table
                    == vec![
                        ("http://localhost:3000/a", false),
                        ("http://localhost:4000/b", true),
                    ]
                    && config.forward_url.as_deref() == Some("http://localhost:3000")
                    && config.forward_connect_url.as_deref() == Some("http://localhost:4000")
            })
            .times(1)
            .returning(|_| Ok(()));

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("3000".to_string()),
            forward_connect_to: Some("4000".to_string()),
            ..listen_args()
        };

        run_listen(&args, &config(), &lister, &relay).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_routes_fall_back_to_forward_to() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().returning(|_, _| Ok(listing()));

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("localhost:3000/hooks".to_string()),
            headers: vec!["X-Local: 1".to_string()],
            ..listen_args()
        };

        let routes = load_endpoint_routes(&args, "http://api", "sk_test_123", &lister)
            .await
            .unwrap();
        assert_eq!(routes[1].delivery_url, "http://localhost:3000/hooks/b");
        assert_eq!(routes[1].forward_headers, vec!["X-Local: 1".to_string()]);
    }

    #[tokio::test]
    async fn test_configured_webhooks_require_forward_to() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().never();
        let mut relay = MockRelay::new();
        relay.expect_start().never();

        let args = ListenArgs {
            use_configured_webhooks: true,
            ..listen_args()
        };

        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.contains("requires a location to forward to"));
    }

    #[tokio::test]
    async fn test_relative_paths_rejected_with_configured_webhooks() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().never();
        let mut relay = MockRelay::new();
        relay.expect_start().never();

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("/hooks".to_string()),
            ..listen_args()
        };
        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.starts_with("--forward-to cannot be a relative path"));

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("3000".to_string()),
            forward_connect_to: Some("/connect".to_string()),
            ..listen_args()
        };
        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.starts_with("--forward-connect-to cannot be a relative path"));
    }

    #[tokio::test]
    async fn test_empty_listing_is_an_error() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().returning(|_, _| Ok(vec![]));
        let mut relay = MockRelay::new();
        relay.expect_start().never();

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("3000".to_string()),
            ..listen_args()
        };

        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.contains("not defined any webhook endpoints"));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let mut lister = MockEndpointLister::new();
        lister
            .expect_list()
            .returning(|_, _| Err(anyhow::anyhow!("401 Unauthorized")));
        let mut relay = MockRelay::new();
        relay.expect_start().never();

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("3000".to_string()),
            ..listen_args()
        };

        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.contains("401"));
    }

    #[tokio::test]
    async fn test_unusable_forward_to_is_fatal() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().returning(|_, _| Ok(listing()));
        let mut relay = MockRelay::new();
        relay.expect_start().never();

        let args = ListenArgs {
            use_configured_webhooks: true,
            forward_to: Some("http://".to_string()),
            ..listen_args()
        };

        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.contains("cannot be parsed"));
    }

    #[tokio::test]
    async fn test_plain_forwarding_skips_listing() {
        let mut lister = MockEndpointLister::new();
        lister.expect_list().never();

        let mut relay = MockRelay::new();
        relay
            .expect_start()
            .withf(|config: &RelayConfig| {
                config.endpoint_routes.is_empty()
                    && config.forward_url.as_deref() == Some("http://localhost/hooks")
                    && config.forward_connect_url.as_deref() == Some("http://localhost/hooks")
                    && config.events == vec!["charge.succeeded".to_string(), "made.up".to_string()]
                    && config.api_key == "sk_test_123"
            })
            .times(1)
            .returning(|_| Ok(()));

        let args = ListenArgs {
            forward_to: Some("/hooks".to_string()),
            events: vec!["charge.succeeded".to_string(), "made.up".to_string()],
            ..listen_args()
        };

        run_listen(&args, &config(), &lister, &relay).await.unwrap();
    }

    #[tokio::test]
    async fn test_live_mode_needs_live_key() {
        let lister = MockEndpointLister::new();
        let relay = MockRelay::new();

        let args = ListenArgs {
            live: true,
            ..listen_args()
        };

        let err = error_of(run_listen(&args, &config(), &lister, &relay).await);
        assert!(err.contains("No live mode API key"));
    }
}
