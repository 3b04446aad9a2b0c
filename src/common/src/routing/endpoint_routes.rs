use tracing::{debug, warn};
use url::Url;

use super::forward_url::{compose_forward_url, normalize_forward_url, ForwardUrlError};
use crate::types::{ForwardTarget, RegisteredEndpoint, ResolvedRoute};

/// Builds one route per registered endpoint, in listing order.
///
/// Endpoints from the remote listing are best effort: one whose URL does not
/// parse is skipped. The forwarding targets come from the operator, so a base
/// that cannot be composed fails the whole resolution.
///
/// Callers substitute the direct target for `connect` when the operator gave
/// no connect target.
pub fn resolve_endpoint_routes(
    endpoints: &[RegisteredEndpoint],
    direct: &ForwardTarget,
    connect: &ForwardTarget,
) -> Result<Vec<ResolvedRoute>, ForwardUrlError> {
    let direct_base = normalize_forward_url(&direct.raw_spec);
    let connect_base = normalize_forward_url(&connect.raw_spec);

    let mut routes = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        let destination = match Url::parse(&endpoint.url) {
            Ok(url) if !url.cannot_be_a_base() => url,
            Ok(_) => {
                warn!(url = %endpoint.url, "Skipping webhook endpoint without a path");
                continue;
            }
            Err(e) => {
                warn!(
                    url = %endpoint.url,
                    error = %e,
                    "Skipping webhook endpoint with an invalid url"
                );
                continue;
            }
        };

        // Dashboard endpoints usually point at a public host, so only the path
        // is kept and placed beneath the local forwarding base.
        let (base, target) = if endpoint.is_connect_scoped {
            (&connect_base, connect)
        } else {
            (&direct_base, direct)
        };

        let route = ResolvedRoute {
            delivery_url: compose_forward_url(base, destination.path())?,
            forward_headers: target.headers.clone(),
            is_connect_scoped: endpoint.is_connect_scoped,
            event_types: endpoint.enabled_event_types.clone(),
        };
        debug!(
            from = %endpoint.url,
            to = %route.delivery_url,
            connect = route.is_connect_scoped,
            "Resolved endpoint route"
        );
        routes.push(route);
    }

    Ok(routes)
}

/// Routes that should receive an event of `event_type`, in table order.
pub fn routes_for<'a>(
    routes: &'a [ResolvedRoute],
    event_type: &str,
    is_connect: bool,
) -> Vec<&'a ResolvedRoute> {
    routes
        .iter()
        .filter(|route| route.is_connect_scoped == is_connect && route.accepts(event_type))
        .collect()
}
