use std::error::Error;
use std::fmt;

use url::Url;

/// The operator supplied a forwarding base that cannot be used as an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardUrlError {
    pub forward_url: String,
    pub reason: String,
}

impl fmt::Display for ForwardUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Provided forward url cannot be parsed: {} ({})",
            self.forward_url, self.reason
        )
    }
}

impl Error for ForwardUrlError {}

/// Expands a partial location into a full http(s) URL.
///
/// - `3000` becomes `http://localhost:3000`
/// - `/hooks` becomes `http://localhost/hooks`
/// - `example.com/hooks` becomes `http://example.com/hooks`
/// - anything already starting with `http://` or `https://` is returned as is
pub fn normalize_forward_url(spec: &str) -> String {
    let mut url = spec.to_string();

    if is_port_number(&url) {
        url = format!("localhost:{}", url);
    }

    if url.starts_with('/') {
        url = format!("localhost{}", url);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("http://{}", url);
    }

    url
}

fn is_port_number(spec: &str) -> bool {
    !spec.is_empty() && spec.bytes().all(|b| b.is_ascii_digit())
}

/// Port exactly as written in `base`. `Url::port` hides the scheme's default port.
fn written_port(base: &str) -> Option<u16> {
    let (_, rest) = base.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host_port.ends_with(']') {
        return None;
    }
    let (_, port) = host_port.rsplit_once(':')?;
    port.parse().ok()
}

/// Joins the endpoint's path beneath the forwarding base.
///
/// Only scheme, host, port and path of `base` survive; its query and fragment are dropped.
pub fn compose_forward_url(
    base: &str,
    destination_path: &str,
) -> Result<String, ForwardUrlError> {
    let parsed = Url::parse(base).map_err(|e| ForwardUrlError {
        forward_url: base.to_string(),
        reason: e.to_string(),
    })?;

    let host = parsed.host_str().ok_or_else(|| ForwardUrlError {
        forward_url: base.to_string(),
        reason: "missing host".to_string(),
    })?;

    let authority = match parsed.port().or_else(|| written_port(base)) {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Ok(format!(
        "{}://{}{}{}",
        parsed.scheme(),
        authority,
        parsed.path().trim_end_matches('/'), // avoids a double "//"
        destination_path
    ))
}
