use std::time::Duration;

use anyhow::{Context, Result};
use hookfwd_common::constants::user_agent;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info_span, Instrument};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// A local URL plus the operator headers to send with each event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Sends one POST per destination. Retrying is left to the event source.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: Client,
}

impl DeliveryClient {
    pub fn new(skip_verify: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .danger_accept_invalid_certs(skip_verify)
            .build()
            .context("Failed to build delivery client")?;

        Ok(Self { client })
    }

    /// Returns the status code of the local endpoint's response.
    pub async fn deliver(&self, destination: &Destination, body: &str) -> Result<u16> {
        let span = info_span!("delivery", url = %destination.url);

        async move {
            let mut request = self
                .client
                .post(&destination.url)
                .header(CONTENT_TYPE, "application/json")
                .header(USER_AGENT, user_agent());

            for (name, value) in &destination.headers {
                request = request.header(name.as_str(), value.as_str());
            }

            let response = request
                .body(body.to_string())
                .send()
                .await
                .with_context(|| format!("Failed to POST to {}", destination.url))?;

            let status = response.status().as_u16();
            debug!(status, "Delivered event");
            Ok(status)
        }
        .instrument(span)
        .await
    }
}
