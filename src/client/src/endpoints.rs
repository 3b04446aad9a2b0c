use anyhow::{Context, Result};
use hookfwd_common::constants::{
    user_agent, WEBHOOK_ENDPOINTS_API_VERSION, WEBHOOK_ENDPOINTS_PAGE_LIMIT,
};
use hookfwd_common::types::RegisteredEndpoint;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Source of the notification endpoints configured on an account.
#[automock]
#[async_trait::async_trait]
pub trait EndpointLister {
    async fn list(&self, api_base: &str, api_key: &str) -> Result<Vec<RegisteredEndpoint>>;
}

#[derive(Debug, Deserialize)]
struct WebhookEndpoint {
    id: String,
    url: String,
    #[serde(default)]
    enabled_events: Vec<String>,
    #[serde(default)]
    application: Option<String>,
}

impl From<WebhookEndpoint> for RegisteredEndpoint {
    fn from(endpoint: WebhookEndpoint) -> Self {
        RegisteredEndpoint {
            url: endpoint.url,
            enabled_event_types: endpoint.enabled_events,
            is_connect_scoped: endpoint
                .application
                .is_some_and(|application| !application.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebhookEndpointList {
    data: Vec<WebhookEndpoint>,
    #[serde(default)]
    has_more: bool,
}

pub struct WebhookEndpointsClient {
    client: Client,
}

impl WebhookEndpointsClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    fn get_url(api_base: &str) -> String {
        format!("{}/v1/webhook_endpoints", api_base.trim_end_matches('/'))
    }

    async fn fetch_page(
        &self,
        api_base: &str,
        api_key: &str,
        starting_after: Option<&str>,
    ) -> Result<WebhookEndpointList> {
        let mut query = vec![("limit", WEBHOOK_ENDPOINTS_PAGE_LIMIT.to_string())];
        if let Some(id) = starting_after {
            query.push(("starting_after", id.to_string()));
        }

        let page = self
            .client
            .get(Self::get_url(api_base))
            .bearer_auth(api_key)
            .header("API-Version", WEBHOOK_ENDPOINTS_API_VERSION)
            .header(reqwest::header::USER_AGENT, user_agent())
            .query(&query)
            .send()
            .await
            .context("Failed to request webhook endpoints")?
            .error_for_status()
            .context("Webhook endpoints request was rejected")?
            .json()
            .await
            .context("Failed to parse webhook endpoints response")?;

        Ok(page)
    }
}

impl Default for WebhookEndpointsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EndpointLister for WebhookEndpointsClient {
    async fn list(&self, api_base: &str, api_key: &str) -> Result<Vec<RegisteredEndpoint>> {
        let mut endpoints = vec![];
        let mut starting_after: Option<String> = None;

        loop {
            let page = self
                .fetch_page(api_base, api_key, starting_after.as_deref())
                .await?;
            debug!(
                count = page.data.len(),
                has_more = page.has_more,
                "Fetched webhook endpoints page"
            );

            starting_after = page.data.last().map(|endpoint| endpoint.id.clone());
            endpoints.extend(page.data.into_iter().map(RegisteredEndpoint::from));

            if !page.has_more || starting_after.is_none() {
                break;
            }
        }

        Ok(endpoints)
    }
}
