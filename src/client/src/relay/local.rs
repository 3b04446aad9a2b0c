use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use hookfwd_common::events::filter_admits;
use hookfwd_common::warning_message;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::delivery::DeliveryClient;
use super::{Relay, RelayConfig};

#[derive(Debug, Deserialize)]
struct RelayEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    account: Option<String>,
}

impl RelayEvent {
    fn is_connect(&self) -> bool {
        self.account.as_deref().is_some_and(|account| !account.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub received: usize,
    pub skipped: usize,
    pub delivered: usize,
    pub failed: usize,
}

type EventSource = Box<dyn AsyncBufRead + Send + Unpin>;

/// Relays newline-delimited JSON events read from a local stream.
pub struct LocalRelay {
    input: Mutex<Option<EventSource>>,
}

impl LocalRelay {
    pub fn new(input: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        Self {
            input: Mutex::new(Some(Box::new(input))),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Relays until the input ends. Delivery failures are reported and skipped.
    pub async fn run(&self, config: &RelayConfig) -> Result<RelaySummary> {
        let input = self
            .input
            .lock()
            .await
            .take()
            .context("Relay input was already consumed")?;
        let delivery = DeliveryClient::new(config.skip_verify)?;

        let mut summary = RelaySummary::default();
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await.context("Failed to read event")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event: RelayEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    warning_message!("Skipping malformed event: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            if !filter_admits(&config.events, &event.event_type) {
                debug!(event_type = %event.event_type, "Event filtered out");
                summary.skipped += 1;
                continue;
            }
            summary.received += 1;

            if config.print_json {
                println!("{}", line);
            } else {
                println!(
                    "{}   --> {} [{}]",
                    timestamp(),
                    event.event_type.bold(),
                    event.id
                );
            }

            for destination in config.destinations(&event.event_type, event.is_connect()) {
                match delivery.deliver(&destination, line).await {
                    Ok(status) => {
                        summary.delivered += 1;
                        let status = if (200..300).contains(&status) {
                            status.to_string().green()
                        } else {
                            status.to_string().red()
                        };
                        if !config.print_json {
                            println!(
                                "{}  <-- [{}] POST {} [{}]",
                                timestamp(),
                                status,
                                destination.url,
                                event.id
                            );
                        }
                    }
                    Err(e) => {
                        summary.failed += 1;
                        warn!(error = ?e, event_id = %event.id, "Delivery failed");
                        eprintln!(
                            "{}            [{}] Failed to POST: {:#}",
                            timestamp(),
                            "ERROR".red(),
                            e
                        );
                    }
                }
            }
        }

        Ok(summary)
    }
}

#[async_trait::async_trait]
impl Relay for LocalRelay {
    async fn start(&self, config: RelayConfig) -> Result<()> {
        info!(
            device = %config.device_name,
            livemode = config.livemode,
            routes = config.endpoint_routes.len(),
            "Starting local relay"
        );
        let summary = self.run(&config).await?;
        info!(?summary, "Local relay finished");
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
