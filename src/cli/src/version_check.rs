use std::time::Duration;

use anyhow::Result;
use hookfwd_common::constants::{REPO_NAME, REPO_OWNER};
use hookfwd_common::warning_message;
use tracing::debug;

const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let version = version.trim_start_matches('v');
    let version = version.split(['+', '-']).next()?;
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let major = parts[0].parse::<u32>().ok()?;
    let minor = parts[1].parse::<u32>().ok()?;
    let patch = parts[2].parse::<u32>().ok()?;

    Some((major, minor, patch))
}

fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

async fn latest_release_tag() -> Result<String> {
    let octocrab = octocrab::instance();
    let release = octocrab
        .repos(REPO_OWNER, REPO_NAME)
        .releases()
        .get_latest()
        .await?;
    Ok(release.tag_name)
}

/// Prints a notice when a newer release exists. Never fails the command.
pub async fn check_latest_version() {
    let current = env!("CARGO_PKG_VERSION");

    match tokio::time::timeout(VERSION_CHECK_TIMEOUT, latest_release_tag()).await {
        Ok(Ok(latest)) if is_newer(&latest, current) => {
            warning_message!(
                "A newer version of hookfwd is available: {} (you have {})",
                latest,
                current
            );
        }
        Ok(Ok(latest)) => debug!(%latest, "hookfwd is up to date"),
        Ok(Err(e)) => debug!(error = ?e, "Failed to check the latest version"),
        Err(_) => debug!("Timed out checking the latest version"),
    }
}
