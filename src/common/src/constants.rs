pub const WORKING_DIR: &str = "/tmp/hookfwd/";
pub const LOG_FILE: &str = "/tmp/hookfwd/hookfwd.log";

pub const REPO_OWNER: &str = "hookfwd";
pub const REPO_NAME: &str = "hookfwd";

pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
/// Version the endpoint listing is pinned to, so the response shape stays stable.
pub const WEBHOOK_ENDPOINTS_API_VERSION: &str = "2019-03-14";
pub const WEBHOOK_ENDPOINTS_PAGE_LIMIT: u32 = 100;

pub const WILDCARD_EVENT: &str = "*";

pub const DASHBOARD_WEBHOOKS_URL: &str = "https://dashboard.stripe.com/test/webhooks";

pub fn user_agent() -> String {
    format!("hookfwd/{}", env!("CARGO_PKG_VERSION"))
}
