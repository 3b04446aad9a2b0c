use clap::{Args, Parser, Subcommand};
use hookfwd_common::constants::LOG_FILE;

fn about_message() -> String {
    format!(
        "Relays webhook events to a locally reachable endpoint\nVersion: {}",
        env!("CARGO_PKG_VERSION")
    )
}

const LISTEN_EXAMPLES: &str = "Examples:
  hookfwd listen
  hookfwd listen --events charge.captured,charge.updated --forward-to localhost:3000/events";

fn footer_message() -> String {
    format!("Log file: {}\n", LOG_FILE)
}

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "hookfwd",
    about = about_message(),
    version = env!("CARGO_PKG_VERSION"),
    after_help = footer_message()
)]
pub struct Cli {
    /// Path to a TOML config file (default: ~/.config/hookfwd/config.toml)
    #[clap(long, global = true)]
    pub config: Option<String>,

    /// API key to use instead of the configured keys
    #[clap(long, global = true)]
    pub api_key: Option<String>,

    /// Log filter written to the log file, e.g. `debug` or `hookfwd_client=trace`
    #[clap(long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Listen for webhook events and forward them to a local endpoint
    #[clap(after_help = LISTEN_EXAMPLES)]
    Listen(Box<ListenArgs>),

    /// Shows the current version
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListenArgs {
    /// A comma-separated list of custom headers to forward for Connect
    #[clap(long = "connect-headers", value_delimiter = ',')]
    pub connect_headers: Vec<String>,

    /// A comma-separated list of specific events to listen for
    #[clap(short, long, value_delimiter = ',', default_value = "*")]
    pub events: Vec<String>,

    /// The URL to forward webhook events to
    #[clap(short = 'f', long)]
    pub forward_to: Option<String>,

    /// A comma-separated list of custom headers to forward
    #[clap(short = 'H', long, value_delimiter = ',')]
    pub headers: Vec<String>,

    /// The URL to forward Connect webhook events to (default: same as normal events)
    #[clap(short = 'c', long)]
    pub forward_connect_to: Option<String>,

    /// Receive events formatted with the latest API version
    #[clap(short, long)]
    pub latest: bool,

    /// Receive live events (default: test)
    #[clap(long)]
    pub live: bool,

    /// Print full JSON objects to stdout
    #[clap(short = 'j', long)]
    pub print_json: bool,

    /// Load webhook endpoint configuration from the webhooks API
    #[clap(short = 'a', long, alias = "load-from-webhooks-api")]
    pub use_configured_webhooks: bool,

    /// Skip certificate verification when forwarding to HTTPS endpoints
    #[clap(long)]
    pub skip_verify: bool,

    /// Skip checking for the latest version
    #[clap(short, long)]
    pub skip_update: bool,

    /// Sets the API base URL
    #[clap(long, hide = true)]
    pub api_base: Option<String>,

    /// Force unencrypted ws:// protocol instead of wss://
    #[clap(long, hide = true)]
    pub no_wss: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ListenArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Listen(args) => *args,
            command => panic!("unexpected command {:?}", command),
        }
    }

    #[test]
    fn test_listen_defaults() {
        let args = parse(&["hookfwd", "listen"]);
        assert_eq!(args.events, vec!["*".to_string()]);
        assert!(args.forward_to.is_none());
        assert!(!args.use_configured_webhooks);
    }

    #[test]
    fn test_listen_comma_separated_lists() {
        let args = parse(&[
            "hookfwd",
            "listen",
            "-e",
            "charge.captured,charge.updated",
            "-H",
            "X-One: 1,X-Two: 2",
            "-f",
            "3000",
        ]);
        assert_eq!(args.events, vec!["charge.captured", "charge.updated"]);
        assert_eq!(args.headers, vec!["X-One: 1", "X-Two: 2"]);
        assert_eq!(args.forward_to.as_deref(), Some("3000"));
    }

    #[test]
    fn test_legacy_webhooks_api_flag() {
        let args = parse(&["hookfwd", "listen", "--load-from-webhooks-api", "-f", "3000"]);
        assert!(args.use_configured_webhooks);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hookfwd", "listen", "--api-key", "sk_test_1"]).unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("sk_test_1"));
    }
}
