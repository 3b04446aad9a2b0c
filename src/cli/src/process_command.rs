use anyhow::Result;
use clap::Parser;
use hookfwd_client::config_manager::ConfigLoader;
use hookfwd_client::{LocalRelay, WebhookEndpointsClient};
use hookfwd_common::error_message;

use crate::commands::{Cli, Command};
use crate::listen::run_listen;
use crate::logging::setup_logging;
use crate::version_check::check_latest_version;

/// Process the command line.
pub fn process_cli() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_config(cli.config.as_deref())?;
    if let Some(api_key) = cli.api_key.as_deref() {
        config.override_api_key(api_key);
    }

    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    if let Err(e) = setup_logging(log_level) {
        error_message!("Logging is disabled: {:#}", e);
    }

    match cli.command {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Listen(args) => tokio::runtime::Runtime::new()?.block_on(async {
            if !args.print_json && !args.skip_update {
                check_latest_version().await;
            }

            let config = config.with_api_base(args.api_base.as_deref());
            let lister = WebhookEndpointsClient::new();
            let relay = LocalRelay::stdin();

            run_listen(&args, &config, &lister, &relay).await
        }),
    }
}
