use hookfwd_cli::process_command::process_cli;
use hookfwd_common::error_message;

pub fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install default crypto provider: {:?}", e))?;

    if let Err(e) = process_cli() {
        error_message!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
