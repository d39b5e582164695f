use lingua::cli::{self, parse_args, run_cli_command, CliCommand};
use lingua::client::ApiClient;
use lingua::config::ClientConfig;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = parse_args(std::env::args());
    if command == CliCommand::Version {
        println!("lingua {}", cli::VERSION);
        return Ok(());
    }

    cli::logging::init();

    let config = ClientConfig::from_env().wrap_err("Invalid configuration")?;
    tracing::debug!("Using API at {}", config.base_url);
    let client = ApiClient::with_defaults(config).wrap_err("Failed to initialise the API client")?;

    client.register_session_invalidated_callback(|_| {
        eprintln!("Session expired. Run `lingua login` to sign in again.");
    });

    run_cli_command(&client, command).await
}
