mod cli;

use clap::Parser;
use cli::Cli;
use holdem_gameroom::HubConfig;
use holdem_hosting::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    holdem_core::init_logging();
    holdem_core::install_shutdown_handler();

    let config = ServerConfig {
        port: cli.port,
        hub: HubConfig {
            action_timeout_ms: cli.action_timeout,
            grace_ms: cli.grace_ms(),
            removal_ms: cli.removal_timeout,
        },
    };

    holdem_hosting::run(config).await?;
    Ok(())
}
