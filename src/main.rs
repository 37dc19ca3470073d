mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use tautulli_relay::config::Config;
use tautulli_relay::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Server(args) => {
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            tautulli_relay::api::run(config).await?
        }
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}
