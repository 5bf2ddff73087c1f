mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    config::load_dotenv();
    let cli = Cli::parse();
    observability::init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(&cli)?;
    let format = cli.format.unwrap_or_default();
    debug!(limits = ?config.scopes.limits, ?format, "Loaded configuration");

    match &cli.command {
        Commands::Migrate => commands::migrate::migrate(&config).await?,
        Commands::Get(args) => commands::scopes::get(&config, args, format).await?,
        Commands::Resolve(args) => commands::scopes::resolve(&config, args, format).await?,
        Commands::List(args) => commands::scopes::list(&config, args, format).await?,
    }

    Ok(())
}
