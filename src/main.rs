use clap::Parser;
use trademind::cli::{Cli, Commands};
use trademind::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env();
    config.validate()?;

    match cli.command {
        Commands::Serve(args) => {
            let _telemetry = trademind::telemetry::init_telemetry(&config.telemetry)?;
            tracing::info!(
                symbols = ?config.feed.crypto_symbols,
                capacity = config.feed.history_capacity,
                "Starting trademind"
            );
            args.execute(&config).await?;
        }
        Commands::Config => {
            let mut shown = config.clone();
            shown.equity.api_key = config.redacted_api_key();
            println!("{}", toml::to_string_pretty(&shown)?);
        }
    }

    Ok(())
}
