use clap::Parser;
use intraday_engine::cli::{Cli, Commands};
use intraday_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may come from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    intraday_engine::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(mode = ?config.execution.mode, live_flag = args.live, "Starting trading loop");
            args.execute(config).await?;
        }
        Commands::Resolve(args) => {
            tracing::info!("Resolving watchlist");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration ({}):", cli.config);
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
