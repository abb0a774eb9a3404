mod api;

use agriwaste_core::{config, traits::RecordStore, RecommendationResolver};
use agriwaste_store::SqliteStore;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "agriwaste",
    version,
    about = "Agricultural waste processing recommendations over HTTP"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", env = "AGRIWASTE_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service.
    Start,
    /// Check configuration and store connectivity.
    Status,
}

/// Load the config file, overlay the environment, and validate.
fn load_config(path: &str) -> anyhow::Result<config::Config> {
    let mut cfg = config::load(path)?;
    cfg.apply_env()?;
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_result = dotenv::dotenv();
    let cli = Cli::parse();

    // Log level comes from RUST_LOG, else from the config file.
    let default_level = config::load(&cli.config)
        .map(|c| c.service.log_level)
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if dotenv_result.is_err() {
        info!("No .env file found, using process environment");
    }

    match cli.command {
        Commands::Start => {
            let cfg = load_config(&cli.config)?;

            let store = Arc::new(SqliteStore::connect(&cfg.database).await?);
            let resolver =
                RecommendationResolver::new(store.clone(), cfg.database.query_timeout());

            info!("{} starting", cfg.service.name);
            let result = api::serve(&cfg.server, &cfg.cors, resolver).await;

            store.close().await;
            info!("Recommendation store closed");
            result?;
        }
        Commands::Status => {
            let cfg = load_config(&cli.config)?;
            println!("{} - Status Check\n", cfg.service.name);
            println!("Config: {}", cli.config);
            println!("Listen: {}", cfg.server.bind_addr());
            println!("Store:  {}", cfg.database.url);
            println!(
                "CORS:   {}",
                if cfg.cors.allowed_origins.is_empty() {
                    "disabled".to_string()
                } else {
                    cfg.cors.allowed_origins.join(", ")
                }
            );
            println!();

            match SqliteStore::connect(&cfg.database).await {
                Ok(store) => {
                    match store.count_active().await {
                        Ok(n) => println!("  store: connected ({n} active recommendations)"),
                        Err(e) => println!("  store: connected, count failed: {e}"),
                    }
                    store.close().await;
                }
                Err(e) => {
                    warn!("status: {e}");
                    println!("  store: unavailable ({e})");
                }
            }
        }
    }

    Ok(())
}
