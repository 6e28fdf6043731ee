use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mars_climate::browser::launcher_for;
use mars_climate::climate::Dataset;
use mars_climate::config::Config;
use mars_climate::logging;
use mars_climate::scrape::{MarsScraper, ScrapePipeline};
use mars_climate::storage::{RecordStore, SqliteRecordStore};
use mars_climate::web::{
    self,
    climate::climate_router,
    mars::mars_router,
    state::{ClimateState, MarsState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "mars_climate")]
#[command(about = "Mars news scraper site and Hawaii climate API")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Mars page and the /scrape trigger
    MarsSite {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Serve the climate JSON API
    ClimateApi {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one scrape, store it and print the record as JSON
    Scrape,
}

fn env_port() -> Option<u16> {
    std::env::var("PORT").ok().and_then(|s| s.parse().ok())
}

fn build_pipeline(config: &Config) -> Result<ScrapePipeline> {
    let store: Arc<dyn RecordStore> = Arc::new(
        SqliteRecordStore::open(&config.mars.db_path)
            .with_context(|| format!("opening record store {}", config.mars.db_path.display()))?,
    );
    let scraper = MarsScraper::new(launcher_for(&config.browser), config.sources.clone());
    Ok(ScrapePipeline::new(scraper, store))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    let _log_guard = logging::init_logging(&config.logging).context("initializing logging")?;

    match cli.command {
        Commands::MarsSite { port } => {
            let pipeline = build_pipeline(&config)?;
            let state = MarsState {
                pipeline: Arc::new(pipeline),
            };
            let port = port.or_else(env_port).unwrap_or(config.mars.port);
            info!(engine = ?config.browser.engine, "Starting Mars site");
            web::serve(mars_router(state), port).await?;
        }
        Commands::ClimateApi { port } => {
            let dataset = Dataset::open(&config.climate.db_path)?;
            let state = ClimateState::new(dataset)?;
            let port = port.or_else(env_port).unwrap_or(config.climate.port);
            info!("Starting climate API");
            web::serve(climate_router(state), port).await?;
        }
        Commands::Scrape => {
            let pipeline = build_pipeline(&config)?;
            let record = pipeline.run().await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }
    Ok(())
}
