mod ingest;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuelwatch_scraper::RetailerClient;

#[derive(Debug, Parser)]
#[command(name = "fuelwatch")]
#[command(about = "Ingest UK retailer fuel prices into the station store")]
struct Cli {
    /// Fetch, normalize and summarize without touching the database
    #[arg(long)]
    dry_run: bool,

    /// Retailer registry YAML that replaces the built-in list
    #[arg(long, value_name = "PATH")]
    retailers: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = fuelwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry_path = cli
        .retailers
        .as_deref()
        .or(config.retailers_path.as_deref());
    let sources = fuelwatch_core::resolve_retailers(registry_path)?;
    let client = RetailerClient::new(config.fetch_timeout_secs, &config.user_agent)?;

    if cli.dry_run {
        let report = ingest::run_dry(&client, &sources, &config).await;
        println!("{report}");
        return Ok(());
    }

    let pool = fuelwatch_db::connect_pool_from_config(&config).await?;
    let applied = fuelwatch_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }

    let summary = ingest::run_ingest(&pool, &client, &sources, &config).await;
    println!("Updated {} stations", summary.persisted);

    Ok(())
}
