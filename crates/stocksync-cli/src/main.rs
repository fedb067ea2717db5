use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stocksync-cli")]
#[command(about = "Manual ERP stock sync runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pull stock from the ERP and write it into the shop tables.
    Sync {
        /// Sync a single item (and its options) instead of the full list.
        #[arg(long)]
        item: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = stocksync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync { item } => {
            let pool_config = stocksync_db::PoolConfig::from_app_config(&config);
            let pool = stocksync_db::connect_pool(&config.database_url, pool_config).await?;

            let erp_config = stocksync_erp::ErpConfig::from_app_config(&config);
            let erp = Arc::new(stocksync_erp::ErpClient::new(
                erp_config,
                &config.erp_base_url,
            )?);

            let rows = match item {
                Some(ref item_id) => {
                    stocksync_jobs::execute_one(
                        &pool,
                        &erp,
                        item_id,
                        Duration::from_millis(config.sync_inter_request_delay_ms),
                    )
                    .await?
                }
                None => stocksync_jobs::execute_all(&pool, &erp).await?,
            };

            println!("updated {} row(s)", rows.len());
        }
    }

    Ok(())
}
