mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::{api::AppState, middleware::AuthState, scheduler::CronManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = stocksync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = stocksync_db::PoolConfig::from_app_config(&config);
    let pool = stocksync_db::connect_pool(&config.database_url, pool_config).await?;
    stocksync_db::ping(&pool).await?;

    let erp_config = stocksync_erp::ErpConfig::from_app_config(&config);
    let erp = Arc::new(stocksync_erp::ErpClient::new(
        erp_config,
        &config.erp_base_url,
    )?);

    let cron = CronManager::new(
        pool.clone(),
        Arc::clone(&erp),
        config.schedule_utc_offset,
    )
    .await?;

    let auth = AuthState::from_config(&config);
    let app = api::build_app(
        AppState {
            pool,
            erp,
            cron,
            inter_request_delay: Duration::from_millis(config.sync_inter_request_delay_ms),
        },
        auth,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "stocksync server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
