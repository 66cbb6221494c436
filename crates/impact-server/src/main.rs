mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use impact_shopping::{ShoppingClient, SuggestClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = impact_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = impact_db::PoolConfig::from_app_config(&config);
    let pool = impact_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = impact_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let shopping = match config.serpapi_key.as_deref() {
        Some(key) => Some(Arc::new(ShoppingClient::with_base_url(
            key,
            config.search_locale.clone(),
            config.http_timeout_secs,
            &config.http_user_agent,
            &config.serpapi_base_url,
        )?)),
        None => {
            tracing::warn!("SERPAPI_KEY not set; /api/compare will answer 500");
            None
        }
    };
    let suggest = Arc::new(SuggestClient::with_base_url(
        &config.search_locale.language,
        config.http_timeout_secs,
        &config.http_user_agent,
        &config.suggest_base_url,
    )?);

    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(
        AppState {
            pool,
            shopping,
            suggest,
        },
        rate_limit,
    );

    tracing::info!(addr = %config.bind_addr, env = %config.env, "impact-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
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
