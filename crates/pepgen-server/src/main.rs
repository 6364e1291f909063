mod api;
mod middleware;
mod scheduler;
mod stores;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(pepgen_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = pepgen_db::PoolConfig::from_app_config(&config);
    let pool = pepgen_db::connect_pool(&config.database_url, pool_config).await?;
    pepgen_db::run_migrations(&pool).await?;

    let genai = pepgen_genai::GenAiClient::new(&pepgen_genai::GenAiConfig::from_app_config(
        &config,
    ))?;
    let storage = pepgen_pipeline::StorageClient::new(
        &pepgen_pipeline::StorageConfig::from_app_config(&config),
    )?;

    let state = AppState {
        pool: pool.clone(),
        genai: genai.clone(),
        storage: storage.clone(),
        pipeline_config: pepgen_pipeline::PipelineConfig::from_app_config(&config),
        token_salt: config.api_token_hash_salt.clone(),
        cron_secret: config.cron_secret.clone(),
    };

    let _scheduler =
        scheduler::build_scheduler(pool, genai, storage, Arc::clone(&config)).await?;

    let app = build_app(state, default_rate_limit_state());

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
