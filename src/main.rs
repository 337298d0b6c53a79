use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use user_directory::{
    app::{users::store::UserStore, ENDPOINTS},
    build_router,
    infrastructure::logger::Logger,
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    Logger::init();

    let config = AppConfig::from_env().context("load configuration")?;
    let addr = config.bind_addr()?;

    let store = if config.seed_sample_data {
        UserStore::seeded()
    } else {
        UserStore::new()
    };

    info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = config.environment.as_str(),
        "starting"
    );

    let app = build_router(AppState::new(config, store));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;

    info!("listening on http://{}", addr);
    for endpoint in ENDPOINTS {
        info!("   {}", endpoint);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown signal received");
}
