use tracing_subscriber::EnvFilter;
use vidfeed::{
    api::{create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vidfeed=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        recommendation_api_url = %config.recommendation_api_url,
        session_user = ?config.session_user_id,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config);
    state.controller.mount().await;

    let controller = state.controller.clone();
    let app = create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Feed server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.unmount();
    tracing::info!("Feed server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
