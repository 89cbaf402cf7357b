//! HTTP server command handler.

use std::net::SocketAddr;

use color_eyre::Result;

use crate::api;
use crate::config::Config;
use crate::context::Context;
use crate::services::TrainingService;
use crate::FromRef;

use super::App;

impl App {
    /// Load or train the model, then serve the API.
    pub async fn run_serve(&self, host: &str, port: u16) -> Result<()> {
        tracing::info!("Starting event recommender HTTP server");

        let config = Config::load()?;
        tracing::info!("Model file: {}", config.model.path.display());

        let ctx = Context::from(config).await?;

        if !TrainingService::from_ref(&ctx).load_or_train().await {
            tracing::warn!(
                "No model available; /recommend will fail until POST /retrain succeeds"
            );
        }

        let app = api::router(ctx);

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid address {}:{}: {}", host, port, e))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to bind to {}: {}", addr, e))?;

        tracing::info!("Event recommender listening on http://{}", addr);

        axum::serve(listener, app).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            color_eyre::eyre::eyre!("HTTP server error: {}", e)
        })?;

        tracing::info!("HTTP server shutting down");
        Ok(())
    }
}
