//! Train command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::context::Context;
use crate::services::TrainingService;
use crate::FromRef;

use super::App;

impl App {
    /// Train the model once and write it to the configured model file.
    pub async fn run_train(&self) -> Result<()> {
        let config = Config::load()?;
        let ctx = Context::from(config).await?;

        let report = TrainingService::from_ref(&ctx)
            .train()
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Training failed: {}", e))?;

        tracing::info!(
            "Trained on {} users x {} events, written to {}",
            report.users,
            report.events,
            ctx.model_file.path().display()
        );
        Ok(())
    }
}
