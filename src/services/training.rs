//! Training service: build, publish and cache the model snapshot.

use std::sync::Arc;

use crate::database::{AbstractEvents, AbstractUsers, Database};
use crate::di::FromContext;
use crate::error::AppError;
use crate::recommender::{build_interaction_matrix, ModelFile, ModelHandle, Snapshot};

/// Summary of a successful training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingReport {
    pub users: usize,
    pub events: usize,
}

/// Service that trains the neighbour model from the store.
#[derive(FromContext, Clone)]
pub struct TrainingService {
    db: Database,
    model: ModelHandle,
    model_file: ModelFile,
}

impl TrainingService {
    /// Train a new snapshot from the current store contents.
    ///
    /// Runs one at a time: the published snapshot and the model file always
    /// come from the same run. The snapshot is published before it is
    /// written to disk, so a failed write still leaves the new model serving.
    pub async fn train(&self) -> Result<TrainingReport, AppError> {
        let _training = self.model.training().await;
        tracing::info!("Starting model training...");

        let events = self.db.fetch_events().await?;
        let users = self.db.fetch_users().await?;
        tracing::debug!("Fetched {} events and {} users", events.len(), users.len());

        let set = build_interaction_matrix(&events, &users)?;
        let snapshot = Arc::new(Snapshot::train(set));
        let report = TrainingReport {
            users: snapshot.n_samples(),
            events: snapshot.n_columns(),
        };

        self.model.publish(snapshot.clone()).await;

        let file = self.model_file.clone();
        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| AppError::Persistence(format!("save task failed: {}", e)))??;

        tracing::info!(
            "Model trained and saved successfully ({} users x {} events)",
            report.users,
            report.events
        );
        Ok(report)
    }

    /// Publish the cached snapshot, or train a fresh one when the cache is
    /// absent or unusable.
    ///
    /// Training failures are logged and leave the handle empty; returns
    /// whether a model is being served afterwards.
    pub async fn load_or_train(&self) -> bool {
        let file = self.model_file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .unwrap_or_else(|e| Err(AppError::Persistence(format!("load task failed: {}", e))));

        match loaded {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    "Model loaded successfully from disk ({} users x {} events, trained {})",
                    snapshot.n_samples(),
                    snapshot.n_columns(),
                    snapshot.trained_at
                );
                self.model.publish(Arc::new(snapshot)).await;
                return true;
            }
            Ok(None) => tracing::info!("Model file not found. Training a new model..."),
            Err(e) => tracing::warn!("Error loading model: {}. Attempting to retrain.", e),
        }

        match self.train().await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Model training failed during initial load: {}", e);
                self.model.is_trained().await
            }
        }
    }
}
