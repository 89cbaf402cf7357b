//! Application context providing dependency injection root.

use crate::config::Config;
use crate::database::{Database, DatabaseInfo};
use crate::di::Context as ContextDerive;
use crate::error::AppError;
use crate::recommender::{ModelFile, ModelHandle};

/// Root application context for dependency injection.
///
/// Every field is cheap to clone and shared between request handlers.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Entity store handle.
    pub db: Database,
    /// Currently published model snapshot.
    pub model: ModelHandle,
    /// On-disk cache for the snapshot.
    pub model_file: ModelFile,
}

impl Context {
    /// Creates a new context with the given dependencies and no trained model.
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            model: ModelHandle::default(),
            model_file: ModelFile::new(config.model.path),
        }
    }

    /// Connect to the configured MongoDB and build the context.
    pub async fn from(config: Config) -> Result<Self, AppError> {
        tracing::info!(
            "Connecting to MongoDB at {} (database: {})",
            config.mongodb.uri,
            config.mongodb.database
        );
        let db = DatabaseInfo::MongoDb {
            uri: config.mongodb.uri.clone(),
            database_name: config.mongodb.database.clone(),
        }
        .connect()
        .await?;

        Ok(Self::new(db, config))
    }
}
