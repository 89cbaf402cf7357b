//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/event-recommender/config.toml` (XDG) or platform config dir
//! 3. Project config: `.recommender.toml`
//! 4. Legacy environment variables: `MONGO_URI`, `DATABASE_NAME`
//! 5. Environment variables: `RECOMMENDER_*`
//!
//! # Example
//!
//! ```toml
//! [mongodb]
//! uri = "mongodb://localhost:27017/"
//! database = "test"
//!
//! [model]
//! path = "knn_model.json"
//! ```

use std::ops::Deref;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mongodb: MongoConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

/// Entity store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database holding the `events`, `users` and `organizations` collections.
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017/".to_string(),
            database: "test".to_string(),
        }
    }
}

/// Trained model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Where the trained snapshot is cached between restarts.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("knn_model.json"),
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Self::user_config_path(), ".recommender.toml")
            .extract()
            .map_err(ConfigError::from)
    }

    fn figment(user_config: PathBuf, project_config: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(user_config))
            .merge(Toml::file(project_config))
            .merge(
                Env::raw()
                    .only(&["MONGO_URI", "DATABASE_NAME"])
                    .map(|key| {
                        if key.as_str().eq_ignore_ascii_case("mongo_uri") {
                            "mongodb.uri".into()
                        } else {
                            "mongodb.database".into()
                        }
                    }),
            )
            .merge(Env::prefixed("RECOMMENDER_").split("_"))
    }

    /// User config path: ~/.config/event-recommender/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("event-recommender")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("event-recommender").join("config.toml"))
            .unwrap_or_default()
    }
}
