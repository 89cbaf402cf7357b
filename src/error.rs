//! Application error types with HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Application-level errors for the recommender.
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    // Model errors
    #[error("Model is not trained. Insufficient data.")]
    ModelUntrained,

    #[error("Not enough data to provide recommendations.")]
    InsufficientData,

    #[error("Training failed: {0}")]
    TrainingFailure(String),

    #[error("Neighbor query failed: {0}")]
    NeighborQuery(String),

    // Store errors
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Store error during {operation} on {collection}")]
    Store {
        operation: &'static str,
        collection: &'static str,
    },

    // Model file errors
    #[error("Model file error: {0}")]
    Persistence(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Shorthand for a store failure tied to a collection.
    pub fn store(operation: &'static str, collection: &'static str) -> Self {
        AppError::Store {
            operation,
            collection,
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InsufficientData => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ModelUntrained
            | AppError::TrainingFailure(_)
            | AppError::NeighborQuery(_)
            | AppError::Mongo(_)
            | AppError::Store { .. }
            | AppError::Persistence(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API clients. Driver and file details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Mongo(_) | AppError::Store { .. } => "Database error.".to_string(),
            AppError::NeighborQuery(_) => "Error generating recommendations.".to_string(),
            AppError::TrainingFailure(_) | AppError::Persistence(_) => {
                "Model retraining failed.".to_string()
            }
            AppError::Config(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidInput("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InsufficientData.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("User not found.".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ModelUntrained.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::store("find", "users").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_are_not_leaked() {
        let err = AppError::store("aggregate", "events");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Database error.");
    }

    #[test]
    fn test_insufficient_data_message() {
        assert_eq!(
            AppError::InsufficientData.public_message(),
            "Not enough data to provide recommendations."
        );
    }
}
