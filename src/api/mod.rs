//! HTTP API: `POST /recommend` and `POST /retrain`.

mod request;

pub use request::RecommendRequest;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::context::Context;
use crate::error::AppError;
use crate::services::{RecommendationService, Recommendations, TrainingService};
use crate::FromRef;

/// Build the application router over a context.
pub fn router(ctx: Context) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/retrain", post(retrain))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Handler for `POST /recommend`.
async fn recommend(
    State(ctx): State<Context>,
    body: Bytes,
) -> Result<Json<Recommendations>, AppError> {
    let request = RecommendRequest::parse(&body)?;
    let service = RecommendationService::from_ref(&ctx);
    let result = service
        .recommend(&request.user_id, request.num_recommendations)
        .await?;
    Ok(Json(result))
}

/// Handler for `POST /retrain`.
async fn retrain(State(ctx): State<Context>) -> Response {
    tracing::info!("Retraining model upon request...");

    match TrainingService::from_ref(&ctx).train().await {
        Ok(report) => {
            tracing::info!(
                "Model retrained successfully ({} users, {} events)",
                report.users,
                report.events
            );
            Json(json!({ "message": "Model retrained successfully." })).into_response()
        }
        Err(e) => {
            tracing::error!("Model retraining failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Model retraining failed." })),
            )
                .into_response()
        }
    }
}
