//! Recommendation service: neighbour lookup and event aggregation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::database::{AbstractEvents, AbstractUsers, Database};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{parse_document_id, EventCard, ObjectId, User};
use crate::recommender::{EventIdMap, ModelHandle};

/// Number of recommendations when the request does not ask for a count.
pub const DEFAULT_RECOMMENDATIONS: i64 = 5;

/// Response body for a recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub recommendations: Vec<EventCard>,
}

impl Recommendations {
    fn found(recommendations: Vec<EventCard>) -> Self {
        Self {
            message: None,
            recommendations,
        }
    }

    fn empty(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            recommendations: Vec::new(),
        }
    }
}

/// Service that answers "what should this user attend next".
#[derive(FromContext, Clone)]
pub struct RecommendationService {
    db: Database,
    model: ModelHandle,
}

impl RecommendationService {
    /// Recommend events registered by users whose registrations resemble
    /// `user_id`'s, excluding events the user already has.
    pub async fn recommend(
        &self,
        user_id: &str,
        num_recommendations: i64,
    ) -> Result<Recommendations, AppError> {
        let user_oid = parse_document_id(user_id)?;
        let target = user_oid.to_hex();

        let user = self
            .db
            .fetch_user(&user_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        if user.registered_events.is_empty() {
            tracing::info!("User {} has no registered events.", target);
            return Ok(Recommendations::empty("User has no registered events."));
        }

        let events = self.db.fetch_events().await?;
        let event_ids = EventIdMap::from_events(&events);

        // One snapshot for the whole request, even if a retrain publishes meanwhile.
        let snapshot = self.model.current().await.ok_or(AppError::ModelUntrained)?;
        let query = snapshot.query_vector(&user.registered_events, &event_ids);
        tracing::info!("User vector for {}: {:?}", target, query.vector);

        let n_samples = i64::try_from(snapshot.n_samples()).unwrap_or(i64::MAX);
        let desired_k = num_recommendations.saturating_add(1).min(n_samples);
        if desired_k < 2 {
            tracing::warn!("Not enough data to provide recommendations.");
            return Err(AppError::InsufficientData);
        }

        let neighbors = snapshot.model.query(&query.vector, desired_k as usize)?;
        tracing::info!("KNN distances: {:?}", neighbors.distances);
        tracing::info!("KNN indices: {:?}", neighbors.indices);

        let similar_users = self
            .fetch_similar_users(
                neighbors
                    .indices
                    .iter()
                    .filter_map(|&i| snapshot.user_ids.get(i))
                    .filter(|id| **id != target),
            )
            .await;
        tracing::info!(
            "Similar users: {:?}",
            similar_users.iter().map(|u| u.id.to_hex()).collect::<Vec<_>>()
        );

        let recommended: BTreeSet<&str> = similar_users
            .iter()
            .flat_map(|u| u.registered_events.iter())
            .filter_map(|reference| event_ids.resolve(reference))
            .filter(|event_id| {
                !query.excluded.contains(*event_id) && snapshot.event_columns.contains_key(*event_id)
            })
            .collect();

        if recommended.is_empty() {
            tracing::info!("No similar events found for recommendations.");
            return Ok(Recommendations::empty("No similar events found."));
        }

        let ids: Vec<String> = recommended.iter().map(|id| id.to_string()).collect();
        let limit = usize::try_from(num_recommendations).unwrap_or(0);
        let cards = self.db.fetch_event_cards(&ids, limit).await?;

        if cards.is_empty() {
            tracing::info!("No recommended events found in the database.");
            return Ok(Recommendations::empty("No recommended events found."));
        }

        tracing::info!(
            "Returning {} recommendations for user {}: {:?}",
            cards.len(),
            target,
            cards.iter().map(|c| c.event_id.as_str()).collect::<Vec<_>>()
        );
        Ok(Recommendations::found(cards))
    }

    /// Re-fetch neighbouring users. Ids that fail to parse or fetch are skipped.
    async fn fetch_similar_users<'a>(&self, ids: impl Iterator<Item = &'a String>) -> Vec<User> {
        let mut users = Vec::new();
        for id in ids {
            let oid = match ObjectId::parse_str(id) {
                Ok(oid) => oid,
                Err(e) => {
                    tracing::warn!("Skipping malformed user id {} in model: {}", id, e);
                    continue;
                }
            };
            match self.db.fetch_user(&oid).await {
                Ok(Some(user)) => {
                    tracing::debug!("Found similar user: {}", id);
                    users.push(user);
                }
                Ok(None) => tracing::debug!("Similar user {} no longer exists", id),
                Err(e) => tracing::error!("Error fetching similar user {}: {}", id, e),
            }
        }
        users
    }
}
