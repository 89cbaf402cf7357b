//! The trained snapshot and the handle that publishes it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use super::{EventIdMap, InteractionMatrix, NeighborIndex, TrainingSet};
use crate::error::AppError;
use crate::models::ObjectId;

/// Bumped whenever the persisted layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything one training run produced. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    pub trained_at: DateTime<Utc>,
    pub model: NeighborIndex,
    pub event_columns: HashMap<String, usize>,
    pub user_ids: Vec<String>,
    pub matrix: InteractionMatrix,
}

/// A target user's registrations projected onto the trained columns.
#[derive(Debug, Clone)]
pub struct QueryVector {
    pub vector: Vec<f64>,
    /// External ids the user is already registered for.
    pub excluded: HashSet<String>,
}

impl Snapshot {
    /// Fit the neighbour index over a freshly built training set.
    pub fn train(set: TrainingSet) -> Self {
        let model = NeighborIndex::fit(&set.matrix);
        Self {
            schema_version: SCHEMA_VERSION,
            trained_at: Utc::now(),
            model,
            event_columns: set.event_columns,
            user_ids: set.user_ids,
            matrix: set.matrix,
        }
    }

    /// Number of trained user rows.
    pub fn n_samples(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of event columns.
    pub fn n_columns(&self) -> usize {
        self.matrix.cols()
    }

    /// Check that the four parts describe the same shape.
    pub fn validate(&self) -> Result<(), AppError> {
        let fail = |reason: &str| Err(AppError::Persistence(reason.to_string()));

        if self.schema_version != SCHEMA_VERSION {
            return fail("schema version mismatch");
        }
        if !self.matrix.is_consistent() {
            return fail("matrix cells do not match its shape");
        }
        if self.user_ids.len() != self.matrix.rows() {
            return fail("user id order does not match matrix rows");
        }
        if self.event_columns.values().any(|&c| c >= self.matrix.cols()) {
            return fail("event column out of matrix bounds");
        }
        if !self.model.is_consistent()
            || self.model.n_samples() != self.matrix.rows()
            || self.model.n_features() != self.matrix.cols()
        {
            return fail("neighbor index does not match matrix");
        }
        Ok(())
    }

    /// Build the query vector for a user's registrations.
    ///
    /// `ids` must come from a fresh event listing; registrations are
    /// internal ids and are resolved to external ids before column lookup.
    pub fn query_vector(&self, registered: &[ObjectId], ids: &EventIdMap) -> QueryVector {
        let mut vector = vec![0.0; self.n_columns()];
        let mut excluded = HashSet::new();

        for reference in registered {
            let Some(event_id) = ids.resolve(reference) else {
                continue;
            };
            if let Some(&col) = self.event_columns.get(event_id) {
                vector[col] = 1.0;
                excluded.insert(event_id.to_string());
            }
        }

        QueryVector { vector, excluded }
    }
}

/// Holder for the current snapshot.
///
/// Readers clone the `Arc` and keep a consistent view for the whole
/// request; retraining swaps in a new snapshot under the write lock.
#[derive(Clone, Default)]
pub struct ModelHandle {
    current: Arc<RwLock<Option<Arc<Snapshot>>>>,
    training: Arc<Mutex<()>>,
}

impl ModelHandle {
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    pub async fn publish(&self, snapshot: Arc<Snapshot>) {
        *self.current.write().await = Some(snapshot);
    }

    pub async fn is_trained(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Exclusive right to train. Held from the store fetch until the
    /// snapshot is both published and saved, so runs never interleave.
    pub async fn training(&self) -> MutexGuard<'_, ()> {
        self.training.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, User};
    use crate::recommender::build_interaction_matrix;

    fn trained() -> (Snapshot, Vec<Event>) {
        let events: Vec<Event> = ["1", "2", "3"]
            .iter()
            .map(|id| Event::new(ObjectId::new(), *id))
            .collect();
        let users = vec![
            User::new(ObjectId::new(), vec![events[0].id]),
            User::new(ObjectId::new(), vec![events[0].id, events[1].id]),
        ];
        let set = build_interaction_matrix(&events, &users).unwrap();
        (Snapshot::train(set), events)
    }

    #[test]
    fn test_query_vector_uses_fresh_event_map() {
        let (snapshot, events) = trained();
        let ids = EventIdMap::from_events(&events);

        let query = snapshot.query_vector(&[events[1].id, ObjectId::new()], &ids);
        assert_eq!(query.vector, vec![0.0, 1.0, 0.0]);
        assert_eq!(query.excluded.len(), 1);
        assert!(query.excluded.contains("2"));
    }

    #[test]
    fn test_query_vector_ignores_events_added_after_training() {
        let (snapshot, mut events) = trained();
        let late = Event::new(ObjectId::new(), "4");
        events.push(late.clone());
        let ids = EventIdMap::from_events(&events);

        let query = snapshot.query_vector(&[late.id], &ids);
        assert_eq!(query.vector, vec![0.0, 0.0, 0.0]);
        assert!(query.excluded.is_empty());
    }

    #[test]
    fn test_validate_detects_mismatch() {
        let (mut snapshot, _) = trained();
        assert!(snapshot.validate().is_ok());

        snapshot.user_ids.pop();
        assert!(matches!(snapshot.validate(), Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_handle_publish_replaces_snapshot() {
        let handle = ModelHandle::default();
        assert!(!handle.is_trained().await);

        let (snapshot, _) = trained();
        let first = Arc::new(snapshot);
        handle.publish(first.clone()).await;
        let held = handle.current().await.unwrap();

        let (other, _) = trained();
        handle.publish(Arc::new(other)).await;

        // Earlier readers keep their view.
        assert!(Arc::ptr_eq(&held, &first));
        assert!(!Arc::ptr_eq(&handle.current().await.unwrap(), &first));
    }

    #[tokio::test]
    async fn test_training_lock_is_shared_between_clones() {
        let handle = ModelHandle::default();
        let other = handle.clone();

        let guard = handle.training().await;
        assert!(other.training.try_lock().is_err());
        drop(guard);
        assert!(other.training.try_lock().is_ok());
    }
}
