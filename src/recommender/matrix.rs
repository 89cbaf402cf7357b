//! Interaction matrix construction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Event, ObjectId, User};

/// Dense binary matrix, row-major. Rows are users, columns are events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl InteractionMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn set(&mut self, row: usize, col: usize) {
        self.cells[row * self.cols + col] = 1;
    }

    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Number of cells set to one.
    pub fn nnz(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Cell storage matches the declared shape and holds only 0/1.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.rows * self.cols && self.cells.iter().all(|&c| c <= 1)
    }
}

/// Internal event document id → external `eventId`.
///
/// Registrations reference events by internal id, so every code path that
/// resolves a registration builds this map from a fresh event listing.
#[derive(Debug, Clone, Default)]
pub struct EventIdMap(HashMap<ObjectId, String>);

impl EventIdMap {
    pub fn from_events(events: &[Event]) -> Self {
        Self(
            events
                .iter()
                .map(|e| (e.id, e.event_id.clone()))
                .collect(),
        )
    }

    /// External id for an internal event reference.
    pub fn resolve(&self, internal: &ObjectId) -> Option<&str> {
        self.0.get(internal).map(String::as_str)
    }
}

/// Output of [`build_interaction_matrix`].
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub matrix: InteractionMatrix,
    /// Row order: user internal ids as hex, in store order.
    pub user_ids: Vec<String>,
    /// External `eventId` → column index, in store order.
    pub event_columns: HashMap<String, usize>,
}

/// Build the users × events registration matrix.
///
/// Rows follow the order of `users`, columns the order of `events`.
/// Registrations that do not resolve to a known event are ignored.
pub fn build_interaction_matrix(events: &[Event], users: &[User]) -> Result<TrainingSet, AppError> {
    if events.is_empty() {
        return Err(AppError::TrainingFailure(
            "No events found in the database. Cannot train the model.".to_string(),
        ));
    }
    if users.is_empty() {
        return Err(AppError::TrainingFailure(
            "No users found in the database. Cannot train the model.".to_string(),
        ));
    }

    let ids = EventIdMap::from_events(events);
    let event_columns: HashMap<String, usize> = events
        .iter()
        .enumerate()
        .map(|(col, e)| (e.event_id.clone(), col))
        .collect();
    let user_ids: Vec<String> = users.iter().map(|u| u.id.to_hex()).collect();

    let mut matrix = InteractionMatrix::zeros(users.len(), events.len());
    for (row, user) in users.iter().enumerate() {
        for reference in &user.registered_events {
            let column = ids
                .resolve(reference)
                .and_then(|event_id| event_columns.get(event_id));
            match column {
                Some(&col) => matrix.set(row, col),
                None => tracing::debug!(
                    "Ignoring unresolvable registration {} for user {}",
                    reference,
                    user.id
                ),
            }
        }
    }

    if matrix.rows() == 0 || matrix.cols() == 0 {
        return Err(AppError::TrainingFailure(
            "Interaction matrix is empty. Cannot train the model.".to_string(),
        ));
    }

    tracing::info!(
        "Built interaction matrix: {} users x {} events, {} registrations",
        matrix.rows(),
        matrix.cols(),
        matrix.nnz()
    );

    Ok(TrainingSet {
        matrix,
        user_ids,
        event_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(external: &[&str]) -> Vec<Event> {
        external
            .iter()
            .map(|id| Event::new(ObjectId::new(), *id))
            .collect()
    }

    #[test]
    fn test_build_marks_registrations() {
        let events = events(&["1", "2", "3"]);
        let alice = User::new(ObjectId::new(), vec![events[0].id]);
        let bob = User::new(ObjectId::new(), vec![events[0].id, events[1].id]);

        let set = build_interaction_matrix(&events, &[alice.clone(), bob.clone()]).unwrap();

        assert_eq!(set.matrix.rows(), 2);
        assert_eq!(set.matrix.cols(), 3);
        assert_eq!(set.matrix.row(0), &[1, 0, 0]);
        assert_eq!(set.matrix.row(1), &[1, 1, 0]);
        assert_eq!(set.user_ids, vec![alice.id.to_hex(), bob.id.to_hex()]);
        assert_eq!(set.event_columns["1"], 0);
        assert_eq!(set.event_columns["3"], 2);
    }

    #[test]
    fn test_unresolvable_references_are_ignored() {
        let events = events(&["1"]);
        let user = User::new(ObjectId::new(), vec![ObjectId::new(), events[0].id]);

        let set = build_interaction_matrix(&events, &[user]).unwrap();
        assert_eq!(set.matrix.row(0), &[1]);
        assert_eq!(set.matrix.nnz(), 1);
    }

    #[test]
    fn test_user_without_registrations_gets_zero_row() {
        let events = events(&["1", "2"]);
        let user = User::new(ObjectId::new(), vec![]);

        let set = build_interaction_matrix(&events, &[user]).unwrap();
        assert_eq!(set.matrix.row(0), &[0, 0]);
    }

    #[test]
    fn test_empty_inputs_refuse_to_build() {
        let user = User::new(ObjectId::new(), vec![]);
        let err = build_interaction_matrix(&[], &[user]).unwrap_err();
        assert!(matches!(err, AppError::TrainingFailure(msg) if msg.contains("No events")));

        let err = build_interaction_matrix(&events(&["1"]), &[]).unwrap_err();
        assert!(matches!(err, AppError::TrainingFailure(msg) if msg.contains("No users")));
    }

    #[test]
    fn test_event_id_map_resolves_internal_ids() {
        let events = events(&["alpha", "beta"]);
        let map = EventIdMap::from_events(&events);

        assert_eq!(map.resolve(&events[0].id), Some("alpha"));
        assert_eq!(map.resolve(&events[1].id), Some("beta"));
        assert_eq!(map.resolve(&ObjectId::new()), None);
    }
}
