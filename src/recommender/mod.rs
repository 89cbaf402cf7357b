//! Interaction matrix, neighbour index and the trained snapshot.
//!
//! Training turns a store snapshot into a [`Snapshot`]: the binary
//! users × events [`InteractionMatrix`], the user row order, the
//! `eventId` → column map and a cosine [`NeighborIndex`] over the rows.
//! These four travel together; indices mean nothing without the orders
//! that defined them.

mod matrix;
mod neighbors;
mod persistence;
mod snapshot;

pub use matrix::{build_interaction_matrix, EventIdMap, InteractionMatrix, TrainingSet};
pub use neighbors::{cosine_distance, NeighborIndex, Neighbors};
pub use persistence::ModelFile;
pub use snapshot::{ModelHandle, QueryVector, Snapshot, SCHEMA_VERSION};
