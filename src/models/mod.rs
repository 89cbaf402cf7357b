//! Domain models for the event store.

mod event;
mod organization;
mod user;

pub use event::{Event, EventCard, OrganizationName};
pub use organization::Organization;
pub use user::User;

pub use mongodb::bson::oid::ObjectId;

use crate::error::AppError;

/// Parse a store document identifier (24 hex characters).
pub fn parse_document_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|e| {
        tracing::debug!("Invalid document id {:?}: {}", id, e);
        AppError::InvalidInput("Invalid user_id format.".to_string())
    })
}
