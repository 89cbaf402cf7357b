//! User documents.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user as stored in the `users` collection.
///
/// `registered_events` holds internal event document ids, not external `eventId`s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "registeredEvents", default)]
    pub registered_events: Vec<ObjectId>,
}

impl User {
    pub fn new(id: ObjectId, registered_events: Vec<ObjectId>) -> Self {
        Self {
            id,
            registered_events,
        }
    }
}
