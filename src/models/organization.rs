//! Organization documents.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An organization as stored in the `organizations` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: Option<String>,
}
