//! MongoDB driver.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, from_document, oid::ObjectId, Document};
use mongodb::Collection;

use crate::error::AppError;
use crate::models::{Event, EventCard, Organization, User};

use super::{AbstractEvents, AbstractOrganizations, AbstractUsers};

static EVENTS: &str = "events";
static USERS: &str = "users";
static ORGANIZATIONS: &str = "organizations";

/// MongoDB implementation
#[derive(Clone)]
pub struct MongoDb(pub mongodb::Client, pub String);

impl MongoDb {
    /// Get the configured database
    pub fn db(&self) -> mongodb::Database {
        self.0.database(&self.1)
    }

    /// Get a collection by its name
    pub fn col<T: Send + Sync>(&self, collection: &str) -> Collection<T> {
        self.db().collection(collection)
    }
}

/// Log the driver error and collapse it into a store error.
fn store_error(
    operation: &'static str,
    collection: &'static str,
) -> impl FnOnce(mongodb::error::Error) -> AppError {
    move |e| {
        tracing::error!(error = %e, "MongoDB {} on {} failed", operation, collection);
        AppError::store(operation, collection)
    }
}

#[async_trait]
impl AbstractEvents for MongoDb {
    async fn fetch_events(&self) -> Result<Vec<Event>, AppError> {
        self.col::<Event>(EVENTS)
            .find(doc! {})
            .projection(doc! {
                "_id": 1,
                "eventId": 1,
                "title": 1,
                "organization": 1,
                "type": 1,
                "subtype": 1,
                "location": 1,
                "date": 1,
                "time": 1,
            })
            .await
            .map_err(store_error("find", EVENTS))?
            .try_collect()
            .await
            .map_err(store_error("find", EVENTS))
    }

    async fn fetch_event_cards(
        &self,
        event_ids: &[String],
        limit: usize,
    ) -> Result<Vec<EventCard>, AppError> {
        if event_ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let pipeline = vec![
            doc! { "$match": { "eventId": { "$in": event_ids.to_vec() } } },
            doc! {
                "$lookup": {
                    "from": ORGANIZATIONS,
                    "localField": "organization",
                    "foreignField": "_id",
                    "as": "organization_details",
                }
            },
            doc! {
                "$unwind": {
                    "path": "$organization_details",
                    "preserveNullAndEmptyArrays": true,
                }
            },
            doc! {
                "$project": {
                    "eventId": 1,
                    "title": 1,
                    "image": 1,
                    "summary": 1,
                    "description": 1,
                    "type": 1,
                    "subtype": 1,
                    "location": 1,
                    "date": 1,
                    "time": 1,
                    "organization": {
                        "name": { "$ifNull": ["$organization_details.name", "N/A"] }
                    },
                }
            },
            doc! { "$limit": limit as i64 },
        ];

        let documents: Vec<Document> = self
            .col::<Document>(EVENTS)
            .aggregate(pipeline)
            .await
            .map_err(store_error("aggregate", EVENTS))?
            .try_collect()
            .await
            .map_err(store_error("aggregate", EVENTS))?;

        documents
            .into_iter()
            .map(|document| {
                from_document::<EventCard>(document).map_err(|e| {
                    tracing::error!(error = %e, "Malformed event card document");
                    AppError::store("decode", EVENTS)
                })
            })
            .collect()
    }
}

#[async_trait]
impl AbstractUsers for MongoDb {
    async fn fetch_users(&self) -> Result<Vec<User>, AppError> {
        self.col::<User>(USERS)
            .find(doc! {})
            .projection(doc! { "registeredEvents": 1 })
            .await
            .map_err(store_error("find", USERS))?
            .try_collect()
            .await
            .map_err(store_error("find", USERS))
    }

    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        self.col::<User>(USERS)
            .find_one(doc! { "_id": *id })
            .projection(doc! { "registeredEvents": 1 })
            .await
            .map_err(store_error("find_one", USERS))
    }
}

#[async_trait]
impl AbstractOrganizations for MongoDb {
    async fn fetch_organization(&self, id: &ObjectId) -> Result<Option<Organization>, AppError> {
        self.col::<Organization>(ORGANIZATIONS)
            .find_one(doc! { "_id": *id })
            .projection(doc! { "name": 1 })
            .await
            .map_err(store_error("find_one", ORGANIZATIONS))
    }
}
