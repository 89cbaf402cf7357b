//! Entity store access.
//!
//! Each collection is read through its own trait; [`AbstractDatabase`]
//! bundles them so services can hold a single [`Database`] handle that
//! dispatches to either the MongoDB driver or the in-memory reference
//! implementation.

mod mongo;
mod reference;

pub use self::mongo::MongoDb;
pub use self::reference::ReferenceDb;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Event, EventCard, ObjectId, Organization, User};

/// Read access to the `events` collection.
#[async_trait]
pub trait AbstractEvents: Sync + Send {
    /// Fetch every event, in store order
    async fn fetch_events(&self) -> Result<Vec<Event>, AppError>;

    /// Fetch display cards for the given external event ids, joined with
    /// their organization's name, in store order and capped at `limit`
    async fn fetch_event_cards(
        &self,
        event_ids: &[String],
        limit: usize,
    ) -> Result<Vec<EventCard>, AppError>;
}

/// Read access to the `users` collection.
#[async_trait]
pub trait AbstractUsers: Sync + Send {
    /// Fetch every user with their registrations, in store order
    async fn fetch_users(&self) -> Result<Vec<User>, AppError>;

    /// Fetch a single user by internal id
    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, AppError>;
}

/// Read access to the `organizations` collection.
#[async_trait]
pub trait AbstractOrganizations: Sync + Send {
    /// Fetch a single organization by internal id
    async fn fetch_organization(&self, id: &ObjectId) -> Result<Option<Organization>, AppError>;
}

pub trait AbstractDatabase: AbstractEvents + AbstractUsers + AbstractOrganizations {}

impl AbstractDatabase for ReferenceDb {}
impl AbstractDatabase for MongoDb {}

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// Connect to MongoDB
    MongoDb { uri: String, database_name: String },
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    pub async fn connect(self) -> Result<Database, AppError> {
        match self {
            DatabaseInfo::MongoDb { uri, database_name } => {
                let client = ::mongodb::Client::with_uri_str(&uri).await?;
                Ok(Database::MongoDb(MongoDb(client, database_name)))
            }
        }
    }
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// In-memory database
    Reference(ReferenceDb),
    /// MongoDB database
    MongoDb(MongoDb),
    /// Hand-written driver for unit tests
    #[cfg(test)]
    Stub(std::sync::Arc<dyn AbstractDatabase>),
}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            Database::MongoDb(mongo) => mongo,
            #[cfg(test)]
            Database::Stub(stub) => stub.as_ref(),
        }
    }
}

impl From<ReferenceDb> for Database {
    fn from(db: ReferenceDb) -> Self {
        Database::Reference(db)
    }
}
