//! In-memory reference driver.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::lock::Mutex;

use crate::error::AppError;
use crate::models::{Event, EventCard, ObjectId, Organization, User};

use super::{AbstractEvents, AbstractOrganizations, AbstractUsers};

/// Reference implementation
///
/// Collections are kept in insertion order, which stands in for the
/// store's natural return order.
#[derive(Clone, Default)]
pub struct ReferenceDb {
    pub events: Arc<Mutex<Vec<Event>>>,
    pub users: Arc<Mutex<Vec<User>>>,
    pub organizations: Arc<Mutex<Vec<Organization>>>,
}

impl ReferenceDb {
    pub async fn insert_event(&self, event: Event) {
        self.events.lock().await.push(event);
    }

    pub async fn insert_user(&self, user: User) {
        self.users.lock().await.push(user);
    }

    pub async fn insert_organization(&self, organization: Organization) {
        self.organizations.lock().await.push(organization);
    }

    /// Append an event reference to a user's registrations.
    pub async fn register(&self, user_id: &ObjectId, event: &ObjectId) -> Result<(), AppError> {
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;
        user.registered_events.push(*event);
        Ok(())
    }

    /// Remove a user entirely.
    pub async fn remove_user(&self, user_id: &ObjectId) {
        self.users.lock().await.retain(|u| &u.id != user_id);
    }
}

#[async_trait]
impl AbstractEvents for ReferenceDb {
    async fn fetch_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.events.lock().await.clone())
    }

    async fn fetch_event_cards(
        &self,
        event_ids: &[String],
        limit: usize,
    ) -> Result<Vec<EventCard>, AppError> {
        let wanted: HashSet<&str> = event_ids.iter().map(String::as_str).collect();
        let events = self.events.lock().await;
        let organizations = self.organizations.lock().await;

        Ok(events
            .iter()
            .filter(|event| wanted.contains(event.event_id.as_str()))
            .take(limit)
            .map(|event| {
                let name = event.organization.and_then(|org_id| {
                    organizations
                        .iter()
                        .find(|org| org.id == org_id)
                        .and_then(|org| org.name.as_deref())
                });
                EventCard::from_event(event, name)
            })
            .collect())
    }
}

#[async_trait]
impl AbstractUsers for ReferenceDb {
    async fn fetch_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().await.clone())
    }

    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().await.iter().find(|u| &u.id == id).cloned())
    }
}

#[async_trait]
impl AbstractOrganizations for ReferenceDb {
    async fn fetch_organization(&self, id: &ObjectId) -> Result<Option<Organization>, AppError> {
        Ok(self
            .organizations
            .lock()
            .await
            .iter()
            .find(|org| &org.id == id)
            .cloned())
    }
}
