//! Event documents and the display record returned to clients.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An event as stored in the `events` collection.
///
/// `id` is the store's internal document id; `event_id` is the stable
/// external id used as the interaction matrix column key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub title: Option<String>,
    /// Reference to the owning organization's internal id.
    pub organization: Option<ObjectId>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub image: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl Event {
    /// Minimal event carrying only the two identifiers.
    pub fn new(id: ObjectId, event_id: impl Into<String>) -> Self {
        Self {
            id,
            event_id: event_id.into(),
            title: None,
            organization: None,
            kind: None,
            subtype: None,
            location: None,
            date: None,
            time: None,
            image: None,
            summary: None,
            description: None,
        }
    }
}

/// Organization display block embedded in an [`EventCard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationName {
    pub name: String,
}

impl Default for OrganizationName {
    fn default() -> Self {
        Self {
            name: "N/A".to_string(),
        }
    }
}

/// Display record for a recommended event. Missing fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCard {
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub title: String,
    pub organization: OrganizationName,
    pub image: String,
    pub summary: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: String,
    pub location: String,
    pub date: String,
    pub time: String,
}

impl EventCard {
    /// Shape an event and its (optional) organization name into a card.
    pub fn from_event(event: &Event, organization: Option<&str>) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        Self {
            event_id: event.event_id.clone(),
            title: text(&event.title),
            organization: organization
                .map(|name| OrganizationName {
                    name: name.to_string(),
                })
                .unwrap_or_default(),
            image: text(&event.image),
            summary: text(&event.summary),
            description: text(&event.description),
            kind: text(&event.kind),
            subtype: text(&event.subtype),
            location: text(&event.location),
            date: text(&event.date),
            time: text(&event.time),
        }
    }
}
