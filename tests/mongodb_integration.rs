//! Integration tests for the MongoDB driver.
//!
//! These tests require a running MongoDB instance.
//! Run with: `cargo test --features integration --test mongodb_integration`

#![cfg(feature = "integration")]

use event_recommender::database::{
    AbstractEvents, AbstractOrganizations, AbstractUsers, Database, MongoDb,
};
use event_recommender::models::{Event, ObjectId, Organization, User};
use event_recommender::services::{RecommendationService, TrainingService};
use event_recommender::{config::Config, context::Context, FromRef};
use serial_test::serial;

const TEST_URI: &str = "mongodb://localhost:27017";
const TEST_DATABASE: &str = "event_recommender_test";

async fn create_client() -> MongoDb {
    let client = mongodb::Client::with_uri_str(TEST_URI)
        .await
        .expect("Failed to connect to test database");
    let db = MongoDb(client, TEST_DATABASE.to_string());
    db.db().drop().await.expect("Failed to reset test database");
    db
}

struct Seed {
    org: Organization,
    users: Vec<User>,
}

async fn seed(db: &MongoDb) -> Seed {
    let org = Organization {
        id: ObjectId::new(),
        name: Some("Robotics Club".to_string()),
    };
    db.col::<Organization>("organizations")
        .insert_one(&org)
        .await
        .expect("Failed to insert organization");

    let events: Vec<Event> = ["1", "2", "3"]
        .iter()
        .map(|id| {
            let mut event = Event::new(ObjectId::new(), *id);
            event.title = Some(format!("Workshop {}", id));
            event.organization = Some(org.id);
            event
        })
        .collect();
    db.col::<Event>("events")
        .insert_many(&events)
        .await
        .expect("Failed to insert events");

    let users = vec![
        User::new(ObjectId::new(), vec![events[0].id]),
        User::new(ObjectId::new(), vec![events[0].id, events[1].id]),
    ];
    db.col::<User>("users")
        .insert_many(&users)
        .await
        .expect("Failed to insert users");

    Seed { org, users }
}

// All tests share one database, so they run serially
#[serial]
mod database_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_events_and_users() {
        let db = create_client().await;
        let seed = seed(&db).await;

        let events = db.fetch_events().await.expect("fetch_events failed");
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_id, "1");

        let users = db.fetch_users().await.expect("fetch_users failed");
        let ids: Vec<ObjectId> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![seed.users[0].id, seed.users[1].id]);

        let user = db.fetch_user(&seed.users[1].id).await.unwrap();
        assert_eq!(user.unwrap().registered_events.len(), 2);
        assert!(db.fetch_user(&ObjectId::new()).await.unwrap().is_none());

        let org = db.fetch_organization(&seed.org.id).await.unwrap();
        assert_eq!(org.unwrap().name.as_deref(), Some("Robotics Club"));
    }

    #[tokio::test]
    async fn test_event_cards_join_organization() {
        let db = create_client().await;
        seed(&db).await;

        let ids = vec!["2".to_string(), "3".to_string()];
        let cards = db.fetch_event_cards(&ids, 1).await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].organization.name, "Robotics Club");
        assert_eq!(cards[0].image, "");
    }

    #[tokio::test]
    async fn test_train_and_recommend() {
        let db = create_client().await;
        let seed = seed(&db).await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.model.path = dir.path().join("knn_model.json");
        let ctx = Context::new(Database::MongoDb(db), config);

        let report = TrainingService::from_ref(&ctx).train().await.unwrap();
        assert_eq!((report.users, report.events), (2, 3));

        let result = RecommendationService::from_ref(&ctx)
            .recommend(&seed.users[0].id.to_hex(), 5)
            .await
            .unwrap();
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].event_id, "2");
        assert_eq!(result.recommendations[0].title, "Workshop 2");
    }
}
