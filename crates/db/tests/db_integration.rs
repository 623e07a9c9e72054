//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test -p sahemind-db --test db_integration -- --ignored --test-threads=1`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `sahemind_test`)
//!   `TEST_DB_PASSWORD` (default: `sahemind_test`)
//!   `TEST_DB_NAME` (default: `sahemind_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Utc;
use sahemind_db::{
    entities::{forum, post, user},
    repositories::{ForumRepository, LikeRepository, PostRepository, UserRepository},
    test_utils::{TestDatabase, TestDbConfig},
};
use sea_orm::Set;

fn user_model(id: &str, email: &str, role: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("x".to_string()),
        name: Set(None),
        role: Set(role.to_string()),
        emotion_keywords: Set(vec!["stress".to_string()]),
        is_active: Set(true),
        token: Set(None),
        availability_date: Set(None),
        availability_start: Set(None),
        availability_end: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let result = TestDatabase::with_config(TestDbConfig::default()).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_emotion_keywords_round_trip_as_array() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let users = UserRepository::new(conn);
    users
        .create(user_model("u1", "v@example.com", user::ROLE_VOLUNTEER))
        .await
        .unwrap();

    let found = users.get_by_id("u1").await.unwrap();
    assert_eq!(found.emotion_keywords, vec!["stress".to_string()]);
    assert_eq!(users.count_active_volunteers().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_toggle_twice_restores_count_and_forum_delete_cascades() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    db.cleanup().await.unwrap();
    let conn = Arc::new(db.conn);

    let users = UserRepository::new(conn.clone());
    let forums = ForumRepository::new(conn.clone());
    let posts = PostRepository::new(conn.clone());
    let likes = LikeRepository::new(conn.clone());

    users
        .create(user_model("m1", "m@example.com", user::ROLE_MODERATOR))
        .await
        .unwrap();

    let now = Utc::now();
    forums
        .create_with_moderators(
            forum::ActiveModel {
                id: Set("f1".to_string()),
                name: Set("Calm Corner".to_string()),
                description: Set(None),
                thematic: Set("Anxiety".to_string()),
                is_active: Set(true),
                created_at: Set(now.into()),
            },
            vec![],
        )
        .await
        .unwrap();

    posts
        .create(post::ActiveModel {
            id: Set("p1".to_string()),
            forum_id: Set("f1".to_string()),
            author_id: Set("m1".to_string()),
            title: Set("Hello".to_string()),
            content: Set("World".to_string()),
            is_anonymous: Set(true),
            is_reported: Set(false),
            report_reason: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        })
        .await
        .unwrap();

    assert!(likes.toggle_post_like("l1".into(), "p1", "m1").await.unwrap());
    assert_eq!(likes.count_post_likes("p1").await.unwrap(), 1);
    assert!(!likes.toggle_post_like("l2".into(), "p1", "m1").await.unwrap());
    assert_eq!(likes.count_post_likes("p1").await.unwrap(), 0);

    use sea_orm::EntityTrait;
    sahemind_db::entities::Forum::delete_by_id("f1")
        .exec(conn.as_ref())
        .await
        .unwrap();
    assert!(posts.find_by_id("p1").await.unwrap().is_none());
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
