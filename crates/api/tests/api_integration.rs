//! API integration tests.
//!
//! These tests drive the full router, auth middleware included, against a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
};
use chrono::Utc;
use sahemind_api::{AppState, auth_middleware, router as api_router};
use sahemind_common::config::VolunteerConfig;
use sahemind_core::{
    AuthService, EmotionService, ForumService, JournalService, PostResponseService, PostService,
    UserService, VolunteerService,
};
use sahemind_db::{
    entities::{journal, post, user},
    repositories::{
        ForumRepository, JournalRepository, LikeRepository, PostRepository,
        PostResponseRepository, UserRepository,
    },
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state over the given mock database.
fn create_test_state(db: MockDatabase) -> AppState {
    let db = Arc::new(db.into_connection());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let journal_repo = JournalRepository::new(Arc::clone(&db));
    let forum_repo = ForumRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let response_repo = PostResponseRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    AppState {
        auth_service: AuthService::new(user_repo.clone()),
        user_service: UserService::new(user_repo.clone()),
        volunteer_service: VolunteerService::new(user_repo.clone(), &VolunteerConfig::default())
            .unwrap(),
        journal_service: JournalService::new(journal_repo, chrono_tz::UTC),
        forum_service: ForumService::new(forum_repo.clone(), user_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            forum_repo,
            user_repo.clone(),
            like_repo.clone(),
        ),
        response_service: PostResponseService::new(response_repo, post_repo, user_repo, like_repo),
        emotion_service: EmotionService::new(None),
    }
}

fn create_test_router(db: MockDatabase) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn create_test_user(id: &str, token: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        password_hash: "hash".to_string(),
        name: Some("Amal".to_string()),
        role: user::ROLE_PATIENT.to_string(),
        emotion_keywords: vec!["stress".to_string()],
        is_active: true,
        token: Some(token.to_string()),
        availability_date: None,
        availability_start: None,
        availability_end: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
    maplit::btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_token_returns_profile() {
    let user = create_test_user("u1", "tok");
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[user]]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/me")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], "u1");
    assert_eq!(body["data"]["emotionKeywords"][0], "stress");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_error() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(json_request("POST", "/api/auth/signup", "{invalid json}"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_signup_with_bad_email_is_validation_error() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            r#"{"email":"nope","password":"secret"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_emotion_analyze_empty_text() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(json_request("POST", "/api/emotion/analyze", r#"{"text":"  "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_emotion_analyze_without_classifier_falls_back() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/emotion/analyze",
            r#"{"text":"I cannot sleep"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["anxiety"], 1.0);
}

#[tokio::test]
async fn test_volunteer_page_zero_is_rejected() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/volunteers/paginated?page=0&pageSize=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_volunteer_list_hides_contact_details() {
    let mut volunteer = create_test_user("v1", "vtok");
    volunteer.role = user::ROLE_VOLUNTEER.to_string();
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[volunteer]]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/volunteers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["id"], "v1");
    assert!(body["data"][0].get("email").is_none());
}

#[tokio::test]
async fn test_anonymous_post_hides_author() {
    let post = post::Model {
        id: "p1".to_string(),
        forum_id: "f1".to_string(),
        author_id: "secret-author".to_string(),
        title: "Sleepless".to_string(),
        content: "Anyone else awake?".to_string(),
        is_anonymous: true,
        is_reported: false,
        report_reason: None,
        created_at: Utc::now().into(),
        updated_at: None,
    };
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[post]])
            .append_query_results([[count_row(2)]])
            .append_query_results([[count_row(0)]]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/forums/posts/p1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["authorName"], "Anonymous");
    assert_eq!(body["data"]["likeCount"], 2);
    assert!(body["data"].get("authorId").is_none());
}

#[tokio::test]
async fn test_other_users_journal_is_forbidden() {
    let caller = create_test_user("u1", "tok");
    let now = Utc::now();
    let journal = journal::Model {
        id: "j1".to_string(),
        user_id: "u2".to_string(),
        humor: "sad".to_string(),
        title: None,
        content: None,
        is_pinned: false,
        color: journal::DEFAULT_COLOR.to_string(),
        report: false,
        created_at: now.into(),
        updated_at: now.into(),
    };
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[caller]])
            .append_query_results([[journal]]),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/journals/j1")
                .header("Authorization", "Bearer tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_like_requires_auth() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/forums/posts/p1/like")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
