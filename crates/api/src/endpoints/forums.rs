//! Forum, post and response endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use sahemind_common::AppResult;
use sahemind_core::{
    CreateForumInput, CreatePostInput, CreateResponseInput, DEFAULT_POST_LIMIT,
    DEFAULT_RESPONSE_LIMIT, ForumSummary, LikeToggle, PostView, ReportInput, ResponseView,
    UpdatePostInput, UpdateResponseInput,
};
use sahemind_db::entities::forum;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse},
};

const MAX_LIMIT: u64 = 100;

// ==================== Request/Response Types ====================

/// Forum response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thematic: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<u64>,
}

impl From<forum::Model> for ForumResponse {
    fn from(f: forum::Model) -> Self {
        Self {
            id: f.id,
            name: f.name,
            description: f.description,
            thematic: f.thematic,
            created_at: f.created_at.to_rfc3339(),
            moderator_count: None,
            post_count: None,
        }
    }
}

impl From<ForumSummary> for ForumResponse {
    fn from(s: ForumSummary) -> Self {
        Self {
            moderator_count: Some(s.moderator_count),
            post_count: Some(s.post_count),
            ..Self::from(s.forum)
        }
    }
}

/// Post response. The author id is withheld on anonymous posts.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub forum_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub is_reported: bool,
    pub like_count: u64,
    pub response_count: u64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<PostView> for PostResponse {
    fn from(v: PostView) -> Self {
        let p = v.post;
        Self {
            author_id: (!p.is_anonymous).then_some(p.author_id),
            id: p.id,
            forum_id: p.forum_id,
            author_name: v.author_name,
            title: p.title,
            content: p.content,
            is_anonymous: p.is_anonymous,
            is_reported: p.is_reported,
            like_count: v.like_count,
            response_count: v.response_count,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Response to a post. The author id is withheld on anonymous responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResponse {
    pub id: String,
    pub post_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub author_name: String,
    pub content: String,
    pub is_anonymous: bool,
    pub is_reported: bool,
    pub like_count: u64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<ResponseView> for ResponseResponse {
    fn from(v: ResponseView) -> Self {
        let r = v.response;
        Self {
            author_id: (!r.is_anonymous).then_some(r.author_id),
            id: r.id,
            post_id: r.post_id,
            author_name: v.author_name,
            content: r.content,
            is_anonymous: r.is_anonymous,
            is_reported: r.is_reported,
            like_count: v.like_count,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Limit and offset query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: u64,
}

impl ListQuery {
    fn limit_or(&self, default: u64) -> u64 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }
}

// ==================== Forums ====================

/// List active forums.
async fn list_forums(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<ForumResponse>>> {
    let forums = state
        .forum_service
        .list(query.limit_or(DEFAULT_POST_LIMIT), query.offset)
        .await?;
    Ok(ApiResponse::ok(forums.into_iter().map(Into::into).collect()))
}

/// Create a forum. Moderators only.
async fn create_forum(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateForumInput>,
) -> AppResult<ApiResponse<ForumResponse>> {
    let forum = state.forum_service.create(&user, req).await?;
    Ok(ApiResponse::created(forum.into()))
}

async fn list_by_thematic(
    State(state): State<AppState>,
    Path(thematic): Path<String>,
) -> AppResult<ApiResponse<Vec<ForumResponse>>> {
    let forums = state.forum_service.list_by_thematic(&thematic).await?;
    Ok(ApiResponse::ok(forums.into_iter().map(Into::into).collect()))
}

async fn show_forum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ForumResponse>> {
    let forum = state.forum_service.get(&id).await?;
    Ok(ApiResponse::ok(forum.into()))
}

/// Posts in a forum, newest first.
async fn list_forum_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state
        .post_service
        .list_by_forum(&id, query.limit_or(DEFAULT_POST_LIMIT), query.offset)
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

// ==================== Posts ====================

async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&user, req).await?;
    Ok(ApiResponse::created(post.into()))
}

/// The caller's own posts, newest first.
async fn my_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<PostResponse>>> {
    let posts = state
        .post_service
        .list_by_author(&user.id, query.limit_or(DEFAULT_POST_LIMIT), query.offset)
        .await?;
    Ok(ApiResponse::ok(posts.into_iter().map(Into::into).collect()))
}

async fn show_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.get(&id).await?;
    Ok(ApiResponse::ok(post.into()))
}

async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.update(&user, &id, req).await?;
    Ok(ApiResponse::ok(post.into()))
}

async fn delete_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Ack>> {
    state.post_service.delete(&user, &id).await?;
    Ok(Ack::yes())
}

async fn like_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let toggle = state.post_service.toggle_like(&user, &id).await?;
    Ok(ApiResponse::ok(toggle))
}

async fn report_post(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReportInput>,
) -> AppResult<ApiResponse<Ack>> {
    state.post_service.report(&id, req).await?;
    Ok(Ack::yes())
}

/// Responses to a post, oldest first.
async fn list_post_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<ResponseResponse>>> {
    let responses = state
        .response_service
        .list_by_post(&id, query.limit_or(DEFAULT_RESPONSE_LIMIT), query.offset)
        .await?;
    Ok(ApiResponse::ok(
        responses.into_iter().map(Into::into).collect(),
    ))
}

// ==================== Responses ====================

async fn create_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateResponseInput>,
) -> AppResult<ApiResponse<ResponseResponse>> {
    let response = state.response_service.create(&user, req).await?;
    Ok(ApiResponse::created(response.into()))
}

async fn update_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateResponseInput>,
) -> AppResult<ApiResponse<ResponseResponse>> {
    let response = state.response_service.update(&user, &id, req).await?;
    Ok(ApiResponse::ok(response.into()))
}

async fn delete_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Ack>> {
    state.response_service.delete(&user, &id).await?;
    Ok(Ack::yes())
}

async fn like_response(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeToggle>> {
    let toggle = state.response_service.toggle_like(&user, &id).await?;
    Ok(ApiResponse::ok(toggle))
}

async fn report_response(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReportInput>,
) -> AppResult<ApiResponse<Ack>> {
    state.response_service.report(&id, req).await?;
    Ok(Ack::yes())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_forums).post(create_forum))
        .route("/thematic/{thematic}", get(list_by_thematic))
        .route("/{id}", get(show_forum))
        .route("/{id}/posts", get(list_forum_posts))
        .route("/posts", post(create_post))
        .route("/posts/mine", get(my_posts))
        .route(
            "/posts/{id}",
            get(show_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/like", post(like_post))
        .route("/posts/{id}/report", post(report_post))
        .route("/posts/{id}/responses", get(list_post_responses))
        .route("/responses", post(create_response))
        .route(
            "/responses/{id}",
            put(update_response).delete(delete_response),
        )
        .route("/responses/{id}/like", post(like_response))
        .route("/responses/{id}/report", post(report_response))
}
