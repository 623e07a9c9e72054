//! Volunteer discovery endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use sahemind_common::AppResult;
use sahemind_core::VolunteerPage;
use sahemind_db::entities::user;
use serde::{Deserialize, Serialize};

use super::users::AvailabilityResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public view of a volunteer. Contact details stay private.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerResponse {
    pub id: String,
    pub name: Option<String>,
    pub emotion_keywords: Vec<String>,
    pub availability: Option<AvailabilityResponse>,
}

impl From<user::Model> for VolunteerResponse {
    fn from(u: user::Model) -> Self {
        Self {
            availability: AvailabilityResponse::from_user(&u),
            id: u.id,
            name: u.name,
            emotion_keywords: u.emotion_keywords,
        }
    }
}

/// One page of volunteers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerPageResponse {
    pub volunteers: Vec<VolunteerResponse>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<VolunteerPage> for VolunteerPageResponse {
    fn from(p: VolunteerPage) -> Self {
        Self {
            volunteers: p.volunteers.into_iter().map(Into::into).collect(),
            page: p.page,
            page_size: p.page_size,
            total: p.total,
            total_pages: p.total_pages,
            has_next: p.has_next,
            has_prev: p.has_prev,
        }
    }
}

/// Pagination query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_page_size() -> u64 {
    10
}

/// Explicit keyword match request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub keywords: Vec<String>,
}

fn to_response(volunteers: Vec<user::Model>) -> ApiResponse<Vec<VolunteerResponse>> {
    ApiResponse::ok(volunteers.into_iter().map(Into::into).collect())
}

/// List active volunteers.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<VolunteerResponse>>> {
    Ok(to_response(state.volunteer_service.list().await?))
}

/// List active volunteers page by page.
async fn list_paginated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<VolunteerPageResponse>> {
    let page = state
        .volunteer_service
        .list_page(query.page, query.page_size)
        .await?;
    Ok(ApiResponse::ok(page.into()))
}

/// Volunteers whose window covers the current time.
async fn available(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VolunteerResponse>>> {
    Ok(to_response(state.volunteer_service.available_now().await?))
}

/// Volunteers matching the caller's emotion keywords.
async fn matches_for_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VolunteerResponse>>> {
    let volunteers = state
        .volunteer_service
        .match_for_keywords(&user.emotion_keywords)
        .await?;
    Ok(to_response(volunteers))
}

/// Volunteers matching the given keywords.
async fn matches_for_keywords(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> AppResult<ApiResponse<Vec<VolunteerResponse>>> {
    let volunteers = state
        .volunteer_service
        .match_for_keywords(&req.keywords)
        .await?;
    Ok(to_response(volunteers))
}

/// Volunteers matching another user's emotion keywords.
async fn by_emotions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<VolunteerResponse>>> {
    Ok(to_response(
        state.volunteer_service.match_for_user(&user_id).await?,
    ))
}

/// Show one volunteer.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<VolunteerResponse>> {
    let volunteer = state.volunteer_service.get(&id).await?;
    Ok(ApiResponse::ok(volunteer.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/paginated", get(list_paginated))
        .route("/available", get(available))
        .route("/matches", get(matches_for_me).post(matches_for_keywords))
        .route("/by-emotions/{user_id}", get(by_emotions))
        .route("/{id}", get(show))
}
