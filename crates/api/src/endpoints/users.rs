//! Profile endpoints for the signed-in account.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use sahemind_common::AppResult;
use sahemind_core::{AvailabilityInput, UpdateProfileInput};
use sahemind_db::entities::user;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Availability window as shown to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl AvailabilityResponse {
    pub fn from_user(u: &user::Model) -> Option<Self> {
        u.availability_date.map(|date| Self {
            date: date.to_string(),
            start_time: u.availability_start.map(|t| t.format("%H:%M").to_string()),
            end_time: u.availability_end.map(|t| t.format("%H:%M").to_string()),
        })
    }
}

/// The caller's own profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub emotion_keywords: Vec<String>,
    pub is_active: bool,
    pub availability: Option<AvailabilityResponse>,
    pub created_at: String,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        Self {
            availability: AvailabilityResponse::from_user(&u),
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            emotion_keywords: u.emotion_keywords,
            is_active: u.is_active,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Get current user.
async fn me(AuthUser(user): AuthUser) -> ApiResponse<ProfileResponse> {
    ApiResponse::ok(user.into())
}

/// Update the caller's name or emotion keywords.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.update_profile(&user.id, req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Publish the caller's availability window.
async fn set_availability(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AvailabilityInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.set_availability(&user, req).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Remove the caller's availability window.
async fn clear_availability(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.user_service.clear_availability(&user).await?;
    Ok(ApiResponse::ok(user.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route(
            "/me/availability",
            put(set_availability).delete(clear_availability),
        )
}
