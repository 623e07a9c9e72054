//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use sahemind_common::AppResult;
use sahemind_core::SignupInput;
use sahemind_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse},
};

/// Session response returned by signup and login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub token: String,
}

impl From<user::Model> for SessionResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            token: u.token.unwrap_or_default(),
        }
    }
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create a new patient account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.auth_service.signup(req).await?;
    Ok(ApiResponse::created(user.into()))
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.auth_service.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Invalidate the current token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Ack>> {
    state.auth_service.logout(&user.id).await?;
    Ok(Ack::yes())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
