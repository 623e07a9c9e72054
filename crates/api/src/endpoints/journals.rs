//! Journal endpoints. Every route acts on the caller's own journals.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use sahemind_common::AppResult;
use sahemind_core::{CreateJournalInput, HumorReport, UpdateJournalInput};
use sahemind_db::entities::journal;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{Ack, ApiResponse},
};

/// Journal response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalResponse {
    pub id: String,
    pub humor: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: bool,
    pub color: String,
    pub report: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<journal::Model> for JournalResponse {
    fn from(j: journal::Model) -> Self {
        Self {
            id: j.id,
            humor: j.humor,
            title: j.title,
            content: j.content,
            is_pinned: j.is_pinned,
            color: j.color,
            report: j.report,
            created_at: j.created_at.to_rfc3339(),
            updated_at: j.updated_at.to_rfc3339(),
        }
    }
}

/// Color change request.
#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub color: String,
}

fn to_list(journals: Vec<journal::Model>) -> ApiResponse<Vec<JournalResponse>> {
    ApiResponse::ok(journals.into_iter().map(Into::into).collect())
}

/// Write a journal.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateJournalInput>,
) -> AppResult<ApiResponse<JournalResponse>> {
    let journal = state.journal_service.create(&user.id, req).await?;
    Ok(ApiResponse::created(journal.into()))
}

/// List journals, pinned first.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<JournalResponse>>> {
    Ok(to_list(state.journal_service.list(&user.id).await?))
}

/// List pinned journals.
async fn list_pinned(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<JournalResponse>>> {
    Ok(to_list(state.journal_service.list_pinned(&user.id).await?))
}

/// Daily counts per humor.
async fn humor_report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<HumorReport>> {
    let report = state.journal_service.humor_report(&user.id).await?;
    Ok(ApiResponse::ok(report))
}

async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<JournalResponse>> {
    let journal = state.journal_service.get(&user.id, &id).await?;
    Ok(ApiResponse::ok(journal.into()))
}

/// Update the given fields of a journal.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJournalInput>,
) -> AppResult<ApiResponse<JournalResponse>> {
    let journal = state.journal_service.update(&user.id, &id, req).await?;
    Ok(ApiResponse::ok(journal.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Ack>> {
    state.journal_service.delete(&user.id, &id).await?;
    Ok(Ack::yes())
}

/// Flip the pin flag.
async fn toggle_pin(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<JournalResponse>> {
    let journal = state.journal_service.toggle_pin(&user.id, &id).await?;
    Ok(ApiResponse::ok(journal.into()))
}

async fn set_color(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ColorRequest>,
) -> AppResult<ApiResponse<JournalResponse>> {
    let journal = state
        .journal_service
        .set_color(&user.id, &id, req.color)
        .await?;
    Ok(ApiResponse::ok(journal.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/pinned", get(list_pinned))
        .route("/report/humor", get(humor_report))
        .route("/{id}", get(show).patch(update).delete(delete))
        .route("/{id}/pin", patch(toggle_pin))
        .route("/{id}/color", patch(set_color))
}
