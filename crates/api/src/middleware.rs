//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sahemind_core::{
    AuthService, EmotionService, ForumService, JournalService, PostResponseService, PostService,
    UserService, VolunteerService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub volunteer_service: VolunteerService,
    pub journal_service: JournalService,
    pub forum_service: ForumService,
    pub post_service: PostService,
    pub response_service: PostResponseService,
    pub emotion_service: EmotionService,
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to the account and stores it in
/// request extensions. Requests without a valid token pass through anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = token {
        match state.auth_service.authenticate_by_token(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Token lookup failed");
            }
            Err(_) => {}
        }
    }

    next.run(req).await
}
