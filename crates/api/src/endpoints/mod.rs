//! API endpoints.

mod auth;
mod emotion;
mod forums;
mod journals;
mod users;
mod volunteers;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/volunteers", volunteers::router())
        .nest("/journals", journals::router())
        .nest("/forums", forums::router())
        .nest("/emotion", emotion::router())
}
