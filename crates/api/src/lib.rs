//! HTTP API layer for sahemind-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, profile, volunteers, journals, forums and emotion analysis
//! - **Extractors**: Authentication
//! - **Middleware**: Bearer token resolution
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
