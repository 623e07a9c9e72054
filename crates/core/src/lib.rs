//! Core business logic for sahemind-rs.
//!
//! Services sit between the HTTP layer and the repositories. They own
//! validation, ownership checks and the in-memory volunteer and journal
//! aggregations.

pub mod services;

pub use services::*;
