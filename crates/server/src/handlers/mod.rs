//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the
//! `paraflow-server`. The handlers are split into logical sub-modules based
//! on their functionality.

pub mod documents;
pub mod general;
pub mod jobs;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use documents::*;
pub use general::*;
pub use jobs::*;
