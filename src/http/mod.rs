//! HTTP API server for the practice clients and dashboards
//!
//! This module provides the REST surface over the session pipeline:
//! - POST /sessions - Create a practice session
//! - POST /sessions/:id/audio - Upload the finished recording
//! - POST /sessions/:id/analyze - Run classification
//! - GET /sessions/:id - Query session status
//! - GET /owners/:owner_id/analyses - Dashboard listing (analyses + playback)
//! - GET /owners/:owner_id/trends - Chart-ready trend series
//! - GET /recordings/* - Stored recording playback
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
