//! HTTP surface of the gateway
//!
//! - POST /stream/:stream_key - Publish a live stream (request body is the ingest)
//! - GET /stream/:id.m3u8 - Master playlist, falling through to the media playlist
//! - GET /stream/:variant/:segment.ts - Segment payload
//! - GET /sessions - List live sessions
//! - GET /sessions/:id - Query session status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{status_for, ErrorResponse, PublishResponse};
pub use routes::create_router;
pub use state::AppState;
