use super::state::AppState;
use crate::error::{GatewayError, GatewayResult, StoreError};
use crate::media::{ChannelIngest, IngestHandle, IngestSender, MediaChunk};
use crate::playback::PlayResolver;
use crate::session::SessionInfo;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Chunks buffered between the request body and the segmenter
const INGEST_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    pub session: SessionInfo,
    pub status: String,
    pub bytes_received: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::Parse(_)
        | GatewayError::NoSuchStream(_)
        | GatewayError::EndOfStream(_)
        | GatewayError::Store(StoreError::SegmentNotFound(_))
        | GatewayError::Store(StoreError::EndOfStream) => StatusCode::NOT_FOUND,
        GatewayError::Auth(_) => StatusCode::FORBIDDEN,
        GatewayError::AlreadyPublishing(_) => StatusCode::CONFLICT,
        GatewayError::NotReadyTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &GatewayError) -> Response {
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /stream/{id}.m3u8 | /stream/{id}_{suffix}.m3u8 | /stream/{variant}/{segment}.ts
pub async fn play(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    if path.ends_with(".m3u8") {
        match state.playback.resolve_playlist(path).await {
            Ok(document) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/vnd.apple.mpegurl")],
                document.render(),
            )
                .into_response(),
            Err(e) => error_response(&e),
        }
    } else if path.ends_with(".ts") {
        match state.playback.resolve_segment(path).await {
            Ok(data) => (StatusCode::OK, [(header::CONTENT_TYPE, "video/mp2t")], data).into_response(),
            Err(e) => error_response(&e),
        }
    } else {
        error_response(&GatewayError::Parse(path.to_string()))
    }
}

/// POST /stream/{stream_key}
/// Publish a live stream; the request body is the ingest
pub async fn publish(State(state): State<AppState>, uri: Uri, body: Body) -> Response {
    let path = uri.path().to_string();

    let identity = match state.authorizer.authorize(&path).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Publish rejected for {}: {}", path, e);
            return error_response(&e);
        }
    };

    let (ingest, sender) = ChannelIngest::new(path.clone(), INGEST_CHANNEL_CAPACITY);
    ingest.set_app_data(identity);

    let identity = match state
        .publish_handler
        .on_publish(Arc::clone(&ingest) as Arc<dyn IngestHandle>)
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            error!("Failed to start publish for {}: {}", path, e);
            return error_response(&e);
        }
    };

    let Some(session) = state.registry.session_info(&identity.session_id).await else {
        return error_response(&GatewayError::NoSuchStream(identity.session_id));
    };

    let outcome = pump_body(body, sender, ingest.as_ref()).await;

    if let Err(e) = state.end_handler.on_publish_end(ingest.as_ref()).await {
        warn!("Failed to end session {}: {}", identity.session_id, e);
    }

    match outcome {
        Ok(bytes_received) => {
            info!(
                "Publish for session {} ended after {} bytes",
                identity.session_id, bytes_received
            );
            (
                StatusCode::OK,
                Json(PublishResponse {
                    session,
                    status: "ended".to_string(),
                    bytes_received,
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Forward the request body into the ingest until it ends or the ingest closes
async fn pump_body(body: Body, sender: IngestSender, ingest: &ChannelIngest) -> GatewayResult<u64> {
    let mut stream = body.into_data_stream();
    let started = Instant::now();
    let mut received = 0u64;

    loop {
        let frame = tokio::select! {
            _ = ingest.closed() => {
                return Err(GatewayError::Pipeline(format!("ingest {} closed", ingest.path())));
            }
            frame = stream.next() => frame,
        };

        let data = match frame {
            None => return Ok(received),
            Some(Err(e)) => {
                warn!("Publish body for {} failed: {}", ingest.path(), e);
                return Ok(received);
            }
            Some(Ok(data)) => data,
        };

        received += data.len() as u64;
        let chunk = MediaChunk {
            data,
            timestamp_ms: started.elapsed().as_millis() as u64,
        };

        tokio::select! {
            _ = ingest.closed() => {
                return Err(GatewayError::Pipeline(format!("ingest {} closed", ingest.path())));
            }
            sent = sender.send(chunk) => {
                if sent.is_err() {
                    return Err(GatewayError::Pipeline(format!("ingest {} dropped", ingest.path())));
                }
            }
        }
    }
}

/// GET /sessions
/// List live publish sessions
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.registry.list().await))
}

/// GET /sessions/:session_id
/// Get status of a publish session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.registry.session_info(&session_id).await {
        Some(info) => (StatusCode::OK, Json(info)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", session_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
