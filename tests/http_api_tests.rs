// Integration tests for the HTTP surface
//
// Drives the axum router in-process: a streaming POST publishes while GET
// requests play the stream back.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use futures::channel::mpsc;
use std::sync::Arc;
use std::time::Duration;
use stream_gateway::http::PublishResponse;
use stream_gateway::{
    create_router, AppState, AuthError, ChunkSegmenter, Playback, PlaybackConfig, PublishConfig,
    PublishController, SegmenterOptions, SessionRegistry, StreamKeyAuthenticator,
};
use tower::ServiceExt;

struct StubAuth;

#[async_trait::async_trait]
impl StreamKeyAuthenticator for StubAuth {
    async fn authenticate(&self, stream_key: &str) -> Result<String, AuthError> {
        match stream_key {
            "abc123" => Ok("m-1".to_string()),
            _ => Err(AuthError::Rejected(403)),
        }
    }
}

fn app() -> (Arc<SessionRegistry>, Router) {
    let registry = Arc::new(SessionRegistry::new());
    let controller = Arc::new(PublishController::new(
        Arc::clone(&registry),
        Arc::new(StubAuth),
        Arc::new(ChunkSegmenter::new()),
        PublishConfig {
            segmenter: SegmenterOptions {
                segment_length: Duration::from_millis(50),
            },
            ..PublishConfig::default()
        },
    ));
    let playback = Arc::new(Playback::new(
        Arc::clone(&registry),
        PlaybackConfig {
            poll_interval: Duration::from_millis(10),
            wait_timeout: Duration::from_secs(3),
        },
    ));
    (registry, create_router(AppState::new(controller, playback)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Bytes) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let (_, app) = app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Bytes::from("OK"));
}

#[tokio::test]
async fn test_unknown_stream_is_not_found() {
    let (_, app) = app();

    assert_eq!(get(&app, "/stream/nope.m3u8").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/stream/nope/seg0.ts").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/stream/nope").await.0, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/sessions/nope").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_with_bad_key_is_forbidden() {
    let (registry, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/stream/wrong")
                .body(Body::from("data"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_publish_and_play_scenario() {
    let (registry, app) = app();
    let (body_tx, body_rx) = mpsc::unbounded::<Result<Bytes, std::io::Error>>();

    let publish = tokio::spawn({
        let app = app.clone();
        async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/stream/abc123")
                    .body(Body::from_stream(body_rx))
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    });

    // Wait for the session to go live
    tokio::time::timeout(Duration::from_secs(2), async {
        while registry.is_empty().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("publish should register a session");

    let sessions = registry.list().await;
    let session = &sessions[0];
    assert_eq!(session.manifest_id, "m-1");
    let variant_id = session.variant_id.clone();

    // Master playlist references the variant
    let (status, body) = get(&app, "/stream/m-1.m3u8").await;
    assert_eq!(status, StatusCode::OK);
    let master = String::from_utf8(body.to_vec()).unwrap();
    assert!(master.contains(&format!("{}.m3u8", variant_id)));

    // Two chunks far enough apart to close the first segment
    body_tx.unbounded_send(Ok(Bytes::from_static(b"first"))).unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;
    body_tx.unbounded_send(Ok(Bytes::from_static(b"second"))).unwrap();

    let (status, body) = get(&app, &format!("/stream/{}.m3u8", variant_id)).await;
    assert_eq!(status, StatusCode::OK);
    let media = String::from_utf8(body.to_vec()).unwrap();
    assert!(media.contains(&format!("{}/seg0.ts", variant_id)));

    let (status, body) = get(&app, &format!("/stream/{}/seg0.ts", variant_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Bytes::from_static(b"first"));

    let (status, _) = get(&app, &format!("/sessions/{}", session.session_id)).await;
    assert_eq!(status, StatusCode::OK);

    // Ending the body ends the publish
    drop(body_tx);
    let response = tokio::time::timeout(Duration::from_secs(2), publish)
        .await
        .expect("publish should finish")
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ended: PublishResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(ended.session.variant_id, variant_id);
    assert_eq!(ended.bytes_received, 11);

    assert!(registry.is_empty().await);
    assert_eq!(get(&app, "/stream/m-1.m3u8").await.0, StatusCode::NOT_FOUND);
    assert_eq!(
        get(&app, &format!("/stream/{}.m3u8", variant_id)).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        get(&app, &format!("/stream/{}/seg0.ts", variant_id)).await.0,
        StatusCode::NOT_FOUND
    );
}
