// Integration tests for chunk segmentation
//
// These tests verify that ingest chunks are cut into time-based segments
// and land in the variant store.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use stream_gateway::media::{IngestSender, MediaChunk};
use stream_gateway::{
    ChannelIngest, ChunkSegmenter, GatewayError, IngestHandle, MemoryVariantStore, Segmenter,
    SegmenterOptions, StoreError, VariantStore,
};
use tokio_util::sync::CancellationToken;

fn opts(ms: u64) -> SegmenterOptions {
    SegmenterOptions {
        segment_length: Duration::from_millis(ms),
    }
}

async fn send(tx: &IngestSender, byte: u8, timestamp_ms: u64) {
    tx.send(MediaChunk {
        data: Bytes::from(vec![byte; 2]),
        timestamp_ms,
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_segments_cut_at_target_duration() {
    let (ingest, tx) = ChannelIngest::new("/stream/key", 16);
    let store = Arc::new(MemoryVariantStore::new("v", 5, 1));

    for (i, ts) in [0u64, 500, 1000, 1500, 2000].into_iter().enumerate() {
        send(&tx, i as u8, ts).await;
    }
    drop(tx);

    ChunkSegmenter::new()
        .run(ingest, store.clone(), opts(1000), CancellationToken::new())
        .await
        .unwrap();

    let playlist = store.playlist().await.unwrap();
    assert!(playlist.ended, "ingest end should finish the store");
    let uris: Vec<_> = playlist.segments.iter().map(|s| s.uri.as_str()).collect();
    assert_eq!(uris, vec!["v/seg0.ts", "v/seg1.ts", "v/seg2.ts"]);
    assert_eq!(playlist.segments[0].duration_secs, 1.0);
    assert_eq!(playlist.segments[1].duration_secs, 1.0);

    let seg0 = store.segment("v/seg0.ts").await.unwrap();
    assert_eq!(seg0, Bytes::from(vec![0u8, 0, 1, 1]));
}

#[tokio::test]
async fn test_cancellation_stops_segmenter() {
    let (ingest, tx) = ChannelIngest::new("/stream/key", 16);
    let store = Arc::new(MemoryVariantStore::new("v", 3, 1));
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let cancel = cancel.clone();
        let store = store.clone();
        async move {
            ChunkSegmenter::new()
                .run(ingest, store, opts(1000), cancel)
                .await
        }
    });

    send(&tx, 1, 0).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("segmenter should stop promptly")
        .unwrap();
    assert!(result.is_ok());
    // Cancelled, not ended: the open segment is dropped and the store left unfinished
    assert_eq!(store.playlist().await, Err(StoreError::NotReady));
    drop(tx);
}

#[tokio::test]
async fn test_closed_ingest_ends_segmentation() {
    let (ingest, tx) = ChannelIngest::new("/stream/key", 16);
    let store = Arc::new(MemoryVariantStore::new("v", 3, 1));

    send(&tx, 7, 0).await;
    ingest.close();

    ChunkSegmenter::new()
        .run(ingest.clone(), store.clone(), opts(1000), CancellationToken::new())
        .await
        .unwrap();

    assert!(ingest.is_closed());
    assert_eq!(store.playlist().await, Err(StoreError::EndOfStream));
}

#[tokio::test]
async fn test_store_failure_is_pipeline_error() {
    let (ingest, tx) = ChannelIngest::new("/stream/key", 16);
    let store = Arc::new(MemoryVariantStore::new("v", 3, 1));
    store.finish().await;

    send(&tx, 1, 0).await;
    drop(tx);

    let err = ChunkSegmenter::new()
        .run(ingest, store, opts(1000), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Pipeline(_)), "got {:?}", err);
}
