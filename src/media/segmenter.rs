use super::ingest::{IngestHandle, MediaChunk};
use super::store::{Segment, VariantStore};
use crate::error::{GatewayError, GatewayResult};
use bytes::BytesMut;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Segmentation options
#[derive(Debug, Clone)]
pub struct SegmenterOptions {
    /// Target duration of each segment
    pub segment_length: Duration,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            segment_length: Duration::from_secs(8),
        }
    }
}

/// Turns a live ingest into segments in a variant store
///
/// Runs until the ingest ends or `cancel` fires. An error means the pipeline
/// faulted and the ingest should be closed.
#[async_trait::async_trait]
pub trait Segmenter: Send + Sync {
    async fn run(
        &self,
        ingest: Arc<dyn IngestHandle>,
        store: Arc<dyn VariantStore>,
        opts: SegmenterOptions,
        cancel: CancellationToken,
    ) -> GatewayResult<()>;
}

/// Cuts segments on chunk timestamps
///
/// A new segment starts with the first chunk whose timestamp is at least
/// `segment_length` past the start of the open segment.
#[derive(Debug, Default, Clone)]
pub struct ChunkSegmenter;

impl ChunkSegmenter {
    pub fn new() -> Self {
        Self
    }
}

struct OpenSegment {
    index: u64,
    start_ms: u64,
    end_ms: u64,
    data: BytesMut,
}

impl OpenSegment {
    fn new(index: u64, chunk: &MediaChunk) -> Self {
        Self {
            index,
            start_ms: chunk.timestamp_ms,
            end_ms: chunk.timestamp_ms,
            data: BytesMut::new(),
        }
    }

    fn write_chunk(&mut self, chunk: &MediaChunk) {
        self.data.extend_from_slice(&chunk.data);
        self.end_ms = self.end_ms.max(chunk.timestamp_ms);
    }

    fn finish(self, variant_id: &str, next_start_ms: Option<u64>) -> Segment {
        // Closed by the next chunk: span up to it. Final segment: up to its last chunk.
        let end_ms = next_start_ms.unwrap_or(self.end_ms);
        Segment {
            name: format!("{}/seg{}.ts", variant_id, self.index),
            duration_secs: end_ms.saturating_sub(self.start_ms) as f64 / 1000.0,
            data: self.data.freeze(),
        }
    }
}

#[async_trait::async_trait]
impl Segmenter for ChunkSegmenter {
    async fn run(
        &self,
        ingest: Arc<dyn IngestHandle>,
        store: Arc<dyn VariantStore>,
        opts: SegmenterOptions,
        cancel: CancellationToken,
    ) -> GatewayResult<()> {
        let variant_id = store.variant_id().to_string();
        let segment_ms = opts.segment_length.as_millis() as u64;
        let mut current: Option<OpenSegment> = None;
        let mut next_index = 0u64;

        info!(
            "Segmenting {} into variant {} ({}ms segments)",
            ingest.path(),
            variant_id,
            segment_ms
        );

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Segmenter for {} cancelled", variant_id);
                    return Ok(());
                }
                chunk = ingest.recv() => chunk,
            };

            let Some(chunk) = chunk else {
                break;
            };

            let rotate = match &current {
                None => true,
                Some(open) => chunk.timestamp_ms.saturating_sub(open.start_ms) >= segment_ms,
            };

            if rotate {
                if let Some(open) = current.take() {
                    let segment = open.finish(&variant_id, Some(chunk.timestamp_ms));
                    store
                        .insert_segment(segment)
                        .await
                        .map_err(|e| GatewayError::Pipeline(e.to_string()))?;
                }
                current = Some(OpenSegment::new(next_index, &chunk));
                next_index += 1;
            }

            if let Some(open) = current.as_mut() {
                open.write_chunk(&chunk);
            }
        }

        if let Some(open) = current.take() {
            store
                .insert_segment(open.finish(&variant_id, None))
                .await
                .map_err(|e| GatewayError::Pipeline(e.to_string()))?;
        }
        store.finish().await;

        info!(
            "Ingest {} ended, {} segments produced for variant {}",
            ingest.path(),
            next_index,
            variant_id
        );

        Ok(())
    }
}
