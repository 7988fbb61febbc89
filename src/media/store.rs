use super::playlist::{MediaPlaylist, SegmentRef};
use crate::error::StoreError;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub type StoreResult<T> = Result<T, StoreError>;

/// A finished media segment
#[derive(Debug, Clone)]
pub struct Segment {
    /// Name the segment is fetched by, also its playlist URI
    pub name: String,
    pub duration_secs: f64,
    pub data: Bytes,
}

/// Live-updating segment and playlist store for one variant
///
/// Written by the segmentation task, read by playback.
#[async_trait::async_trait]
pub trait VariantStore: Send + Sync {
    fn variant_id(&self) -> &str;

    /// Current playlist, `NotReady` before the first segment,
    /// `EndOfStream` if the stream finished without producing any
    async fn playlist(&self) -> StoreResult<MediaPlaylist>;

    /// Raw bytes of a segment still inside the window
    async fn segment(&self, name: &str) -> StoreResult<Bytes>;

    async fn insert_segment(&self, segment: Segment) -> StoreResult<()>;

    /// Mark the stream as finished; further inserts fail with `Closed`
    async fn finish(&self);
}

/// Creates the backing store of each newly published variant
pub trait VariantStoreFactory: Send + Sync {
    fn create_store(&self, variant_id: &str) -> Arc<dyn VariantStore>;
}

/// Hands out `MemoryVariantStore`s sharing one window configuration
#[derive(Debug, Clone)]
pub struct MemoryStoreFactory {
    playlist_length: usize,
    target_duration_secs: u64,
}

impl MemoryStoreFactory {
    pub fn new(playlist_length: usize, target_duration_secs: u64) -> Self {
        Self {
            playlist_length,
            target_duration_secs,
        }
    }
}

impl VariantStoreFactory for MemoryStoreFactory {
    fn create_store(&self, variant_id: &str) -> Arc<dyn VariantStore> {
        Arc::new(MemoryVariantStore::new(
            variant_id,
            self.playlist_length,
            self.target_duration_secs,
        ))
    }
}

struct StoreInner {
    window: VecDeque<Segment>,
    by_name: HashMap<String, Bytes>,
    media_sequence: u64,
    produced: u64,
    finished: bool,
}

/// In-memory sliding window store
pub struct MemoryVariantStore {
    variant_id: String,
    playlist_length: usize,
    target_duration_secs: u64,
    inner: RwLock<StoreInner>,
}

impl MemoryVariantStore {
    pub fn new(variant_id: impl Into<String>, playlist_length: usize, target_duration_secs: u64) -> Self {
        Self {
            variant_id: variant_id.into(),
            playlist_length: playlist_length.max(1),
            target_duration_secs,
            inner: RwLock::new(StoreInner {
                window: VecDeque::new(),
                by_name: HashMap::new(),
                media_sequence: 0,
                produced: 0,
                finished: false,
            }),
        }
    }
}

#[async_trait::async_trait]
impl VariantStore for MemoryVariantStore {
    fn variant_id(&self) -> &str {
        &self.variant_id
    }

    async fn playlist(&self) -> StoreResult<MediaPlaylist> {
        let inner = self.inner.read().await;
        if inner.window.is_empty() {
            return Err(if inner.finished {
                StoreError::EndOfStream
            } else {
                StoreError::NotReady
            });
        }

        let target = inner
            .window
            .iter()
            .map(|s| s.duration_secs.ceil() as u64)
            .max()
            .unwrap_or(0)
            .max(self.target_duration_secs);

        Ok(MediaPlaylist {
            target_duration_secs: target,
            media_sequence: inner.media_sequence,
            segments: inner
                .window
                .iter()
                .map(|s| SegmentRef {
                    uri: s.name.clone(),
                    duration_secs: s.duration_secs,
                })
                .collect(),
            ended: inner.finished,
        })
    }

    async fn segment(&self, name: &str) -> StoreResult<Bytes> {
        let inner = self.inner.read().await;
        inner
            .by_name
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::SegmentNotFound(name.to_string()))
    }

    async fn insert_segment(&self, segment: Segment) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.finished {
            return Err(StoreError::Closed);
        }

        debug!(
            "Variant {}: segment {} ({:.2}s, {} bytes)",
            self.variant_id,
            segment.name,
            segment.duration_secs,
            segment.data.len()
        );

        inner.by_name.insert(segment.name.clone(), segment.data.clone());
        inner.window.push_back(segment);
        inner.produced += 1;

        while inner.window.len() > self.playlist_length {
            if let Some(evicted) = inner.window.pop_front() {
                inner.by_name.remove(&evicted.name);
                inner.media_sequence += 1;
            }
        }

        Ok(())
    }

    async fn finish(&self) {
        let mut inner = self.inner.write().await;
        if !inner.finished {
            inner.finished = true;
            debug!(
                "Variant {} finished after {} segments",
                self.variant_id, inner.produced
            );
        }
    }
}
