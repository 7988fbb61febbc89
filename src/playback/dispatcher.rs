use super::config::PlaybackConfig;
use crate::error::{GatewayError, GatewayResult, StoreError};
use crate::media::{IngestHandle, MasterPlaylist, MediaPlaylist};
use crate::path::{parse_manifest_id, parse_segment_name, parse_stream_key};
use crate::session::SessionRegistry;
use bytes::Bytes;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Outcome of a master playlist lookup
///
/// Manifest and variant ids share one id space, so a miss here means the
/// caller should try the id as a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum MasterResolution {
    Master(MasterPlaylist),
    FallThrough,
}

/// Playlist served for a `.m3u8` request
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistDocument {
    Master(MasterPlaylist),
    Media(MediaPlaylist),
}

impl PlaylistDocument {
    pub fn render(&self) -> String {
        match self {
            PlaylistDocument::Master(master) => master.render(),
            PlaylistDocument::Media(media) => media.render(),
        }
    }
}

/// Read-only resolution of playback requests
#[async_trait::async_trait]
pub trait PlayResolver: Send + Sync {
    async fn resolve_master(&self, path: &str) -> GatewayResult<MasterResolution>;

    /// Waits, bounded, until the variant has a ready playlist
    async fn resolve_media(&self, path: &str) -> GatewayResult<MediaPlaylist>;

    async fn resolve_segment(&self, path: &str) -> GatewayResult<Bytes>;

    /// Live ingest of the session named by `/stream/{session_id}`
    ///
    /// The segmenter is the only consumer of the ingest's chunks. The handle
    /// is for a transport that fans the live stream out itself; calling
    /// `recv` on it takes chunks away from segmentation.
    async fn resolve_ingest(&self, path: &str) -> GatewayResult<Arc<dyn IngestHandle>>;
}

pub struct Playback {
    registry: Arc<SessionRegistry>,
    config: PlaybackConfig,
}

impl Playback {
    pub fn new(registry: Arc<SessionRegistry>, config: PlaybackConfig) -> Self {
        Self { registry, config }
    }

    /// Master playlist if one exists for the id, otherwise the media playlist
    pub async fn resolve_playlist(&self, path: &str) -> GatewayResult<PlaylistDocument> {
        match self.resolve_master(path).await? {
            MasterResolution::Master(master) => Ok(PlaylistDocument::Master(master)),
            MasterResolution::FallThrough => {
                self.resolve_media(path).await.map(PlaylistDocument::Media)
            }
        }
    }
}

fn manifest_id_of(path: &str) -> GatewayResult<&str> {
    parse_manifest_id(path).ok_or_else(|| GatewayError::Parse(path.to_string()))
}

#[async_trait::async_trait]
impl PlayResolver for Playback {
    async fn resolve_master(&self, path: &str) -> GatewayResult<MasterResolution> {
        let manifest_id = manifest_id_of(path)?;

        match self.registry.master(manifest_id).await {
            Some(entry) => Ok(MasterResolution::Master(entry.playlist.clone())),
            None => Ok(MasterResolution::FallThrough),
        }
    }

    async fn resolve_media(&self, path: &str) -> GatewayResult<MediaPlaylist> {
        let variant_id = manifest_id_of(path)?;
        let variant = self
            .registry
            .variant(variant_id)
            .await
            .ok_or_else(|| GatewayError::NoSuchStream(variant_id.to_string()))?;

        let started = Instant::now();
        loop {
            match variant.store.playlist().await {
                Ok(playlist) if playlist.is_ready() => return Ok(playlist),
                Err(StoreError::EndOfStream) => {
                    info!("Variant {} reached end of stream", variant_id);
                    return Err(GatewayError::EndOfStream(variant_id.to_string()));
                }
                Ok(_) => debug!("Variant {} playlist has no segments yet", variant_id),
                Err(e) => debug!("Variant {} playlist not available: {}", variant_id, e),
            }

            let waited = started.elapsed();
            if waited >= self.config.wait_timeout {
                warn!(
                    "Gave up waiting for variant {} playlist after {:?}",
                    variant_id, waited
                );
                return Err(GatewayError::NotReadyTimeout {
                    id: variant_id.to_string(),
                    waited,
                });
            }

            sleep(self.config.poll_interval.min(self.config.wait_timeout - waited)).await;
        }
    }

    async fn resolve_segment(&self, path: &str) -> GatewayResult<Bytes> {
        let variant_id = manifest_id_of(path)?;
        let variant = self
            .registry
            .variant(variant_id)
            .await
            .ok_or_else(|| GatewayError::NoSuchStream(variant_id.to_string()))?;

        let segment_name =
            parse_segment_name(path).ok_or_else(|| GatewayError::Parse(path.to_string()))?;

        variant.store.segment(segment_name).await.map_err(|e| {
            warn!("Error getting segment {}: {}", segment_name, e);
            GatewayError::Store(e)
        })
    }

    async fn resolve_ingest(&self, path: &str) -> GatewayResult<Arc<dyn IngestHandle>> {
        let session_id =
            parse_stream_key(path).ok_or_else(|| GatewayError::Parse(path.to_string()))?;

        self.registry
            .session(session_id)
            .await
            .map(|session| session.ingest())
            .ok_or_else(|| GatewayError::NoSuchStream(session_id.to_string()))
    }
}
