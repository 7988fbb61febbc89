use super::config::PublishConfig;
use super::hooks::{PublishAuthorizer, PublishEndHandler, PublishHandler};
use crate::auth::StreamKeyAuthenticator;
use crate::error::{GatewayError, GatewayResult};
use crate::media::{
    IngestHandle, MasterPlaylist, MemoryStoreFactory, Segmenter, VariantRef, VariantStoreFactory,
};
use crate::path::parse_stream_key;
use crate::session::{MasterEntry, PublishIdentity, PublishSession, SessionRegistry, VariantEntry};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Drives a publish from authorization through teardown
///
/// The only writer of the session registry.
pub struct PublishController {
    registry: Arc<SessionRegistry>,
    authenticator: Arc<dyn StreamKeyAuthenticator>,
    segmenter: Arc<dyn Segmenter>,
    stores: Arc<dyn VariantStoreFactory>,
    config: PublishConfig,
}

impl PublishController {
    pub fn new(
        registry: Arc<SessionRegistry>,
        authenticator: Arc<dyn StreamKeyAuthenticator>,
        segmenter: Arc<dyn Segmenter>,
        config: PublishConfig,
    ) -> Self {
        let stores = Arc::new(MemoryStoreFactory::new(
            config.playlist_length,
            config.segmenter.segment_length.as_secs(),
        ));
        Self {
            registry,
            authenticator,
            segmenter,
            stores,
            config,
        }
    }

    /// Replace the default in-memory variant stores
    pub fn with_store_factory(mut self, stores: Arc<dyn VariantStoreFactory>) -> Self {
        self.stores = stores;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}

#[async_trait::async_trait]
impl PublishAuthorizer for PublishController {
    async fn authorize(&self, path: &str) -> GatewayResult<PublishIdentity> {
        let Some(stream_key) = parse_stream_key(path) else {
            error!("Empty stream key during publish authentication: {}", path);
            return Err(GatewayError::Parse(path.to_string()));
        };

        let manifest_id = self.authenticator.authenticate(stream_key).await.map_err(|e| {
            error!("Publish authentication failed: {}", e);
            GatewayError::Auth(e)
        })?;

        Ok(PublishIdentity::generate(manifest_id))
    }
}

#[async_trait::async_trait]
impl PublishHandler for PublishController {
    async fn on_publish(&self, ingest: Arc<dyn IngestHandle>) -> GatewayResult<PublishIdentity> {
        let identity = ingest
            .app_data()
            .cloned()
            .ok_or(GatewayError::MissingAppData)?;

        let store = self.stores.create_store(&identity.variant_id);

        let mut playlist = MasterPlaylist::new(identity.manifest_id.clone());
        playlist.variants.push(VariantRef::for_variant(
            &identity.variant_id,
            self.config.variant_bandwidth,
        ));

        let master = MasterEntry {
            manifest_id: identity.manifest_id.clone(),
            playlist,
        };
        let variant = VariantEntry {
            variant_id: identity.variant_id.clone(),
            manifest_id: identity.manifest_id.clone(),
            store: Arc::clone(&store),
        };

        let session = Arc::new(PublishSession::new(identity.clone(), Arc::clone(&ingest)));
        self.registry
            .register(Arc::clone(&session), master, variant)
            .await?;

        let segmenter = Arc::clone(&self.segmenter);
        let opts = self.config.segmenter.clone();
        let cancel = session.cancel_token();
        let session_id = identity.session_id.clone();

        let task = tokio::spawn(async move {
            let result = segmenter
                .run(Arc::clone(&ingest), store, opts, cancel)
                .await;
            if let Err(ref e) = result {
                error!("Error segmenting session {}: {}", session_id, e);
                ingest.close();
            }
            result
        });
        session.attach_task(task).await;

        info!(
            "Publishing session {} at /stream/{}.m3u8",
            identity.session_id, identity.manifest_id
        );
        info!(
            "Created manifest with ID {} and variant ID {}",
            identity.manifest_id, identity.variant_id
        );

        Ok(identity)
    }
}

#[async_trait::async_trait]
impl PublishEndHandler for PublishController {
    async fn on_publish_end(&self, ingest: &dyn IngestHandle) -> GatewayResult<()> {
        let identity = ingest.app_data().ok_or(GatewayError::MissingAppData)?;

        let Some(session) = self.registry.session(&identity.session_id).await else {
            debug!(
                "End notification for unknown session {}, ignoring",
                identity.session_id
            );
            return Ok(());
        };

        info!("Publish ended for session {}", identity.session_id);

        session.cancel();
        let removed = self.registry.remove(&identity.session_id).await;
        if removed.is_none() {
            warn!(
                "Session {} was removed concurrently",
                identity.session_id
            );
        }
        session.join().await;

        // Playlist readers still holding the variant see end of stream
        if let Some(variant) = removed.and_then(|removed| removed.variant) {
            variant.store.finish().await;
        }

        Ok(())
    }
}
