use super::entry::{MasterEntry, PublishSession, SessionInfo, VariantEntry};
use crate::error::{GatewayError, GatewayResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Collections {
    sessions: HashMap<String, Arc<PublishSession>>,
    masters: HashMap<String, Arc<MasterEntry>>,
    variants: HashMap<String, Arc<VariantEntry>>,
}

/// Entries removed together when a session ends
pub struct RemovedSession {
    pub session: Arc<PublishSession>,
    pub master: Option<Arc<MasterEntry>>,
    pub variant: Option<Arc<VariantEntry>>,
}

/// Publish sessions, master playlists and variants
///
/// All three collections sit behind one lock so a session is inserted and
/// removed as a unit: readers see either all of its entries or none.
#[derive(Default)]
pub struct SessionRegistry {
    inner: RwLock<Collections>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session with its master and variant
    ///
    /// Fails without touching the registry if any of the ids is already live.
    pub async fn register(
        &self,
        session: Arc<PublishSession>,
        master: MasterEntry,
        variant: VariantEntry,
    ) -> GatewayResult<()> {
        let mut inner = self.inner.write().await;
        let identity = session.identity();

        if inner.masters.contains_key(&master.manifest_id) {
            return Err(GatewayError::AlreadyPublishing(master.manifest_id));
        }
        if inner.sessions.contains_key(&identity.session_id)
            || inner.variants.contains_key(&variant.variant_id)
        {
            return Err(GatewayError::AlreadyPublishing(identity.session_id.clone()));
        }

        debug!(
            "Registering session {} (manifest {}, variant {})",
            identity.session_id, master.manifest_id, variant.variant_id
        );

        inner
            .masters
            .insert(master.manifest_id.clone(), Arc::new(master));
        inner
            .variants
            .insert(variant.variant_id.clone(), Arc::new(variant));
        inner
            .sessions
            .insert(identity.session_id.clone(), Arc::clone(&session));

        Ok(())
    }

    pub async fn session(&self, session_id: &str) -> Option<Arc<PublishSession>> {
        self.inner.read().await.sessions.get(session_id).cloned()
    }

    pub async fn master(&self, manifest_id: &str) -> Option<Arc<MasterEntry>> {
        self.inner.read().await.masters.get(manifest_id).cloned()
    }

    pub async fn variant(&self, variant_id: &str) -> Option<Arc<VariantEntry>> {
        self.inner.read().await.variants.get(variant_id).cloned()
    }

    pub async fn session_info(&self, session_id: &str) -> Option<SessionInfo> {
        self.session(session_id).await.map(|s| s.info())
    }

    /// Snapshot of every live session
    pub async fn list(&self) -> Vec<SessionInfo> {
        let inner = self.inner.read().await;
        let mut sessions: Vec<SessionInfo> = inner.sessions.values().map(|s| s.info()).collect();
        sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        sessions
    }

    /// Remove a session together with its master and variant
    pub async fn remove(&self, session_id: &str) -> Option<RemovedSession> {
        let mut inner = self.inner.write().await;
        let session = inner.sessions.remove(session_id)?;
        let identity = session.identity();
        let master = inner.masters.remove(&identity.manifest_id);
        let variant = inner.variants.remove(&identity.variant_id);

        debug!(
            "Removed session {} (manifest {}, variant {})",
            identity.session_id, identity.manifest_id, identity.variant_id
        );

        Some(RemovedSession {
            session,
            master,
            variant,
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
